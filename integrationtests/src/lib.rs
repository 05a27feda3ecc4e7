pub mod lncli_mock;
pub mod setup;
