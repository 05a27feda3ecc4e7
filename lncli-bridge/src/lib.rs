pub mod bridge;
pub mod config;
pub mod error;
pub mod lncli;
pub mod model;
mod routes;
pub mod server;
