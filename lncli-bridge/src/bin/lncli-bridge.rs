use lnclibridge::{bridge::Bridge, config::BridgeConfig, server};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = BridgeConfig::read_config_with_defaults();
    server::init_tracing(&config.tracing);

    let bridge = Bridge::builder()
        .with_lncli_settings(config.lncli)
        .with_server(Some(config.server))
        .with_tracing(Some(config.tracing))
        .build()?;

    server::run_server(bridge).await
}
