use std::{net::SocketAddr, path::PathBuf};

use lnclibridge::{
    bridge::Bridge,
    config::{LncliSettings, ServerConfig, StatusMapping},
    server,
};
use tokio::net::TcpListener;

/// Starts a bridge on an ephemeral localhost port and returns its address.
pub async fn start_bridge(
    lncli_path: PathBuf,
    status_mapping: StatusMapping,
    timeout_secs: u64,
) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let host_port = listener.local_addr()?;

    let bridge = Bridge::builder()
        .with_lncli_settings(LncliSettings {
            lncli_path,
            timeout_secs,
            ..Default::default()
        })
        .with_server(Some(ServerConfig {
            host_port,
            status_mapping,
            ..Default::default()
        }))
        .build()?;

    tokio::spawn(async move {
        server::serve(listener, bridge)
            .await
            .expect("Could not start bridge server");
    });

    Ok(host_port)
}
