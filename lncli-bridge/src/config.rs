use std::{
    env,
    fmt::{self, Formatter},
    net::SocketAddr,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Opts {
    #[clap(flatten)]
    pub server: ServerConfig,
    #[clap(flatten)]
    pub lncli: LncliSettings,
    #[clap(flatten)]
    pub tracing: TracingConfig,
}

#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub lncli: LncliSettings,
    pub tracing: TracingConfig,
}

impl From<Opts> for BridgeConfig {
    fn from(opts: Opts) -> Self {
        Self {
            server: opts.server,
            lncli: opts.lncli,
            tracing: opts.tracing,
        }
    }
}

impl BridgeConfig {
    pub fn read_config_with_defaults() -> Self {
        Opts::parse().into()
    }
}

/// How the outcome of an lncli invocation is reflected in the http status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusMapping {
    /// Every invocation that ran answers 200 with the cli output, whatever its exit code.
    #[default]
    Passthrough,
    /// Missing or malformed parameters answer 400, non-zero exits answer 502.
    Strict,
}

impl FromStr for StatusMapping {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "passthrough" => Ok(Self::Passthrough),
            "strict" => Ok(Self::Strict),
            _ => Err("expected passthrough or strict"),
        }
    }
}

impl fmt::Display for StatusMapping {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passthrough => write!(f, "passthrough"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ServerConfig {
    #[clap(long, default_value = "0.0.0.0:80", env = "BRIDGE_HOST_PORT")]
    pub host_port: SocketAddr,
    #[clap(long, env = "BRIDGE_API_PREFIX")]
    pub api_prefix: Option<String>,
    #[clap(long, default_value = "passthrough", env = "BRIDGE_STATUS_MAPPING")]
    pub status_mapping: StatusMapping,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host_port: SocketAddr::from(([0, 0, 0, 0], 80)),
            api_prefix: None,
            status_mapping: StatusMapping::default(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct LncliSettings {
    #[clap(long, default_value = "lncli", env = "BRIDGE_LNCLI_PATH")]
    pub lncli_path: PathBuf,

    #[clap(long, default_value = "regtest", env = "BRIDGE_LND_NETWORK")]
    pub network: String,

    #[clap(
        long,
        default_value = "bitcoin-lightning.simnet.primary:10009",
        env = "BRIDGE_LND_RPC_SERVER"
    )]
    pub rpc_server: String,

    #[clap(
        long,
        default_value = "/root/.lnd/data/chain/bitcoin/regtest/admin.macaroon",
        env = "BRIDGE_LND_MACAROON_PATH"
    )]
    pub macaroon_path: PathBuf,

    #[clap(long, default_value = "/root/.lnd/tls.cert", env = "BRIDGE_LND_TLS_CERT_PATH")]
    pub tls_cert_path: PathBuf,

    #[clap(long, default_value_t = 60, env = "BRIDGE_LNCLI_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

impl LncliSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LncliSettings {
    fn default() -> Self {
        Self {
            lncli_path: "lncli".into(),
            network: "regtest".to_owned(),
            rpc_server: "bitcoin-lightning.simnet.primary:10009".to_owned(),
            macaroon_path: "/root/.lnd/data/chain/bitcoin/regtest/admin.macaroon".into(),
            tls_cert_path: "/root/.lnd/tls.cert".into(),
            timeout_secs: 60,
        }
    }
}

impl fmt::Display for LncliSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lncli: {}, network: {}, rpc_server: {}, macaroon_path: {}, tls_cert_path: {}, timeout: {}s",
            self.lncli_path.display(),
            self.network,
            self.rpc_server,
            self.macaroon_path.display(),
            self.tls_cert_path.display(),
            self.timeout_secs
        )
    }
}

#[derive(Debug, Clone, Default, Parser)]
pub struct TracingConfig {
    #[clap(long, env = "BRIDGE_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BuildParams {
    pub commit_hash: Option<String>,
    pub build_time: Option<String>,
    pub cargo_pkg_version: Option<String>,
}

impl BuildParams {
    pub fn from_env() -> Self {
        Self {
            commit_hash: env::var("COMMITHASH").ok(),
            build_time: env::var("BUILDTIME").ok(),
            cargo_pkg_version: Some(env!("CARGO_PKG_VERSION").to_owned()),
        }
    }

    pub fn full_version(&self) -> String {
        format!(
            "{}-{}",
            self.cargo_pkg_version.as_deref().unwrap_or("unknown"),
            self.commit_hash.as_deref().unwrap_or("unknown")
        )
    }
}
