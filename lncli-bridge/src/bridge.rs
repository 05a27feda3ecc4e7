use std::sync::Arc;

use crate::{
    config::{BridgeConfig, BuildParams, LncliSettings, ServerConfig, StatusMapping, TracingConfig},
    error::BridgeError,
    lncli::{Lncli, LncliCommand},
    model::CommandOutput,
};

#[derive(Clone)]
pub struct Bridge {
    pub lncli: Arc<dyn Lncli + Send + Sync>,
    pub config: BridgeConfig,
    pub build_params: BuildParams,
}

impl Bridge {
    pub fn new(
        lncli: Arc<dyn Lncli + Send + Sync>,
        config: BridgeConfig,
        build_params: BuildParams,
    ) -> Self {
        Self {
            lncli,
            config,
            build_params,
        }
    }

    pub fn builder() -> BridgeBuilder {
        BridgeBuilder::new()
    }

    const fn status_mapping(&self) -> StatusMapping {
        self.config.server.status_mapping
    }

    // lncli runs on its own task, a dropped request leaves it running until
    // it exits or hits the lncli timeout
    pub async fn pay_invoice(&self, invoice: Option<String>) -> Result<CommandOutput, BridgeError> {
        let invoice = self.required(invoice, "invoice")?;
        let lncli = self.lncli.clone();
        let output = tokio::spawn(async move { lncli.pay_invoice(invoice).await }).await??;
        self.classify(output)
    }

    pub async fn generate_invoice(
        &self,
        amount: Option<String>,
    ) -> Result<CommandOutput, BridgeError> {
        let amount = self.required(amount, "amount")?;
        if self.status_mapping() == StatusMapping::Strict && amount.parse::<u64>().is_err() {
            return Err(BridgeError::InvalidAmount(amount));
        }
        let lncli = self.lncli.clone();
        let output = tokio::spawn(async move { lncli.add_invoice(amount).await }).await??;
        self.classify(output)
    }

    /// A missing parameter is forwarded as an empty value unless the mapping is strict.
    fn required(&self, value: Option<String>, name: &'static str) -> Result<String, BridgeError> {
        match (value, self.status_mapping()) {
            (Some(value), StatusMapping::Strict) if value.is_empty() => {
                Err(BridgeError::MissingParameter(name))
            }
            (Some(value), _) => Ok(value),
            (None, StatusMapping::Passthrough) => Ok(String::new()),
            (None, StatusMapping::Strict) => Err(BridgeError::MissingParameter(name)),
        }
    }

    fn classify(&self, output: CommandOutput) -> Result<CommandOutput, BridgeError> {
        if output.is_success() || self.status_mapping() == StatusMapping::Passthrough {
            return Ok(output);
        }
        Err(BridgeError::Downstream {
            exit_code: output.exit_code,
            stdout: output.stdout_text(),
        })
    }
}

#[derive(Default)]
pub struct BridgeBuilder {
    lncli: Option<Arc<dyn Lncli + Send + Sync>>,
    lncli_settings: Option<LncliSettings>,
    server_config: Option<ServerConfig>,
    tracing_config: Option<TracingConfig>,
}

impl BridgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lncli_settings(mut self, settings: LncliSettings) -> Self {
        self.lncli_settings = Some(settings);
        self
    }

    /// Use a custom [`Lncli`] instead of spawning the configured executable.
    pub fn with_lncli(mut self, lncli: Arc<dyn Lncli + Send + Sync>) -> Self {
        self.lncli = Some(lncli);
        self
    }

    pub fn with_server(mut self, server_config: Option<ServerConfig>) -> Self {
        self.server_config = server_config;
        self
    }

    pub fn with_tracing(mut self, tracing_config: Option<TracingConfig>) -> Self {
        self.tracing_config = tracing_config;
        self
    }

    pub fn build(self) -> Result<Bridge, BridgeError> {
        let lncli_settings = self.lncli_settings.unwrap_or_default();

        let lncli: Arc<dyn Lncli + Send + Sync> = match self.lncli {
            Some(lncli) => lncli,
            None => {
                if lncli_settings.timeout_secs == 0 {
                    return Err(BridgeError::Config(
                        "lncli timeout must be at least one second".to_owned(),
                    ));
                }
                Arc::new(LncliCommand::new(lncli_settings.clone()))
            }
        };

        Ok(Bridge::new(
            lncli,
            BridgeConfig {
                server: self.server_config.unwrap_or_default(),
                lncli: lncli_settings,
                tracing: self.tracing_config.unwrap_or_default(),
            },
            BuildParams::from_env(),
        ))
    }
}
