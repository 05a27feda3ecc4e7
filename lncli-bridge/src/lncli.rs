use std::{
    ffi::{OsStr, OsString},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::{config::LncliSettings, error::BridgeError, model::CommandOutput};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Lncli: Send + Sync {
    /// `lncli payinvoice --force --pay_req=<invoice>`
    async fn pay_invoice(&self, invoice: String) -> Result<CommandOutput, BridgeError>;

    /// `lncli addinvoice --amt=<amount>`
    async fn add_invoice(&self, amount: String) -> Result<CommandOutput, BridgeError>;
}

/// Runs the lncli executable as a child process, one process per call.
///
/// Arguments are handed to the executable as a vector and never go through a
/// shell. The child is killed when the timeout expires.
#[derive(Debug, Clone)]
pub struct LncliCommand {
    settings: LncliSettings,
}

impl LncliCommand {
    pub const fn new(settings: LncliSettings) -> Self {
        Self { settings }
    }

    fn global_args(&self) -> Vec<OsString> {
        vec![
            flag("--network=", &self.settings.network),
            flag("--rpcserver=", &self.settings.rpc_server),
            flag("--macaroonpath=", &self.settings.macaroon_path),
            flag("--tlscertpath=", &self.settings.tls_cert_path),
        ]
    }

    pub fn pay_invoice_args(&self, invoice: &str) -> Vec<OsString> {
        let mut args = self.global_args();
        args.push("payinvoice".into());
        args.push("--force".into());
        args.push(flag("--pay_req=", invoice));
        args
    }

    pub fn add_invoice_args(&self, amount: &str) -> Vec<OsString> {
        let mut args = self.global_args();
        args.push("addinvoice".into());
        args.push(flag("--amt=", amount));
        args
    }

    async fn run(&self, args: Vec<OsString>) -> Result<CommandOutput, BridgeError> {
        let program = &self.settings.lncli_path;
        info!("{} {}", program.display(), render(&args));

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| BridgeError::Spawn(program.clone(), err))?;

        let timeout = self.settings.timeout();
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!("lncli timed out after {:?}, killing it", timeout);
                return Err(BridgeError::Timeout(timeout));
            }
        };

        if !output.stderr.is_empty() {
            warn!("lncli stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }
        info!("lncli exited with {}", output.status);
        debug!("lncli stdout: {}", String::from_utf8_lossy(&output.stdout).trim_end());

        Ok(CommandOutput::new(output.stdout, output.status.code()))
    }
}

#[async_trait]
impl Lncli for LncliCommand {
    async fn pay_invoice(&self, invoice: String) -> Result<CommandOutput, BridgeError> {
        self.run(self.pay_invoice_args(&invoice)).await
    }

    async fn add_invoice(&self, amount: String) -> Result<CommandOutput, BridgeError> {
        self.run(self.add_invoice_args(&amount)).await
    }
}

fn flag(name: &str, value: impl AsRef<OsStr>) -> OsString {
    let mut arg = OsString::from(name);
    arg.push(value);
    arg
}

fn render(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
