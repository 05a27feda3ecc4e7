use utoipa::IntoParams;

#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PayInvoiceQuery {
    /// bolt11 payment request, passed to `lncli payinvoice --pay_req`
    pub invoice: Option<String>,
}

#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateInvoiceQuery {
    /// amount in sat, passed to `lncli addinvoice --amt`
    pub amount: Option<String>,
}

impl PayInvoiceQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            invoice: first_value(pairs, "invoice"),
        }
    }
}

impl GenerateInvoiceQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            amount: first_value(pairs, "amount"),
        }
    }
}

/// First value of a possibly repeated query key.
fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Captured result of a single lncli run. Stderr is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    /// `None` if the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub const fn new(stdout: Vec<u8>, exit_code: Option<i32>) -> Self {
        Self { stdout, exit_code }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}
