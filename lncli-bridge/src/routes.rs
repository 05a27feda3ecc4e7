use axum::extract::{Query, State};
use tracing::instrument;

use crate::{
    bridge::Bridge,
    error::BridgeError,
    model::{GenerateInvoiceQuery, PayInvoiceQuery},
};

#[utoipa::path(
        get,
        path = "/pay_invoice",
        params(PayInvoiceQuery),
        responses(
            (status = 200, description = "stdout of lncli payinvoice", body = String, content_type = "text/plain"),
            (status = 400, description = "missing invoice (strict mapping)"),
            (status = 500, description = "lncli could not be started"),
            (status = 502, description = "lncli exited non-zero (strict mapping)", body = String, content_type = "text/plain"),
            (status = 504, description = "lncli did not exit in time")
        ),
    )]
#[instrument(name = "get_pay_invoice", skip(bridge), err)]
pub async fn get_pay_invoice(
    State(bridge): State<Bridge>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, BridgeError> {
    let query = PayInvoiceQuery::from_pairs(&pairs);
    let output = bridge.pay_invoice(query.invoice).await?;
    Ok(output.stdout_text())
}

#[utoipa::path(
        get,
        path = "/generate_invoice",
        params(GenerateInvoiceQuery),
        responses(
            (status = 200, description = "stdout of lncli addinvoice", body = String, content_type = "text/plain"),
            (status = 400, description = "missing or non-integer amount (strict mapping)"),
            (status = 500, description = "lncli could not be started"),
            (status = 502, description = "lncli exited non-zero (strict mapping)", body = String, content_type = "text/plain"),
            (status = 504, description = "lncli did not exit in time")
        ),
    )]
#[instrument(name = "get_generate_invoice", skip(bridge), err)]
pub async fn get_generate_invoice(
    State(bridge): State<Bridge>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<String, BridgeError> {
    let query = GenerateInvoiceQuery::from_pairs(&pairs);
    let output = bridge.generate_invoice(query.amount).await?;
    Ok(output.stdout_text())
}
