use std::time::{Duration, Instant};

use itests::{
    lncli_mock::{scripts, MOCK_INVOICE, MOCK_PAYMENT_ERROR},
    setup::start_bridge,
};
use lnclibridge::config::StatusMapping;
use reqwest::StatusCode;

#[tokio::test(flavor = "multi_thread")]
async fn test_generate_invoice() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.add_invoice(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/generate_invoice?amount=50000")).await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(MOCK_INVOICE, response.text().await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pay_invoice_args() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/pay_invoice?invoice=lnbcrt10u1pjx")).await?;
    assert_eq!(StatusCode::OK, response.status());

    let body = response.text().await?;
    let args = body.lines().collect::<Vec<_>>();
    assert_eq!(
        vec![
            "--network=regtest",
            "--rpcserver=bitcoin-lightning.simnet.primary:10009",
            "--macaroonpath=/root/.lnd/data/chain/bitcoin/regtest/admin.macaroon",
            "--tlscertpath=/root/.lnd/tls.cert",
            "payinvoice",
            "--force",
            "--pay_req=lnbcrt10u1pjx",
        ],
        args
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_amount_passthrough() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/generate_invoice")).await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(Some("--amt="), response.text().await?.lines().last());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_amount_strict() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Strict, 10).await?;

    let response = reqwest::get(format!("http://{addr}/generate_invoice")).await?;
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_payment_error_passthrough() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.payment_error(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/pay_invoice?invoice=lnbc1...")).await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(MOCK_PAYMENT_ERROR, response.text().await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_payment_error_strict() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.payment_error(), StatusMapping::Strict, 10).await?;

    let response = reqwest::get(format!("http://{addr}/pay_invoice?invoice=lnbc1...")).await?;
    assert_eq!(StatusCode::BAD_GATEWAY, response.status());
    assert_eq!(MOCK_PAYMENT_ERROR, response.text().await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invoice_is_not_interpreted_by_a_shell() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let marker = scripts.path().join("pwned");
    let invoice = format!("lnbc1;touch {0} && $(touch {0})", marker.display());

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/pay_invoice"))
        .query(&[("invoice", invoice.as_str())])
        .send()
        .await?;
    assert_eq!(StatusCode::OK, response.status());

    let body = response.text().await?;
    assert_eq!(
        Some(format!("--pay_req={invoice}").as_str()),
        body.lines().last()
    );
    assert!(!marker.exists());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_kills_lncli() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.hang(), StatusMapping::Passthrough, 1).await?;

    let started = Instant::now();
    let response = reqwest::get(format!("http://{addr}/generate_invoice?amount=1000")).await?;
    assert_eq!(StatusCode::GATEWAY_TIMEOUT, response.status());
    assert!(started.elapsed() < Duration::from_secs(10));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_disconnect_leaves_lncli_running() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.slow_finish(), StatusMapping::Passthrough, 10).await?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(700))
        .build()?;
    let result = client
        .get(format!("http://{addr}/pay_invoice?invoice=lnbcrt1"))
        .send()
        .await;
    assert!(result.is_err());

    let marker = scripts.slow_finished_marker();
    let deadline = Instant::now() + Duration::from_secs(8);
    while !marker.exists() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(marker.exists(), "lncli was killed after the client went away");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_param_takes_first_value() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let response =
        reqwest::get(format!("http://{addr}/pay_invoice?invoice=lnbc1a&invoice=lnbc1b")).await?;
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!(Some("--pay_req=lnbc1a"), response.text().await?.lines().last());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_executable() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.missing(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/pay_invoice?invoice=lnbc1")).await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_requests_do_not_mix() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let (first, second) = tokio::join!(
        reqwest::get(format!("http://{addr}/generate_invoice?amount=111")),
        reqwest::get(format!("http://{addr}/generate_invoice?amount=222")),
    );
    let (first, second) = (first?.text().await?, second?.text().await?);

    assert_eq!(Some("--amt=111"), first.lines().last());
    assert_eq!(Some("--amt=222"), second.lines().last());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health() -> anyhow::Result<()> {
    let scripts = scripts();
    let addr = start_bridge(scripts.echo_args(), StatusMapping::Passthrough, 10).await?;

    let response = reqwest::get(format!("http://{addr}/health")).await?;
    assert_eq!(StatusCode::OK, response.status());
    Ok(())
}
