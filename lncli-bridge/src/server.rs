use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bridge::Bridge;
use crate::config::TracingConfig;
use crate::routes::{get_generate_invoice, get_pay_invoice};

pub fn init_tracing(config: &TracingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (plain, json) = if config.log_json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

pub async fn run_server(bridge: Bridge) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&bridge.config.server.host_port).await?;
    serve(listener, bridge).await
}

/// Serves the bridge on an already bound listener.
pub async fn serve(listener: TcpListener, bridge: Bridge) -> anyhow::Result<()> {
    if let Some(ref buildtime) = bridge.build_params.build_time {
        info!("build time: {}", buildtime);
    }
    if let Some(ref commithash) = bridge.build_params.commit_hash {
        info!("git commit-hash: {}", commithash);
    }
    info!("version: {}", bridge.build_params.full_version());
    info!("listening on: {}", listener.local_addr()?);
    info!("lncli: {}", bridge.config.lncli);
    info!("status-mapping: {}", bridge.config.server.status_mapping);

    axum::serve(
        listener,
        app(bridge)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_headers(Any)
                    .allow_methods(Any)
                    .expose_headers(Any),
            )
            .into_make_service(),
    )
    .await?;

    Ok(())
}

#[derive(OpenApi)]
#[openapi(paths(
    crate::routes::get_pay_invoice,
    crate::routes::get_generate_invoice,
    get_health
))]
struct ApiDoc;

fn app(bridge: Bridge) -> Router {
    let bridge_routes = Router::new()
        .route("/pay_invoice", get(get_pay_invoice))
        .route("/generate_invoice", get(get_generate_invoice));

    let general_routes = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(get_health));

    let prefix = bridge
        .config
        .server
        .api_prefix
        .as_deref()
        .map(|prefix| prefix.trim_matches('/'))
        .unwrap_or_default();

    let router = if prefix.is_empty() {
        bridge_routes
    } else {
        Router::new().nest(&format!("/{prefix}"), bridge_routes)
    };

    router
        .merge(general_routes)
        .with_state(bridge)
        .layer(TraceLayer::new_for_http())
}

#[utoipa::path(
        get,
        path = "/health",
        responses(
            (status = 200, description = "health check")
        ),
    )]
async fn get_health() -> impl IntoResponse {
    StatusCode::OK
}
