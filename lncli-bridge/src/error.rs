use std::{path::PathBuf, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{event, Level};

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Missing query parameter {0}")]
    MissingParameter(&'static str),

    #[error("Invalid amount {0}")]
    InvalidAmount(String),

    #[error("Failed to spawn {0:?} - Error {1}")]
    Spawn(PathBuf, std::io::Error),

    #[error("lncli did not exit within {0:?}")]
    Timeout(Duration),

    #[error("lncli exited with code {exit_code:?}")]
    Downstream {
        exit_code: Option<i32>,
        stdout: String,
    },

    #[error("IO Error {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error {0}")]
    Config(String),

    #[error("lncli task failed {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        event!(Level::ERROR, "error in bridge: {:?}", self);

        let status = match &self {
            Self::MissingParameter(_) | Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Downstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Spawn(..) | Self::Io(_) | Self::Config(_) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // body is the raw cli stdout, not the json envelope
        if let Self::Downstream { stdout, .. } = self {
            return (status, stdout).into_response();
        }

        let body = Json(json!({
            "code": 0,
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}
