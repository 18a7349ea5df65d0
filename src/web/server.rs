//! Axum server exposing the simulator over HTTP.

use crate::economy::constants::{DEFAULT_TIME_BUCKET_SECONDS, MAX_ARMOR_PRICE, MIN_ARMOR_PRICE};
use crate::simulator::{run_simulation, RunConfig, SimError, SimReport};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Input limits shown next to the form.
#[derive(Debug, Clone, Serialize)]
pub struct Constraints {
    pub min_threshold: u32,
    pub max_threshold: u32,
    pub time_bucket_seconds: u32,
}

/// Payload of `GET /config`.
#[derive(Debug, Clone, Serialize)]
pub struct FormDefaults {
    pub defaults: RunConfig,
    pub constraints: Constraints,
}

pub fn form_defaults() -> FormDefaults {
    FormDefaults {
        defaults: RunConfig::default(),
        constraints: Constraints {
            min_threshold: MIN_ARMOR_PRICE,
            max_threshold: MAX_ARMOR_PRICE,
            time_bucket_seconds: DEFAULT_TIME_BUCKET_SECONDS,
        },
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<SimError> for HttpError {
    fn from(err: SimError) -> Self {
        let status = match err {
            SimError::Config(_) | SimError::InsufficientShopGold { .. } => StatusCode::BAD_REQUEST,
            SimError::ThresholdIndex { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/config", get(config))
        .route("/simulate", post(simulate))
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../../web/index.html"))
}

async fn config() -> Json<FormDefaults> {
    Json(form_defaults())
}

async fn simulate(Json(config): Json<RunConfig>) -> Result<Json<SimReport>, HttpError> {
    config
        .validate_price_ladder()
        .map_err(|err| HttpError::from(SimError::from(err)))?;

    let report = tokio::task::spawn_blocking(move || run_simulation(&config))
        .await
        .map_err(|err| HttpError::internal(format!("simulation task failed: {err}")))?
        .map_err(|err| {
            warn!(error = %err, "rejected simulation request");
            HttpError::from(err)
        })?;

    Ok(Json(report))
}

/// Start the web server on the given port
pub async fn start_web_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("Web server listening on http://localhost:{}", port);

    axum::serve(listener, router()).await
}
