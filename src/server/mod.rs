//! HTTP surface (feature `server`).
//!
//! | Route                 | Handler                           |
//! |-----------------------|-----------------------------------|
//! | `GET /`               | [`handlers::root`]                |
//! | `POST /api/summarize` | [`handlers::summarize_direct`]    |
//! | `POST /summarize`     | [`handlers::summarize_internal`]  |

pub mod handlers;
pub mod upload;

use crate::summarize::Summarizer;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Room for multipart boundaries and the small text fields on top of the
/// file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared application state accessible from all handlers.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<Summarizer>,
}

impl AppState {
    pub fn new(summarizer: Summarizer) -> Self {
        Self {
            summarizer: Arc::new(summarizer),
        }
    }
}

/// Build the application router.
///
/// `allowed_origin` restricts CORS to one origin; `None` allows any.
pub fn router(state: AppState, allowed_origin: Option<HeaderValue>) -> Router {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(origin),
        None => AllowOrigin::from(Any),
    };
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit = DefaultBodyLimit::max(
        state.summarizer.config().max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
    );

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/summarize", post(handlers::summarize_direct))
        .route("/summarize", post(handlers::summarize_internal))
        .layer(body_limit)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
