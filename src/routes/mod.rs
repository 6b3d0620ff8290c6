//! Route assembly for the HTTP transport.

pub mod common;
pub mod rpc;

pub use common::common_routes;
pub use rpc::rpc_routes;

use crate::error::AppError;
use crate::settings::Settings;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: common routes at the root, procedures under `/rpc`.
/// `settings.body_limit` is the only request body limit.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(common_routes())
        .nest("/rpc", rpc_routes(state))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(settings.body_limit))
        .layer(map_response(json_payload_too_large))
        .layer(TraceLayer::new_for_http())
}

/// The body limit layer answers oversized requests with plain text; give them the JSON error body.
async fn json_payload_too_large(res: Response) -> Response {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);
    if res.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge("request body exceeds the configured limit".into()).into_response();
    }
    res
}
