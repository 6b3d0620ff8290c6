//! RPC routes built from the generated router.
//! One parameterized path serves every procedure; the handler resolves it and enforces GET for
//! queries and POST for mutations.

use crate::handlers::rpc::{list_procedures, mutation, query};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn rpc_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_procedures))
        .route("/:path", get(query).post(mutation))
        .with_state(state)
}
