//! RPC handlers: queries over GET (`?input=<json>`), mutations over POST (JSON body).

use crate::error::AppError;
use crate::operation::{EndpointKind, Operation};
use crate::response::{success_many, success_one};
use crate::router::Procedure;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    /// URL-encoded JSON input; absent means no input.
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcedureInfo {
    pub path: String,
    pub model: String,
    pub operation: Operation,
    pub kind: EndpointKind,
}

fn lookup<'a>(state: &'a AppState, path: &str, expected: EndpointKind) -> Result<&'a Procedure, AppError> {
    let procedure = state
        .router
        .procedure(path)
        .ok_or_else(|| AppError::NotFound(format!("procedure {}", path)))?;
    if procedure.kind() != expected {
        let method = match procedure.kind() {
            EndpointKind::Query => "GET",
            EndpointKind::Mutation => "POST",
        };
        return Err(AppError::MethodNotSupported(format!(
            "{} is a {}; use {}",
            path,
            procedure.kind(),
            method
        )));
    }
    Ok(procedure)
}

fn parse_input(raw: &[u8]) -> Result<Value, AppError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(raw).map_err(|e| AppError::BadRequest(format!("input is not valid JSON: {}", e)))
}

fn body_error(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(rejection.body_text())
    } else {
        AppError::BadRequest(rejection.body_text())
    }
}

pub async fn query(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<QueryParams>, QueryRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let procedure = lookup(&state, &path, EndpointKind::Query)?;
    let input = match params.input {
        Some(raw) => parse_input(raw.as_bytes())?,
        None => Value::Null,
    };
    let out = procedure.call(&state.context(), input).await?;
    Ok(success_one(out))
}

pub async fn mutation(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let body = body.map_err(body_error)?;
    let procedure = lookup(&state, &path, EndpointKind::Mutation)?;
    let input = parse_input(&body)?;
    let out = procedure.call(&state.context(), input).await?;
    Ok(success_one(out))
}

pub async fn list_procedures(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let procedures: Vec<ProcedureInfo> = state
        .router
        .procedures()
        .map(|p| ProcedureInfo {
            path: p.path(),
            model: p.model.clone(),
            operation: p.operation,
            kind: p.kind(),
        })
        .collect();
    success_many(procedures)
}
