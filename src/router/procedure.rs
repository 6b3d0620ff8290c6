//! One generated endpoint: validate -> locate delegate -> dispatch -> return.

use crate::accessor::{dispatch, AccessorError, RequestContext};
use crate::error::{AppError, ConfigError};
use crate::operation::{EndpointKind, Operation};
use crate::shape::Shape;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct Procedure {
    /// Model name as declared in the schema.
    pub model: String,
    /// Lowercased model name: router key and accessor key.
    pub key: String,
    pub operation: Operation,
    pub input: Shape,
}

impl Procedure {
    pub fn new(model: &str, operation: Operation, input: Shape) -> Self {
        Self {
            model: model.to_string(),
            key: model.to_lowercase(),
            operation,
            input,
        }
    }

    /// `"<model key>.<operation>"`, e.g. `user.findMany`.
    pub fn path(&self) -> String {
        format!("{}.{}", self.key, self.operation)
    }

    pub fn kind(&self) -> EndpointKind {
        self.operation.kind()
    }

    /// Run one request. Accessor results and failures are returned unchanged.
    pub async fn call(&self, ctx: &RequestContext, input: Value) -> Result<Value, AppError> {
        self.input.parse(&input)?;

        let delegate = ctx.accessor.delegate(&self.key).ok_or_else(|| {
            tracing::warn!(procedure = %self.path(), "no data accessor for model");
            ConfigError::MissingAccessor { model: self.key.clone() }
        })?;

        tracing::debug!(procedure = %self.path(), kind = %self.kind(), "dispatch");
        match dispatch(delegate.as_ref(), self.operation, input).await {
            Ok(out) => Ok(out),
            Err(AccessorError::Unimplemented(operation)) => {
                tracing::warn!(procedure = %self.path(), "data accessor does not implement operation");
                Err(ConfigError::MissingOperation {
                    model: self.key.clone(),
                    operation,
                }
                .into())
            }
            Err(e) => Err(AppError::Accessor(e)),
        }
    }
}
