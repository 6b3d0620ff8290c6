//! Router factory: one sub-router per model, one procedure per operation.
//!
//! A [`RouterBuilder`] is the unbuilt state; [`RouterBuilder::build`] consumes it and yields
//! an immutable [`AppRouter`]. Rebuilding means starting from a new builder.

mod procedure;

pub use procedure::Procedure;

use crate::accessor::RequestContext;
use crate::config::Schema;
use crate::error::AppError;
use crate::operation::Operation;
use crate::validators::operation_validators;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// The 13 procedures of one model.
#[derive(Clone, Debug)]
pub struct ModelRouter {
    pub model: String,
    pub key: String,
    procedures: BTreeMap<Operation, Procedure>,
}

impl ModelRouter {
    fn build(schema: &Schema, model: &str) -> Self {
        let procedures = operation_validators(schema, model)
            .into_inner()
            .into_iter()
            .map(|(op, input)| (op, Procedure::new(model, op, input)))
            .collect();
        Self {
            model: model.to_string(),
            key: model.to_lowercase(),
            procedures,
        }
    }

    pub fn procedure(&self, op: Operation) -> Option<&Procedure> {
        self.procedures.get(&op)
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.procedures.values()
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

/// Lowercased model name -> sub-router. Immutable once built.
#[derive(Clone, Debug, Default)]
pub struct AppRouter {
    models: BTreeMap<String, ModelRouter>,
}

impl AppRouter {
    pub fn model(&self, key: &str) -> Option<&ModelRouter> {
        self.models.get(key)
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelRouter> {
        self.models.values()
    }

    pub fn procedures(&self) -> impl Iterator<Item = &Procedure> {
        self.models.values().flat_map(ModelRouter::procedures)
    }

    /// Look up `"<model key>.<operation>"`.
    pub fn procedure(&self, path: &str) -> Option<&Procedure> {
        let (key, op) = path.rsplit_once('.')?;
        let op = Operation::from_str(op).ok()?;
        self.models.get(key)?.procedure(op)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn create_caller(&self, ctx: RequestContext) -> Caller<'_> {
        Caller { router: self, ctx }
    }
}

/// Server-side entry point bound to one request context.
pub struct Caller<'r> {
    router: &'r AppRouter,
    ctx: RequestContext,
}

impl Caller<'_> {
    pub async fn call(&self, path: &str, input: Value) -> Result<Value, AppError> {
        let procedure = self
            .router
            .procedure(path)
            .ok_or_else(|| AppError::NotFound(format!("procedure {}", path)))?;
        procedure.call(&self.ctx, input).await
    }

    /// `model` may be given in any case; it is lowercased for lookup.
    pub async fn call_op(&self, model: &str, op: Operation, input: Value) -> Result<Value, AppError> {
        let procedure = self
            .router
            .model(&model.to_lowercase())
            .and_then(|m| m.procedure(op))
            .ok_or_else(|| AppError::NotFound(format!("procedure {}.{}", model.to_lowercase(), op)))?;
        procedure.call(&self.ctx, input).await
    }
}

pub struct RouterBuilder<'s> {
    schema: &'s Schema,
    models: Vec<String>,
}

impl<'s> RouterBuilder<'s> {
    /// Starts with every model the schema declares.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            models: schema.model_names().map(str::to_string).collect(),
        }
    }

    /// Replace the model list. Names missing from the schema still get (pass-through) routers.
    pub fn models<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> AppRouter {
        let mut models = BTreeMap::new();
        for name in &self.models {
            let sub = ModelRouter::build(self.schema, name);
            if let Some(prev) = models.insert(sub.key.clone(), sub) {
                tracing::warn!(model = %name, replaced = %prev.model, "models share a lowercased name; last one wins");
            }
        }
        let router = AppRouter { models };
        tracing::info!(
            models = router.len(),
            procedures = router.procedures().count(),
            "router built"
        );
        router
    }
}

/// Build a router for `model_names` from `schema`.
pub fn build_router<S: AsRef<str>>(schema: &Schema, model_names: &[S]) -> AppRouter {
    RouterBuilder::new(schema)
        .models(model_names.iter().map(|s| s.as_ref().to_string()))
        .build()
}
