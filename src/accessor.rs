//! Data accessor seam: the only place generated endpoints touch persistence.
//!
//! An accessor exposes one [`ModelDelegate`] per lowercased model name. Each delegate has
//! one async method per [`Operation`], called with the already-validated JSON input.
//! Methods a delegate does not override report [`AccessorError::Unimplemented`], which the
//! router surfaces as a configuration error.

use crate::operation::Operation;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AccessorError {
    #[error("operation {0} is not implemented")]
    Unimplemented(Operation),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl AccessorError {
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        AccessorError::Other(err.into())
    }
}

pub type AccessorResult = Result<Value, AccessorError>;

#[async_trait]
pub trait ModelDelegate: Send + Sync {
    async fn find_many(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::FindMany))
    }

    async fn find_unique(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::FindUnique))
    }

    async fn find_first(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::FindFirst))
    }

    async fn create(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Create))
    }

    async fn create_many(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::CreateMany))
    }

    async fn update(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Update))
    }

    async fn update_many(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::UpdateMany))
    }

    async fn upsert(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Upsert))
    }

    async fn delete(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Delete))
    }

    async fn delete_many(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::DeleteMany))
    }

    async fn count(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Count))
    }

    async fn aggregate(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::Aggregate))
    }

    async fn group_by(&self, _args: Value) -> AccessorResult {
        Err(AccessorError::Unimplemented(Operation::GroupBy))
    }
}

/// Call the delegate method for `op`. Exhaustive: adding an operation fails to compile here.
pub async fn dispatch(delegate: &dyn ModelDelegate, op: Operation, args: Value) -> AccessorResult {
    match op {
        Operation::FindMany => delegate.find_many(args).await,
        Operation::FindUnique => delegate.find_unique(args).await,
        Operation::FindFirst => delegate.find_first(args).await,
        Operation::Create => delegate.create(args).await,
        Operation::CreateMany => delegate.create_many(args).await,
        Operation::Update => delegate.update(args).await,
        Operation::UpdateMany => delegate.update_many(args).await,
        Operation::Upsert => delegate.upsert(args).await,
        Operation::Delete => delegate.delete(args).await,
        Operation::DeleteMany => delegate.delete_many(args).await,
        Operation::Count => delegate.count(args).await,
        Operation::Aggregate => delegate.aggregate(args).await,
        Operation::GroupBy => delegate.group_by(args).await,
    }
}

/// Delegate lookup by lowercased model name.
pub trait DataAccessor: Send + Sync {
    fn delegate(&self, model_key: &str) -> Option<Arc<dyn ModelDelegate>>;
}

/// Map-backed accessor.
#[derive(Clone, Default)]
pub struct AccessorRegistry {
    delegates: HashMap<String, Arc<dyn ModelDelegate>>,
}

impl AccessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the lowercased model name.
    pub fn with_model(mut self, model: &str, delegate: Arc<dyn ModelDelegate>) -> Self {
        self.delegates.insert(model.to_lowercase(), delegate);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl DataAccessor for AccessorRegistry {
    fn delegate(&self, model_key: &str) -> Option<Arc<dyn ModelDelegate>> {
        self.delegates.get(model_key).cloned()
    }
}

/// Per-request context handed to every endpoint.
#[derive(Clone)]
pub struct RequestContext {
    pub accessor: Arc<dyn DataAccessor>,
}

impl RequestContext {
    pub fn new(accessor: Arc<dyn DataAccessor>) -> Self {
        Self { accessor }
    }
}
