//! Shared application state for the HTTP transport. The router is built once and never mutated.

use crate::accessor::{DataAccessor, RequestContext};
use crate::router::AppRouter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<AppRouter>,
    pub accessor: Arc<dyn DataAccessor>,
}

impl AppState {
    pub fn new(router: AppRouter, accessor: Arc<dyn DataAccessor>) -> Self {
        Self {
            router: Arc::new(router),
            accessor,
        }
    }

    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.accessor.clone())
    }
}
