//! CRUD router: schema-driven input validators and procedure dispatch for every model.

pub mod accessor;
pub mod config;
pub mod error;
pub mod handlers;
pub mod operation;
pub mod response;
pub mod router;
pub mod routes;
pub mod settings;
pub mod shape;
pub mod state;
pub mod validators;

pub use accessor::{AccessorError, AccessorRegistry, AccessorResult, DataAccessor, ModelDelegate, RequestContext};
pub use config::{load_from_path, load_from_str, resolve_model, Schema};
pub use error::{AppError, ConfigError};
pub use operation::{EndpointKind, Operation};
pub use router::{build_router, AppRouter, Caller, Procedure, RouterBuilder};
pub use routes::{app, common_routes, rpc_routes};
pub use settings::Settings;
pub use shape::{Shape, ValidationError};
pub use state::AppState;
pub use validators::{operation_validators, OperationValidatorSet};
