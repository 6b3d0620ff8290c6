//! HTTP handlers for the generated RPC procedures.

pub mod rpc;
pub use rpc::*;
