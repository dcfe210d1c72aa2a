//! JSON-RPC API Layer
//!
//! Exposes employee and role CRUD as JSON-RPC 2.0 methods over HTTP and maps
//! application error kinds to stable error codes.

pub mod error;
pub mod handler;
pub mod methods;
pub mod server;
pub mod types;

pub use jsonrpsee::server::ServerHandle;
pub use server::{RpcServer, RpcServerConfig, ServerError};
