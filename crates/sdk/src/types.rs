//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC results of the daemon.

use serde::{Deserialize, Serialize};

/// An employee or role as returned by the daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,
}

/// Result of `list` and `get_many`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityList {
    pub items: Vec<Entity>,
    pub count: usize,
}

/// Result of `delete`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Result of `delete_many`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyResponse {
    pub deleted: u64,
}
