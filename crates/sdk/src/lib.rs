//! Roster SDK - Rust Client Library
//!
//! Typed client for the Roster daemon's employee and role methods.
//!
//! # Example
//!
//! ```no_run
//! use roster_sdk::RosterClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RosterClient::connect("http://127.0.0.1:9630").await?;
//!
//!     let ada = client.employees().create("Ada Lovelace").await?;
//!     let admin = client.roles().create("Admin").await?;
//!
//!     println!("employee {} / role {}", ada.id, admin.id);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::{EntityClient, RosterClient};
pub use error::{code, Result, SdkError};
pub use types::{DeleteManyResponse, DeleteResponse, Entity, EntityList};
