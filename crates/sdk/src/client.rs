//! Roster Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{DeleteManyResponse, DeleteResponse, Entity, EntityList};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Roster daemon client
///
/// # Example
///
/// ```no_run
/// use roster_sdk::RosterClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RosterClient::connect("http://127.0.0.1:9630").await?;
/// let roles = client.roles().list().await?;
/// println!("{} roles", roles.count);
/// # Ok(())
/// # }
/// ```
pub struct RosterClient {
    client: HttpClient,
}

impl RosterClient {
    /// Connect to the Roster daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9630`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// Methods under `employee.*`
    pub fn employees(&self) -> EntityClient<'_> {
        EntityClient::new(&self.client, "employee")
    }

    /// Methods under `role.*`
    pub fn roles(&self) -> EntityClient<'_> {
        EntityClient::new(&self.client, "role")
    }
}

/// CRUD calls for one entity kind
pub struct EntityClient<'a> {
    client: &'a HttpClient,
    kind: &'static str,
}

impl<'a> EntityClient<'a> {
    fn new(client: &'a HttpClient, kind: &'static str) -> Self {
        Self { client, kind }
    }

    fn method(&self, operation: &str) -> String {
        format!("{}.{}.v1", self.kind, operation)
    }

    async fn call<R: DeserializeOwned>(&self, operation: &str, params: ObjectParams) -> Result<R> {
        let response = self.client.request(&self.method(operation), params).await?;
        Ok(response)
    }

    /// Create an entity; fails with a conflict if the name is taken
    pub async fn create(&self, name: impl Into<String>) -> Result<Entity> {
        let mut params = ObjectParams::new();
        params.insert("name", name.into())?;
        self.call("create", params).await
    }

    pub async fn get(&self, id: i64) -> Result<Entity> {
        let mut params = ObjectParams::new();
        params.insert("id", id)?;
        self.call("get", params).await
    }

    pub async fn list(&self) -> Result<EntityList> {
        let response = self.client.request(&self.method("list"), rpc_params![]).await?;
        Ok(response)
    }

    /// Entities for the given IDs; unknown IDs are skipped
    pub async fn get_many(&self, ids: &[i64]) -> Result<EntityList> {
        let mut params = ObjectParams::new();
        params.insert("ids", ids)?;
        self.call("get_many", params).await
    }

    pub async fn delete(&self, id: i64) -> Result<DeleteResponse> {
        let mut params = ObjectParams::new();
        params.insert("id", id)?;
        self.call("delete", params).await
    }

    pub async fn delete_many(&self, ids: &[i64]) -> Result<DeleteManyResponse> {
        let mut params = ObjectParams::new();
        params.insert("ids", ids)?;
        self.call("delete_many", params).await
    }
}
