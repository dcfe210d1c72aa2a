//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP. Binds to localhost unless configured
//! otherwise.

use crate::handler::EntityHandler;
use crate::methods::RpcMethods;
use crate::types::{CreateParams, IdParams, IdsParams};
use jsonrpsee::server::{RegisterMethodError, Server, ServerHandle};
use jsonrpsee::RpcModule;
use roster_core::domain::{Employee, Role};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method: {0}")]
    Register(#[from] RegisterMethodError),
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    employees: Arc<EntityHandler<Employee>>,
    roles: Arc<EntityHandler<Role>>,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        employees: Arc<EntityHandler<Employee>>,
        roles: Arc<EntityHandler<Role>>,
    ) -> Self {
        Self {
            config,
            employees,
            roles,
        }
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the bound address (useful when port 0 was requested) and the
    /// handle used to stop the server.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server.local_addr().map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

        let mut module = RpcModule::new(());
        register_entity_methods(&mut module, self.employees)?;
        register_entity_methods(&mut module, self.roles)?;

        info!(
            addr = %local_addr,
            methods = module.method_names().count(),
            "JSON-RPC server started"
        );

        let handle = server.start(module);
        Ok((local_addr, handle))
    }
}

/// Register the six CRUD methods of one entity kind
fn register_entity_methods<K: RpcMethods>(
    module: &mut RpcModule<()>,
    handler: Arc<EntityHandler<K>>,
) -> Result<(), RegisterMethodError> {
    let h = handler.clone();
    module.register_async_method(K::CREATE, move |params, _, _| {
        let h = h.clone();
        async move {
            let req: CreateParams = params.parse()?;
            h.create(req).await
        }
    })?;

    let h = handler.clone();
    module.register_async_method(K::GET, move |params, _, _| {
        let h = h.clone();
        async move {
            let req: IdParams = params.parse()?;
            h.get(req).await
        }
    })?;

    let h = handler.clone();
    module.register_async_method(K::LIST, move |_, _, _| {
        let h = h.clone();
        async move { h.list().await }
    })?;

    let h = handler.clone();
    module.register_async_method(K::GET_MANY, move |params, _, _| {
        let h = h.clone();
        async move {
            let req: IdsParams = params.parse()?;
            h.get_many(req).await
        }
    })?;

    let h = handler.clone();
    module.register_async_method(K::DELETE, move |params, _, _| {
        let h = h.clone();
        async move {
            let req: IdParams = params.parse()?;
            h.delete(req).await
        }
    })?;

    let h = handler;
    module.register_async_method(K::DELETE_MANY, move |params, _, _| {
        let h = h.clone();
        async move {
            let req: IdsParams = params.parse()?;
            h.delete_many(req).await
        }
    })?;

    Ok(())
}
