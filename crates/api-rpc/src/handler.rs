//! RPC Method Handlers
//!
//! One handler per entity kind, translating RPC parameters into service
//! requests and application errors into RPC error objects.

use crate::error::to_rpc_error;
use crate::types::{
    CreateParams, DeleteManyResponse, DeleteResponse, EntityDto, IdParams, IdsParams,
    ListResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use roster_core::application::{EntityService, IdRequest};
use roster_core::domain::EntityKind;
use std::sync::Arc;
use tracing::debug;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler for one entity kind
pub struct EntityHandler<K: EntityKind> {
    service: Arc<EntityService<K>>,
}

impl<K: EntityKind> EntityHandler<K> {
    pub fn new(service: Arc<EntityService<K>>) -> Self {
        Self { service }
    }

    /// <kind>.create.v1
    pub async fn create(&self, params: CreateParams) -> RpcResult<EntityDto> {
        debug!(entity = K::NAME, "rpc create");
        self.service
            .create(params.into())
            .await
            .map(EntityDto::from)
            .map_err(to_rpc_error)
    }

    /// <kind>.get.v1
    pub async fn get(&self, params: IdParams) -> RpcResult<EntityDto> {
        self.service
            .find_by_id(params.into())
            .await
            .map(EntityDto::from)
            .map_err(to_rpc_error)
    }

    /// <kind>.list.v1
    pub async fn list(&self) -> RpcResult<ListResponse> {
        self.service
            .find_all()
            .await
            .map(ListResponse::from)
            .map_err(to_rpc_error)
    }

    /// <kind>.get_many.v1
    pub async fn get_many(&self, params: IdsParams) -> RpcResult<ListResponse> {
        self.service
            .find_by_ids(params.into())
            .await
            .map(ListResponse::from)
            .map_err(to_rpc_error)
    }

    /// <kind>.delete.v1
    pub async fn delete(&self, params: IdParams) -> RpcResult<DeleteResponse> {
        let req = IdRequest::from(params);
        self.service.delete_by_id(req).await.map_err(to_rpc_error)?;

        Ok(DeleteResponse {
            id: req.id,
            deleted: true,
        })
    }

    /// <kind>.delete_many.v1
    pub async fn delete_many(&self, params: IdsParams) -> RpcResult<DeleteManyResponse> {
        let res = self
            .service
            .delete_by_ids(params.into())
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteManyResponse {
            deleted: res.deleted,
        })
    }
}
