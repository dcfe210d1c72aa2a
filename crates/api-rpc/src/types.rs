//! RPC Request/Response Types
//!
//! Parameters and results of the `<kind>.<operation>.v1` methods. The same
//! shapes serve employees and roles.

use roster_core::application::{CreateEntityRequest, IdRequest, IdsRequest};
use roster_core::domain::EntityResponse;
use serde::{Deserialize, Serialize};

/// <kind>.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub name: String,
}

impl From<CreateParams> for CreateEntityRequest {
    fn from(params: CreateParams) -> Self {
        CreateEntityRequest::new(params.name)
    }
}

/// <kind>.get.v1 and <kind>.delete.v1
#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: i64,
}

impl From<IdParams> for IdRequest {
    fn from(params: IdParams) -> Self {
        IdRequest { id: params.id }
    }
}

/// <kind>.get_many.v1 and <kind>.delete_many.v1
///
/// `ids` may be omitted so that validation, not deserialization, reports it.
#[derive(Debug, Default, Deserialize)]
pub struct IdsParams {
    #[serde(default)]
    pub ids: Option<Vec<i64>>,
}

impl From<IdsParams> for IdsRequest {
    fn from(params: IdsParams) -> Self {
        IdsRequest { ids: params.ids }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityDto {
    pub id: i64,
    pub name: String,
}

impl From<EntityResponse> for EntityDto {
    fn from(res: EntityResponse) -> Self {
        Self {
            id: res.id,
            name: res.name,
        }
    }
}

/// <kind>.list.v1 and <kind>.get_many.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub items: Vec<EntityDto>,
    pub count: usize,
}

impl From<Vec<EntityResponse>> for ListResponse {
    fn from(items: Vec<EntityResponse>) -> Self {
        let items: Vec<EntityDto> = items.into_iter().map(EntityDto::from).collect();
        Self {
            count: items.len(),
            items,
        }
    }
}

/// <kind>.delete.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

/// <kind>.delete_many.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteManyResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_params_allow_missing_field() {
        let params: IdsParams = serde_json::from_str("{}").unwrap();
        assert!(params.ids.is_none());

        let params: IdsParams = serde_json::from_str(r#"{"ids":[1,2]}"#).unwrap();
        assert_eq!(params.ids, Some(vec![1, 2]));
    }

    #[test]
    fn test_list_response_counts_items() {
        let list = ListResponse::from(vec![
            EntityResponse {
                id: 1,
                name: "Ada".to_string(),
            },
            EntityResponse {
                id: 2,
                name: "Alan".to_string(),
            },
        ]);
        assert_eq!(list.count, 2);
        assert_eq!(list.items[1].name, "Alan");
    }
}
