//! RPC method names per entity kind
//!
//! Names are `<kind>.<operation>.v1`; the version suffix changes only on
//! incompatible parameter or result changes.

use roster_core::domain::{Employee, EntityKind, Role};

/// Method names registered for one entity kind
pub trait RpcMethods: EntityKind {
    const CREATE: &'static str;
    const GET: &'static str;
    const LIST: &'static str;
    const GET_MANY: &'static str;
    const DELETE: &'static str;
    const DELETE_MANY: &'static str;
}

macro_rules! rpc_methods {
    ($kind:ty, $prefix:literal) => {
        impl RpcMethods for $kind {
            const CREATE: &'static str = concat!($prefix, ".create.v1");
            const GET: &'static str = concat!($prefix, ".get.v1");
            const LIST: &'static str = concat!($prefix, ".list.v1");
            const GET_MANY: &'static str = concat!($prefix, ".get_many.v1");
            const DELETE: &'static str = concat!($prefix, ".delete.v1");
            const DELETE_MANY: &'static str = concat!($prefix, ".delete_many.v1");
        }
    };
}

rpc_methods!(Employee, "employee");
rpc_methods!(Role, "role");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_follow_kind_prefix() {
        assert_eq!(Employee::CREATE, "employee.create.v1");
        assert_eq!(Role::DELETE_MANY, "role.delete_many.v1");
        assert!(Role::GET.starts_with(Role::NAME));
    }
}
