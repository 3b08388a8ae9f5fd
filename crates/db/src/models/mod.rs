//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Every owned entity implements [`opsdeck_core::ownership::Owned`] so
//! handlers can run a single `authorize` check before mutating it.

pub mod activity;
pub mod campaign;
pub mod idea;
pub mod notification;
pub mod roadmap;
pub mod sales;
pub mod task;
pub mod user;

/// Implement [`opsdeck_core::ownership::Owned`] for a row struct with
/// `id` and `user_id` columns.
macro_rules! impl_owned {
    ($ty:ty, $entity:literal) => {
        impl opsdeck_core::ownership::Owned for $ty {
            const ENTITY: &'static str = $entity;

            fn id(&self) -> opsdeck_core::types::DbId {
                self.id
            }

            fn owner_id(&self) -> opsdeck_core::types::DbId {
                self.user_id
            }
        }
    };
}

pub(crate) use impl_owned;
