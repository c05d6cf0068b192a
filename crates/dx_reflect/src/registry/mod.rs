//! Type registry for runtime lookups.
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`](crate::info::TypeInfo) plus a `TypeTrait` table.
//! - [`GetTypeMeta`]: builds the `TypeMeta` of a type and registers its dependencies.
//! - [`TypeRegistry`]: stores `TypeMeta`s by id, full path and short name.
//! - Built-in type traits:
//!     - [`TypeTraitDefault`]: construct a default instance.
//!     - [`TypeTraitFromPtr`]: turn a type-erased pointer back into `dyn Reflect`.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{TypeTraitDefault, TypeTraitFromPtr};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
