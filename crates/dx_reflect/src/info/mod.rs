//! Static type descriptions.
//!
//! Every reflected type owns exactly one [`TypeInfo`], created lazily on first
//! access through [`Typed::type_info`] and then kept for the rest of the
//! program. Child type descriptions (field types, list items, map keys) are
//! stored as function pointers so that recursive types do not recurse at
//! construction time.

// -----------------------------------------------------------------------------
// Modules

mod container_info;
mod enum_info;
mod struct_info;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use container_info::{ListInfo, MapInfo, OptionalInfo, SetInfo};
pub use enum_info::{EnumInfo, EnumVariant};
pub use struct_info::{NamedField, StructInfo};
pub use ty::Type;
pub use type_info::{OpaqueInfo, ReflectKind, ReflectKindError, TypeInfo};
pub use typed::{DynamicTyped, Typed};
