//! Kind-specific views of reflected values.
//!
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) and
//! [`Reflect::reflect_mut`](crate::Reflect::reflect_mut) return one of these
//! views, chosen by the value's [`ReflectKind`].

// -----------------------------------------------------------------------------
// Modules

mod enum_ops;
mod list_ops;
mod map_ops;
mod optional_ops;
mod set_ops;
mod struct_ops;

// -----------------------------------------------------------------------------
// Exports

pub use enum_ops::Enum;
pub use list_ops::List;
pub use map_ops::Map;
pub use optional_ops::Optional;
pub use set_ops::Set;
pub use struct_ops::Struct;

pub(crate) use enum_ops::enum_debug;
pub(crate) use list_ops::list_debug;
pub(crate) use map_ops::map_debug;
pub(crate) use optional_ops::optional_debug;
pub(crate) use set_ops::set_debug;
pub(crate) use struct_ops::struct_debug;

use crate::Reflect;
use crate::info::ReflectKind;

// -----------------------------------------------------------------------------
// ReflectRef / ReflectMut

/// A shared, kind-specific view of a reflected value.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Set(&'a dyn Set),
    Map(&'a dyn Map),
    Optional(&'a dyn Optional),
    Enum(&'a dyn Enum),
    Opaque(&'a dyn Reflect),
}

/// An exclusive, kind-specific view of a reflected value.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Set(&'a mut dyn Set),
    Map(&'a mut dyn Map),
    Optional(&'a mut dyn Optional),
    Enum(&'a mut dyn Enum),
    Opaque(&'a mut dyn Reflect),
}

macro_rules! impl_kind {
    ($view:ident) => {
        impl $view<'_> {
            pub const fn kind(&self) -> ReflectKind {
                match self {
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::List(_) => ReflectKind::List,
                    Self::Set(_) => ReflectKind::Set,
                    Self::Map(_) => ReflectKind::Map,
                    Self::Optional(_) => ReflectKind::Optional,
                    Self::Enum(_) => ReflectKind::Enum,
                    Self::Opaque(_) => ReflectKind::Opaque,
                }
            }
        }
    };
}

impl_kind!(ReflectRef);
impl_kind!(ReflectMut);
