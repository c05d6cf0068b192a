use alloc::boxed::Box;
use core::any::TypeId;

use dx_reflect::Reflect;
use dx_reflect::info::TypeInfo;
use dx_reflect::registry::{TypeMeta, TypeRegistry, TypeTraitDefault};

use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};

/// The host object model the engine addresses through [`Datum`](crate::Datum)s.
///
/// Only the lookups are required; everything else is derived from the
/// [`TypeMeta`] they return. [`TypeRegistry`] is the shipped implementation.
pub trait HostModel {
    fn type_meta(&self, type_id: TypeId) -> Option<&TypeMeta>;

    fn type_meta_by_name(&self, name: &str) -> Option<&TypeMeta>;

    /// Field names of a struct type, in declaration order.
    fn field_names(&self, type_id: TypeId) -> Option<&'static [&'static str]> {
        let info = self.type_meta(type_id)?.type_info();
        info.as_struct().ok().map(|info| info.field_names())
    }

    /// Builds a default instance of a registered type.
    fn construct(&self, info: &'static TypeInfo) -> DcResult<Box<dyn Reflect>> {
        let meta = self.type_meta(info.type_id()).ok_or_else(|| {
            Diagnostic::new(ErrorCode::TypeNotRegistered).with_arg("type", info.type_path())
        })?;
        let default = meta.get_trait::<TypeTraitDefault>().ok_or_else(|| {
            Diagnostic::new(ErrorCode::MissingTypeTrait)
                .with_arg("type", meta.type_name())
                .with_arg("trait", "TypeTraitDefault")
        })?;
        Ok(default.default())
    }

    /// The runtime type of a value.
    #[inline]
    fn type_of(&self, value: &dyn Reflect) -> TypeId {
        value.ty_id()
    }
}

impl HostModel for TypeRegistry {
    #[inline]
    fn type_meta(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.get(type_id)
    }

    /// Tries the short name first, then the full type path.
    fn type_meta_by_name(&self, name: &str) -> Option<&TypeMeta> {
        self.get_with_type_name(name)
            .or_else(|| self.get_with_type_path(name))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use dx_reflect::info::Typed;
    use dx_reflect::registry::TypeRegistry;

    use super::HostModel;
    use crate::diagnostic::ErrorCode;
    use crate::fixtures::KeyableStruct;

    #[test]
    fn construct_and_field_names() {
        let mut registry = TypeRegistry::new();
        registry.register::<KeyableStruct>();

        let value = registry.construct(KeyableStruct::type_info()).unwrap();
        assert_eq!(registry.type_of(&*value), TypeId::of::<KeyableStruct>());
        assert_eq!(
            registry.field_names(TypeId::of::<KeyableStruct>()),
            Some(&["Name", "Index"][..])
        );
        assert!(registry.type_meta_by_name("KeyableStruct").is_some());
    }

    #[test]
    fn construct_unregistered_type() {
        let registry = TypeRegistry::empty();
        let err = registry.construct(u8::type_info()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeNotRegistered);
        assert_eq!(err.arg("type"), Some("u8"));
    }
}
