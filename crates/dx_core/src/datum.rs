#![expect(unsafe_code, reason = "Datums turn type-erased pointers back into references.")]

use core::any::TypeId;
use core::fmt;

use dx_ptr::{Ptr, PtrMut};
use dx_reflect::Reflect;
use dx_reflect::info::TypeInfo;
use dx_reflect::ops::{ReflectMut, ReflectRef};
use dx_reflect::registry::{TypeMeta, TypeTraitFromPtr};

use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::host::HostModel;

// -----------------------------------------------------------------------------
// Lookup

fn resolve<'a>(
    host: &'a dyn HostModel,
    value: &dyn Reflect,
) -> DcResult<(&'a TypeMeta, &'a TypeTraitFromPtr)> {
    let type_id = value.ty_id();
    let meta = host.type_meta(type_id).ok_or_else(|| {
        Diagnostic::new(ErrorCode::TypeNotRegistered)
            .with_arg("type", value.reflect_type_info().type_path())
    })?;

    match meta.get_trait::<TypeTraitFromPtr>() {
        Some(cast) if cast.type_id() == type_id => Ok((meta, cast)),
        _ => Err(Diagnostic::new(ErrorCode::MissingTypeTrait)
            .with_arg("type", meta.type_name())
            .with_arg("trait", "TypeTraitFromPtr")),
    }
}

fn no_field(type_name: &str, name: &str) -> Diagnostic {
    Diagnostic::new(ErrorCode::UnknownField)
        .with_arg("type", type_name)
        .with_arg("field", name)
}

fn not_a_struct(type_name: &str) -> Diagnostic {
    Diagnostic::new(ErrorCode::TypeMismatch)
        .with_arg("type", type_name)
        .with_note("fields exist only on structs and classes")
}

// -----------------------------------------------------------------------------
// Datum

/// An exclusive, type-erased handle to one location in a host object graph.
///
/// It pairs a [`PtrMut`] with the [`TypeMeta`] of the pointee. It never owns
/// the pointee; writing through it mutates the host graph in place.
///
/// # Example
///
/// ```
/// use dx_core::Datum;
/// use dx_reflect::reflect_struct;
/// use dx_reflect::registry::TypeRegistry;
///
/// reflect_struct! {
///     #[derive(Default)]
///     struct Stats {
///         level: u8 => "Level",
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Stats>();
///
/// let mut stats = Stats::default();
/// let datum = Datum::new(&registry, &mut stats).unwrap();
/// let mut level = datum.field("Level").unwrap();
/// *level.downcast_mut::<u8>().unwrap() = 3;
///
/// assert_eq!(stats.level, 3);
/// ```
pub struct Datum<'a> {
    ptr: PtrMut<'a>,
    meta: &'a TypeMeta,
    cast: &'a TypeTraitFromPtr,
    host: &'a dyn HostModel,
}

impl<'a> Datum<'a> {
    /// Fails if the type of `value` is not registered in `host`.
    pub fn new(host: &'a dyn HostModel, value: &'a mut dyn Reflect) -> DcResult<Self> {
        let (meta, cast) = resolve(host, value)?;
        Ok(Self {
            ptr: PtrMut::from_mut(value),
            meta,
            cast,
            host,
        })
    }

    #[inline]
    pub fn type_meta(&self) -> &'a TypeMeta {
        self.meta
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.meta.type_id()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.meta.type_info()
    }

    #[inline]
    pub fn host(&self) -> &'a dyn HostModel {
        self.host
    }

    pub fn reflect(&self) -> &dyn Reflect {
        // SAFETY: `cast` was checked against the type id of the pointee in `new`.
        unsafe { self.cast.as_reflect(self.ptr.borrow()) }
    }

    pub fn reflect_mut(&mut self) -> &mut dyn Reflect {
        // SAFETY: see `reflect`.
        unsafe { self.cast.as_reflect_mut(self.ptr.reborrow()) }
    }

    pub fn into_reflect(self) -> &'a mut dyn Reflect {
        // SAFETY: see `reflect`.
        unsafe { self.cast.as_reflect_mut(self.ptr) }
    }

    #[inline]
    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.reflect_mut().downcast_mut::<T>()
    }

    /// A shorter-lived datum to the same location.
    pub fn reborrow(&mut self) -> Datum<'_> {
        Datum {
            ptr: self.ptr.reborrow(),
            meta: self.meta,
            cast: self.cast,
            host: self.host,
        }
    }

    /// A shared datum to the same location.
    pub fn as_ref(&self) -> DatumRef<'_> {
        DatumRef {
            ptr: self.ptr.borrow(),
            meta: self.meta,
            cast: self.cast,
            host: self.host,
        }
    }

    /// The datum of a named field of a struct or class.
    pub fn field(self, name: &str) -> DcResult<Datum<'a>> {
        let host = self.host;
        let type_name = self.meta.type_name();
        match self.into_reflect().reflect_mut() {
            ReflectMut::Struct(value) => match value.field_mut(name) {
                Some(field) => Datum::new(host, field),
                None => Err(no_field(type_name, name)),
            },
            _ => Err(not_a_struct(type_name)),
        }
    }
}

impl fmt::Debug for Datum<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datum")
            .field("ptr", &self.ptr)
            .field("type", &self.meta.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DatumRef

/// A shared, type-erased handle to one location in a host object graph.
#[derive(Clone, Copy)]
pub struct DatumRef<'a> {
    ptr: Ptr<'a>,
    meta: &'a TypeMeta,
    cast: &'a TypeTraitFromPtr,
    host: &'a dyn HostModel,
}

impl<'a> DatumRef<'a> {
    /// Fails if the type of `value` is not registered in `host`.
    pub fn new(host: &'a dyn HostModel, value: &'a dyn Reflect) -> DcResult<Self> {
        let (meta, cast) = resolve(host, value)?;
        Ok(Self {
            ptr: Ptr::from_ref(value),
            meta,
            cast,
            host,
        })
    }

    #[inline]
    pub fn type_meta(&self) -> &'a TypeMeta {
        self.meta
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.meta.type_id()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.meta.type_info()
    }

    #[inline]
    pub fn host(&self) -> &'a dyn HostModel {
        self.host
    }

    pub fn reflect(self) -> &'a dyn Reflect {
        // SAFETY: `cast` was checked against the type id of the pointee in `new`.
        unsafe { self.cast.as_reflect(self.ptr) }
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(self) -> Option<&'a T> {
        self.reflect().downcast_ref::<T>()
    }

    /// The datum of a named field of a struct or class.
    pub fn field(self, name: &str) -> DcResult<DatumRef<'a>> {
        let type_name = self.meta.type_name();
        match self.reflect().reflect_ref() {
            ReflectRef::Struct(value) => match value.field(name) {
                Some(field) => DatumRef::new(self.host, field),
                None => Err(no_field(type_name, name)),
            },
            _ => Err(not_a_struct(type_name)),
        }
    }
}

impl fmt::Debug for DatumRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatumRef")
            .field("ptr", &self.ptr)
            .field("type", &self.meta.type_path())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use dx_reflect::registry::TypeRegistry;

    use super::{Datum, DatumRef};
    use crate::diagnostic::ErrorCode;
    use crate::fixtures::{KeyableStruct, ScalarStruct};
    use crate::types::Name;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<KeyableStruct>();
        registry
    }

    #[test]
    fn write_through_field_datum() {
        let registry = registry();
        let mut value = KeyableStruct::default();

        let mut datum = Datum::new(&registry, &mut value).unwrap();
        assert_eq!(datum.type_id(), TypeId::of::<KeyableStruct>());
        {
            let mut index = datum.reborrow().field("Index").unwrap();
            *index.downcast_mut::<i16>().unwrap() = -3;
        }
        let mut name = datum.field("Name").unwrap();
        *name.downcast_mut::<Name>().unwrap() = Name::from("Foo");

        assert_eq!(value.index, -3);
        assert_eq!(value.name.as_str(), "Foo");
    }

    #[test]
    fn shared_datum_reads_fields() {
        let registry = registry();
        let value = KeyableStruct {
            name: Name::from("Bar"),
            index: 9,
        };

        let datum = DatumRef::new(&registry, &value).unwrap();
        let index = datum.field("Index").unwrap();
        assert_eq!(index.downcast_ref::<i16>(), Some(&9));

        let err = datum.field("Ghost").unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownField);
        assert_eq!(err.arg("field"), Some("Ghost"));

        let err = index.field("Deeper").unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
    }

    #[test]
    fn unregistered_type_is_rejected() {
        let registry = TypeRegistry::new();
        let mut value = ScalarStruct::default();

        let err = Datum::new(&registry, &mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeNotRegistered);
    }
}
