#![expect(unsafe_code, reason = "Cast pointers to references is unsafe.")]

use alloc::boxed::Box;
use core::any::TypeId;

use dx_ptr::{Ptr, PtrMut};

use crate::Reflect;
use crate::info::Typed;
use crate::registry::FromType;

// -----------------------------------------------------------------------------
// TypeTraitDefault

/// Constructs a default instance of the registered type.
///
/// # Examples
///
/// ```
/// use dx_reflect::Reflect;
/// use dx_reflect::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
/// let generator = registry
///     .get_with_type_name("String").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// let s: Box<dyn Reflect> = generator.default();
/// assert_eq!(s.take::<String>().unwrap(), "");
/// ```
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Reflect>,
}

impl TypeTraitDefault {
    #[inline(always)]
    pub fn default(&self) -> Box<dyn Reflect> {
        (self.func)()
    }
}

impl<T: Default + Typed + Reflect> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeTraitFromPtr

/// Turns a type-erased pointer back into `dyn Reflect`.
#[derive(Clone)]
pub struct TypeTraitFromPtr {
    ty_id: TypeId,
    from_ptr: unsafe fn(Ptr) -> &dyn Reflect,
    from_ptr_mut: unsafe fn(PtrMut) -> &mut dyn Reflect,
}

impl TypeTraitFromPtr {
    /// The [`TypeId`] this trait was built for.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.ty_id
    }

    /// Convert `Ptr` into `&dyn Reflect`.
    ///
    /// # Safety
    ///
    /// `val` must point to a value of the type this trait was built for,
    /// see [`type_id`](Self::type_id).
    pub unsafe fn as_reflect<'a>(&self, val: Ptr<'a>) -> &'a dyn Reflect {
        // SAFETY: contract uphold by the caller.
        unsafe { (self.from_ptr)(val) }
    }

    /// Convert `PtrMut` into `&mut dyn Reflect`.
    ///
    /// # Safety
    ///
    /// `val` must point to a value of the type this trait was built for,
    /// see [`type_id`](Self::type_id).
    pub unsafe fn as_reflect_mut<'a>(&self, val: PtrMut<'a>) -> &'a mut dyn Reflect {
        // SAFETY: contract uphold by the caller.
        unsafe { (self.from_ptr_mut)(val) }
    }
}

impl<T: Typed + Reflect> FromType<T> for TypeTraitFromPtr {
    fn from_type() -> Self {
        TypeTraitFromPtr {
            ty_id: TypeId::of::<T>(),
            from_ptr: |ptr| {
                // SAFETY: only reachable through `as_reflect`, whose caller
                // guarantees the pointee is a `T`.
                ptr.debug_assert_aligned::<T>();
                unsafe { ptr.as_ref::<T>() as &dyn Reflect }
            },
            from_ptr_mut: |ptr| {
                // SAFETY: same as above.
                ptr.debug_assert_aligned::<T>();
                unsafe { ptr.consume::<T>() as &mut dyn Reflect }
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TypeTraitDefault, TypeTraitFromPtr};
    use crate::Reflect;
    use crate::registry::FromType;
    use dx_ptr::{Ptr, PtrMut};

    #[test]
    fn from_ptr_round_trip() {
        let cast = <TypeTraitFromPtr as FromType<u32>>::from_type();
        assert_eq!(cast.type_id(), core::any::TypeId::of::<u32>());

        let mut value = 7u32;
        let reflect = unsafe { cast.as_reflect_mut(PtrMut::from_mut(&mut value)) };
        *reflect.downcast_mut::<u32>().unwrap() = 9;

        let reflect = unsafe { cast.as_reflect(Ptr::from_ref(&value)) };
        assert_eq!(reflect.downcast_ref::<u32>(), Some(&9));
    }

    #[test]
    fn default_builds_boxed_value() {
        let generator = <TypeTraitDefault as FromType<i64>>::from_type();
        let value: Box<dyn Reflect> = generator.default();
        assert_eq!(value.take::<i64>().ok(), Some(0));
    }
}
