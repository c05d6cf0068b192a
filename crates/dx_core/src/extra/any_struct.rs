use alloc::boxed::Box;
use alloc::sync::Arc;

use dx_reflect::Reflect;
use dx_reflect::info::TypeInfo;

/// A shared, heap-stored struct of any registered type.
///
/// Cloning shares the payload; the payload is dropped with the last clone.
/// The engine treats it as transparent: it reads and writes as the struct it
/// holds, or as [`DataEntry::None`](crate::DataEntry::None) when empty. Its
/// JSON form names the payload type under a leading `"$type"` key.
///
/// # Example
///
/// ```
/// use dx_core::extra::AnyStruct;
/// use dx_reflect::reflect_struct;
///
/// reflect_struct! {
///     #[derive(Debug, Default)]
///     struct Health {
///         value: i32,
///     }
/// }
///
/// let any = AnyStruct::new(Health { value: 3 });
/// let shared = any.clone();
///
/// assert_eq!(shared.shared_count(), 2);
/// assert_eq!(any.downcast_ref::<Health>().map(|h| h.value), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnyStruct(Option<Arc<dyn Reflect>>);

impl AnyStruct {
    pub fn new<T: Reflect>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    pub fn from_boxed(value: Box<dyn Reflect>) -> Self {
        Self(Some(Arc::from(value)))
    }

    #[inline]
    pub const fn none() -> Self {
        Self(None)
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub fn get(&self) -> Option<&dyn Reflect> {
        self.0.as_deref()
    }

    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.get()?.downcast_ref::<T>()
    }

    /// The type info of the payload.
    #[inline]
    pub fn payload_type_info(&self) -> Option<&'static TypeInfo> {
        self.get().map(|value| value.reflect_type_info())
    }

    /// Number of handles sharing the payload; zero when empty.
    #[inline]
    pub fn shared_count(&self) -> usize {
        self.0.as_ref().map_or(0, Arc::strong_count)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.0 = None;
    }
}

dx_reflect::impl_reflect_opaque!(AnyStruct);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use dx_reflect::info::Typed;

    use super::AnyStruct;
    use crate::fixtures::KeyableStruct;
    use crate::types::Name;

    #[test]
    fn shared_payload_lifetime() {
        let mut first = AnyStruct::new(KeyableStruct {
            name: Name::from("Shared"),
            index: 1,
        });
        assert!(first.is_valid());
        assert!(core::ptr::eq(
            first.payload_type_info().unwrap(),
            KeyableStruct::type_info()
        ));

        let second = first.clone();
        assert_eq!(second.shared_count(), 2);

        first.reset();
        assert!(!first.is_valid());
        assert_eq!(first.shared_count(), 0);
        assert_eq!(second.shared_count(), 1);
        assert_eq!(second.downcast_ref::<KeyableStruct>().unwrap().index, 1);
    }
}
