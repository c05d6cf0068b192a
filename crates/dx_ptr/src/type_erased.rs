use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_ptr {
    ($ptr:ident) => {
        impl From<$ptr<'_>> for NonNull<u8> {
            #[inline(always)]
            fn from(ptr: $ptr<'_>) -> Self {
                ptr.0
            }
        }

        impl $ptr<'_> {
            /// Check if the pointer is aligned to type `T`.
            #[inline]
            pub fn is_aligned<T>(&self) -> bool {
                self.0.as_ptr().cast::<T>().is_aligned()
            }

            /// Alignment check that disappears in release builds.
            #[cfg_attr(debug_assertions, track_caller)]
            #[cfg_attr(not(debug_assertions), inline(always))]
            pub fn debug_assert_aligned<T>(&self) {
                debug_assert!(
                    self.is_aligned::<T>(),
                    "pointer is not aligned. Address {:p} does not have alignment {} for type {}",
                    self.0,
                    align_of::<T>(),
                    core::any::type_name::<T>(),
                );
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($ptr), self.0)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Ptr

/// A type-erased shared pointer, similar to `&'a dyn Any` without the vtable.
///
/// The pointee must stay valid and unchanged while the pointer is alive;
/// `'a` ties it to the borrow it was created from.
///
/// # Examples
///
/// ```
/// # use dx_ptr::Ptr;
/// let x = 8i32;
/// let ptr = Ptr::from_ref(&x);
///
/// ptr.debug_assert_aligned::<i32>();
/// let rx = unsafe { ptr.as_ref::<i32>() };
/// assert_eq!(*rx, 8);
/// ```
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Ptr<'a>(NonNull<u8>, PhantomData<&'a u8>);

impl_ptr!(Ptr);

impl<'a> Ptr<'a> {
    /// Create a `Ptr` from a raw `NonNull<u8>` pointer.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid object of the intended pointee type.
    /// - The pointee must stay valid and unmodified for `'a`.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> Ptr<'a> {
        Ptr(ptr, PhantomData)
    }

    /// Creates a `Ptr` from a shared reference, keeping its lifetime.
    ///
    /// Unsized referents (`&dyn Trait`, `&[T]`) are accepted; the metadata is
    /// dropped and only the data address is kept.
    #[inline(always)]
    pub const fn from_ref<T: ?Sized>(val: &'a T) -> Ptr<'a> {
        Ptr(NonNull::from_ref(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const u8 {
        self.0.as_ptr()
    }

    /// Convert this [`Ptr`] into a `&T` with the same lifetime `'a`.
    ///
    /// # Safety
    ///
    /// - `T` must match the actual type of the pointee.
    /// - The pointer must be properly aligned for `T`.
    #[inline(always)]
    pub const unsafe fn as_ref<T>(self) -> &'a T {
        // SAFETY: Type correct, ptr aligned and pointee valid object.
        unsafe { &*self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a> {
    #[inline]
    fn from(val: &'a T) -> Self {
        Self::from_ref(val)
    }
}

// -----------------------------------------------------------------------------
// PtrMut

/// A type-erased exclusive pointer, similar to `&'a mut dyn Any` without the vtable.
///
/// It is not `Copy`; [`reborrow`](PtrMut::reborrow) hands out a shorter-lived
/// copy the same way `&mut *r` does.
///
/// # Examples
///
/// ```
/// # use dx_ptr::PtrMut;
/// let mut x = 8i32;
/// let mut ptr = PtrMut::from_mut(&mut x);
///
/// let rx = unsafe { ptr.reborrow().consume::<i32>() };
/// *rx += 2;
/// assert_eq!(x, 10);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a>(NonNull<u8>, PhantomData<&'a mut u8>);

impl_ptr!(PtrMut);

impl<'a> PtrMut<'a> {
    /// Create a `PtrMut` from a raw `NonNull<u8>` pointer.
    ///
    /// # Safety
    ///
    /// - `ptr` must point to a valid object of the intended pointee type.
    /// - The pointee must be valid for reads and writes for `'a`,
    ///   and nothing else may access it during that time.
    #[inline(always)]
    pub const unsafe fn new(ptr: NonNull<u8>) -> PtrMut<'a> {
        PtrMut(ptr, PhantomData)
    }

    /// Creates a `PtrMut` from an exclusive reference, keeping its lifetime.
    #[inline(always)]
    pub const fn from_mut<T: ?Sized>(val: &'a mut T) -> PtrMut<'a> {
        PtrMut(NonNull::from_mut(val).cast(), PhantomData)
    }

    /// Gets the underlying pointer, erasing the associated lifetime.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut u8 {
        self.0.as_ptr()
    }

    /// Gets a shorter-lived `PtrMut` to the same pointee.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_> {
        PtrMut(self.0, PhantomData)
    }

    /// Gets a shared [`Ptr`] to the same pointee.
    #[inline(always)]
    pub const fn borrow(&self) -> Ptr<'_> {
        Ptr(self.0, PhantomData)
    }

    /// Convert this pointer into `&'a mut T`, consuming it.
    ///
    /// # Safety
    ///
    /// - `T` must match the actual type of the pointee.
    /// - The pointer must be properly aligned for `T`.
    #[inline(always)]
    pub const unsafe fn consume<T>(self) -> &'a mut T {
        // SAFETY: Type correct, ptr aligned and pointee valid object.
        unsafe { &mut *self.0.as_ptr().cast::<T>() }
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a> {
    #[inline]
    fn from(val: &'a mut T) -> Self {
        Self::from_mut(val)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Ptr, PtrMut};

    #[test]
    fn reborrow_writes_through() {
        let mut value = [1u16, 2, 3];
        let mut ptr = PtrMut::from_mut(&mut value);

        ptr.debug_assert_aligned::<[u16; 3]>();
        unsafe { ptr.reborrow().consume::<[u16; 3]>()[1] = 7 };
        let shared = unsafe { ptr.borrow().as_ref::<[u16; 3]>() };
        assert_eq!(shared, &[1, 7, 3]);
    }

    #[test]
    fn unsized_source_keeps_data_address() {
        let value = 5u64;
        let erased: &dyn core::fmt::Debug = &value;
        let ptr = Ptr::from_ref(erased);

        assert_eq!(ptr.as_ptr(), (&raw const value).cast::<u8>());
        assert_eq!(unsafe { *ptr.as_ref::<u64>() }, 5);
    }
}
