//! Value types for data entries that have no plain Rust counterpart.
//!
//! All of them are reflected as opaque values and map one-to-one onto a
//! [`DataEntry`](crate::DataEntry), see [`data_entry_of`](crate::property::data_entry_of).

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            #[inline]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(String::from(value))
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype! {
    /// An identifier, compared by its exact text.
    Name
}

string_newtype! {
    /// Display text.
    Text
}

string_newtype! {
    /// A reference resolved later through a stable id.
    LazyRef
}

string_newtype! {
    /// An object reference resolved later through its path.
    SoftObjectRef
}

string_newtype! {
    /// A class reference resolved later through its path.
    SoftClassRef
}

string_newtype! {
    /// A durable locator into the member graph of a type.
    FieldPath
}

string_newtype! {
    /// A single-cast callable binding, kept as a description only.
    Delegate
}

string_newtype! {
    /// A multicast binding stored inline, kept as a description only.
    MulticastDelegate
}

string_newtype! {
    /// A multicast binding stored out of line, kept as a description only.
    SparseDelegate
}

// -----------------------------------------------------------------------------
// Blob

/// A byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

// -----------------------------------------------------------------------------
// Strong references

/// A strong object reference, addressed by object path.
///
/// The empty path is the null reference. Writers reject it; a null
/// reference travels as [`DataEntry::None`](crate::DataEntry::None) instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub path: String,
}

impl ObjectRef {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub const fn null() -> Self {
        Self { path: String::new() }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.path.is_empty()
    }
}

/// A strong class reference, addressed by class path. Empty is null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ClassRef {
    pub path: String,
}

impl ClassRef {
    #[inline]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.path.is_empty()
    }
}

/// An object plus the capability it is used through. Null when the object is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InterfaceRef {
    pub object: ObjectRef,
    pub interface: String,
}

impl InterfaceRef {
    #[inline]
    pub fn is_null(&self) -> bool {
        self.object.is_null()
    }
}

// -----------------------------------------------------------------------------
// WeakRef

/// A weak object reference: a slot index plus the generation it was taken at.
///
/// It may be stale; it is never resolved by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeakRef {
    pub index: i32,
    pub generation: i32,
}

// -----------------------------------------------------------------------------
// Reflection

dx_reflect::impl_reflect_opaque!(
    Name,
    Text,
    Blob,
    ObjectRef,
    ClassRef,
    WeakRef,
    LazyRef,
    SoftObjectRef,
    SoftClassRef,
    InterfaceRef,
    FieldPath,
    Delegate,
    MulticastDelegate,
    SparseDelegate,
);
