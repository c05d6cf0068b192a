use alloc::string::String;
use core::fmt;

// -----------------------------------------------------------------------------
// DataEntry

/// The kind of node a [`Reader`](crate::Reader) yields next or a
/// [`Writer`](crate::Writer) accepts next.
///
/// `Nil` means the reader is exhausted, while `None` is the null value.
/// Every `*Root` kind is closed by its own `*End` kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataEntry {
    Nil,
    None,
    Bool,
    Name,
    String,
    Text,
    Enum,
    Float,
    Double,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Blob,
    StructRoot,
    StructEnd,
    ClassRoot,
    ClassEnd,
    MapRoot,
    MapEnd,
    ArrayRoot,
    ArrayEnd,
    SetRoot,
    SetEnd,
    OptionalRoot,
    OptionalEnd,
    ObjectReference,
    ClassReference,
    WeakObjectReference,
    LazyObjectReference,
    SoftObjectReference,
    SoftClassReference,
    InterfaceReference,
    FieldPath,
    Delegate,
    MulticastInlineDelegate,
    MulticastSparseDelegate,
}

impl DataEntry {
    /// Returns `true` for kinds that open a composite node.
    #[inline]
    pub const fn is_root(self) -> bool {
        matches!(
            self,
            Self::StructRoot
                | Self::ClassRoot
                | Self::MapRoot
                | Self::ArrayRoot
                | Self::SetRoot
                | Self::OptionalRoot
        )
    }

    /// Returns `true` for kinds that close a composite node.
    #[inline]
    pub const fn is_end(self) -> bool {
        matches!(
            self,
            Self::StructEnd
                | Self::ClassEnd
                | Self::MapEnd
                | Self::ArrayEnd
                | Self::SetEnd
                | Self::OptionalEnd
        )
    }

    /// The `End` closing this `Root`, or `None` for other kinds.
    pub const fn matching_end(self) -> Option<Self> {
        match self {
            Self::StructRoot => Some(Self::StructEnd),
            Self::ClassRoot => Some(Self::ClassEnd),
            Self::MapRoot => Some(Self::MapEnd),
            Self::ArrayRoot => Some(Self::ArrayEnd),
            Self::SetRoot => Some(Self::SetEnd),
            Self::OptionalRoot => Some(Self::OptionalEnd),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Float
                | Self::Double
                | Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt8
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Self::ObjectReference
                | Self::ClassReference
                | Self::WeakObjectReference
                | Self::LazyObjectReference
                | Self::SoftObjectReference
                | Self::SoftClassReference
                | Self::InterfaceReference
        )
    }

    /// Returns `true` for single-node values: everything except
    /// `Nil`, roots and ends.
    #[inline]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, Self::Nil) && !self.is_root() && !self.is_end()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nil => "Nil",
            Self::None => "None",
            Self::Bool => "Bool",
            Self::Name => "Name",
            Self::String => "String",
            Self::Text => "Text",
            Self::Enum => "Enum",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::UInt8 => "UInt8",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Blob => "Blob",
            Self::StructRoot => "StructRoot",
            Self::StructEnd => "StructEnd",
            Self::ClassRoot => "ClassRoot",
            Self::ClassEnd => "ClassEnd",
            Self::MapRoot => "MapRoot",
            Self::MapEnd => "MapEnd",
            Self::ArrayRoot => "ArrayRoot",
            Self::ArrayEnd => "ArrayEnd",
            Self::SetRoot => "SetRoot",
            Self::SetEnd => "SetEnd",
            Self::OptionalRoot => "OptionalRoot",
            Self::OptionalEnd => "OptionalEnd",
            Self::ObjectReference => "ObjectReference",
            Self::ClassReference => "ClassReference",
            Self::WeakObjectReference => "WeakObjectReference",
            Self::LazyObjectReference => "LazyObjectReference",
            Self::SoftObjectReference => "SoftObjectReference",
            Self::SoftClassReference => "SoftClassReference",
            Self::InterfaceReference => "InterfaceReference",
            Self::FieldPath => "FieldPath",
            Self::Delegate => "Delegate",
            Self::MulticastInlineDelegate => "MulticastInlineDelegate",
            Self::MulticastSparseDelegate => "MulticastSparseDelegate",
        }
    }
}

impl fmt::Display for DataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// EnumData

/// An enum value detached from its member table.
///
/// `signed64` holds the bit pattern of the value; read it through
/// [`unsigned64`](Self::unsigned64) when `is_unsigned` is set. Flag values
/// name every set member, joined with `" | "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumData {
    pub type_name: String,
    pub name: String,
    pub signed64: i64,
    pub is_unsigned: bool,
}

impl EnumData {
    #[inline]
    pub const fn unsigned64(&self) -> u64 {
        self.signed64 as u64
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DataEntry, EnumData};

    #[test]
    fn root_end_pairing() {
        assert_eq!(DataEntry::MapRoot.matching_end(), Some(DataEntry::MapEnd));
        assert_eq!(DataEntry::Bool.matching_end(), None);
        assert!(DataEntry::OptionalRoot.is_root());
        assert!(DataEntry::SetEnd.is_end());
        assert!(DataEntry::WeakObjectReference.is_scalar());
        assert!(!DataEntry::Nil.is_scalar());
        assert!(!DataEntry::ArrayEnd.is_scalar());
        assert!(DataEntry::UInt16.is_numeric());
    }

    #[test]
    fn unsigned_view_keeps_bits() {
        let data = EnumData {
            signed64: -1,
            is_unsigned: true,
            ..EnumData::default()
        };
        assert_eq!(data.unsigned64(), u64::MAX);
        assert_eq!(DataEntry::ClassRoot.to_string(), "ClassRoot");
    }
}
