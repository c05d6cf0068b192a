use alloc::string::String;

use crate::data::{DataEntry, EnumData};
use crate::datum::DatumRef;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::property::PropertyDesc;
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};

#[cold]
pub(crate) fn not_supported(op: &'static str) -> Diagnostic {
    Diagnostic::new(ErrorCode::NotSupported).with_arg("op", op)
}

/// The failure of a read that does not match the peeked kind.
///
/// Reading past the last node is an [`UnexpectedEnd`](ErrorCode::UnexpectedEnd)
/// data error, anything else a [`ReadKindMismatch`](ErrorCode::ReadKindMismatch).
#[cold]
pub(crate) fn read_mismatch(expected: DataEntry, found: DataEntry) -> Diagnostic {
    let code = match found {
        DataEntry::Nil => ErrorCode::UnexpectedEnd,
        _ => ErrorCode::ReadKindMismatch,
    };
    Diagnostic::new(code)
        .with_arg("expected", expected)
        .with_arg("found", found)
}

macro_rules! default_reads {
    ($( $(#[$meta:meta])* $method:ident -> $ty:ty; )*) => {
        $(
            $(#[$meta])*
            fn $method(&mut self) -> DcResult<$ty> {
                Err(not_supported(stringify!($method)))
            }
        )*
    };
}

// -----------------------------------------------------------------------------
// Reader

/// A forward-only, pull-based cursor over a tree of [`DataEntry`] nodes.
///
/// Every read has a default body failing with
/// [`NotSupported`](ErrorCode::NotSupported), so a reader implements only
/// what its format can represent. A read whose kind differs from
/// [`peek`](Reader::peek) must fail without consuming anything.
pub trait Reader {
    /// The kind of the next node. Calling it repeatedly yields the same kind.
    fn peek(&mut self) -> DcResult<DataEntry>;

    default_reads! {
        read_none -> ();
        read_bool -> bool;
        read_name -> Name;
        read_string -> String;
        read_text -> Text;
        read_enum -> EnumData;
        read_float -> f32;
        read_double -> f64;
        read_int8 -> i8;
        read_int16 -> i16;
        read_int32 -> i32;
        read_int64 -> i64;
        read_uint8 -> u8;
        read_uint16 -> u16;
        read_uint32 -> u32;
        read_uint64 -> u64;
        read_blob -> Blob;
        read_object_reference -> ObjectRef;
        read_class_reference -> ClassRef;
        read_weak_object_reference -> WeakRef;
        read_lazy_object_reference -> LazyRef;
        read_soft_object_reference -> SoftObjectRef;
        read_soft_class_reference -> SoftClassRef;
        read_interface_reference -> InterfaceRef;
        read_field_path -> FieldPath;
        read_delegate -> Delegate;
        read_multicast_inline_delegate -> MulticastDelegate;
        read_multicast_sparse_delegate -> SparseDelegate;

        /// Opens a struct, returning its type name.
        read_struct_root -> Name;
        read_struct_end -> ();
        /// Opens a class, returning its type name.
        read_class_root -> Name;
        read_class_end -> ();
        read_map_root -> ();
        read_map_end -> ();
        read_array_root -> ();
        read_array_end -> ();
        read_set_root -> ();
        read_set_end -> ();
        read_optional_root -> ();
        read_optional_end -> ();
    }

    /// Hands out the next value as a datum and moves past it.
    ///
    /// Only readers walking a host object graph can do this.
    fn read_datum(&mut self) -> DcResult<DatumRef<'_>> {
        Err(not_supported("read_datum"))
    }

    /// The static type of the next value, if the reader knows it.
    fn peek_read_property(&mut self) -> DcResult<Option<PropertyDesc>> {
        Ok(None)
    }

    /// A human readable location of the cursor, for diagnostics.
    fn format_position(&self) -> Option<String> {
        None
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Reads and discards the scalar `entry`.
pub fn read_scalar<R: Reader + ?Sized>(reader: &mut R, entry: DataEntry) -> DcResult<()> {
    use DataEntry as E;

    match entry {
        E::None => reader.read_none(),
        E::Bool => reader.read_bool().map(drop),
        E::Name => reader.read_name().map(drop),
        E::String => reader.read_string().map(drop),
        E::Text => reader.read_text().map(drop),
        E::Enum => reader.read_enum().map(drop),
        E::Float => reader.read_float().map(drop),
        E::Double => reader.read_double().map(drop),
        E::Int8 => reader.read_int8().map(drop),
        E::Int16 => reader.read_int16().map(drop),
        E::Int32 => reader.read_int32().map(drop),
        E::Int64 => reader.read_int64().map(drop),
        E::UInt8 => reader.read_uint8().map(drop),
        E::UInt16 => reader.read_uint16().map(drop),
        E::UInt32 => reader.read_uint32().map(drop),
        E::UInt64 => reader.read_uint64().map(drop),
        E::Blob => reader.read_blob().map(drop),
        E::ObjectReference => reader.read_object_reference().map(drop),
        E::ClassReference => reader.read_class_reference().map(drop),
        E::WeakObjectReference => reader.read_weak_object_reference().map(drop),
        E::LazyObjectReference => reader.read_lazy_object_reference().map(drop),
        E::SoftObjectReference => reader.read_soft_object_reference().map(drop),
        E::SoftClassReference => reader.read_soft_class_reference().map(drop),
        E::InterfaceReference => reader.read_interface_reference().map(drop),
        E::FieldPath => reader.read_field_path().map(drop),
        E::Delegate => reader.read_delegate().map(drop),
        E::MulticastInlineDelegate => reader.read_multicast_inline_delegate().map(drop),
        E::MulticastSparseDelegate => reader.read_multicast_sparse_delegate().map(drop),
        _ => Err(read_mismatch(DataEntry::None, entry).with_note("not a scalar")),
    }
}

/// Opens the composite `entry`, discarding a struct or class name.
pub fn read_root<R: Reader + ?Sized>(reader: &mut R, entry: DataEntry) -> DcResult<()> {
    match entry {
        DataEntry::StructRoot => reader.read_struct_root().map(drop),
        DataEntry::ClassRoot => reader.read_class_root().map(drop),
        DataEntry::MapRoot => reader.read_map_root(),
        DataEntry::ArrayRoot => reader.read_array_root(),
        DataEntry::SetRoot => reader.read_set_root(),
        DataEntry::OptionalRoot => reader.read_optional_root(),
        _ => Err(read_mismatch(DataEntry::StructRoot, entry).with_note("not a root")),
    }
}

/// Closes the composite ended by `entry`.
pub fn read_end<R: Reader + ?Sized>(reader: &mut R, entry: DataEntry) -> DcResult<()> {
    match entry {
        DataEntry::StructEnd => reader.read_struct_end(),
        DataEntry::ClassEnd => reader.read_class_end(),
        DataEntry::MapEnd => reader.read_map_end(),
        DataEntry::ArrayEnd => reader.read_array_end(),
        DataEntry::SetEnd => reader.read_set_end(),
        DataEntry::OptionalEnd => reader.read_optional_end(),
        _ => Err(read_mismatch(DataEntry::StructEnd, entry).with_note("not an end")),
    }
}

/// Discards exactly one node: a scalar or a whole composite subtree.
pub fn skip<R: Reader + ?Sized>(reader: &mut R) -> DcResult<()> {
    let mut depth = 0usize;
    loop {
        let entry = reader.peek()?;
        if entry == DataEntry::Nil {
            return Err(Diagnostic::new(ErrorCode::UnexpectedEnd).with_note("nothing left to skip"));
        } else if entry.is_root() {
            read_root(reader, entry)?;
            depth += 1;
        } else if entry.is_end() {
            if depth == 0 {
                return Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                    .with_arg("end", entry)
                    .with_note("skip started at an end"));
            }
            read_end(reader, entry)?;
            depth -= 1;
        } else {
            read_scalar(reader, entry)?;
        }

        if depth == 0 {
            return Ok(());
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Reader, skip};
    use crate::data::DataEntry;
    use crate::diagnostic::{DcResult, ErrorCode};
    use crate::json::JsonReader;

    struct Exhausted;

    impl Reader for Exhausted {
        fn peek(&mut self) -> DcResult<DataEntry> {
            Ok(DataEntry::Nil)
        }
    }

    #[test]
    fn defaults_are_not_supported() {
        let mut reader = Exhausted;
        let err = reader.read_bool().unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotSupported);
        assert_eq!(err.arg("op"), Some("read_bool"));
        assert!(reader.peek_read_property().unwrap().is_none());
        assert!(reader.format_position().is_none());
    }

    #[test]
    fn skip_one_subtree() {
        let value = json!([{"a": [1, 2, {"b": null}]}, true]);
        let mut reader = JsonReader::new(&value);

        reader.read_array_root().unwrap();
        skip(&mut reader).unwrap();
        assert_eq!(reader.peek().unwrap(), DataEntry::Bool);
        skip(&mut reader).unwrap();
        assert_eq!(reader.peek().unwrap(), DataEntry::ArrayEnd);

        let err = skip(&mut reader).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnbalancedEnd);
    }

    #[test]
    fn skip_past_the_end() {
        let err = skip(&mut Exhausted).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnexpectedEnd);
    }
}
