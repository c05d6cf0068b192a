use alloc::string::String;

use crate::data::{DataEntry, EnumData};
use crate::datum::Datum;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::property::PropertyDesc;
use crate::reader::not_supported;
use crate::types::{ClassRef, InterfaceRef, ObjectRef, WeakRef};

/// The failure of a write this writer does not accept at its position.
#[cold]
pub(crate) fn write_mismatch(attempted: DataEntry, expected: DataEntry) -> Diagnostic {
    Diagnostic::new(ErrorCode::WriteKindMismatch)
        .with_arg("attempted", attempted)
        .with_arg("expected", expected)
}

#[cold]
pub(crate) fn null_reference(entry: DataEntry) -> Diagnostic {
    Diagnostic::new(ErrorCode::NullReference).with_arg("kind", entry)
}

macro_rules! default_writes {
    ($( $(#[$meta:meta])* $method:ident ( $($arg:ident : $ty:ty),* ); )*) => {
        $(
            $(#[$meta])*
            fn $method(&mut self $(, $arg: $ty)*) -> DcResult<()> {
                $( let _ = $arg; )*
                Err(not_supported(stringify!($method)))
            }
        )*
    };
}

// -----------------------------------------------------------------------------
// Writer

/// A push-based cursor building a tree of [`DataEntry`] nodes.
///
/// Mirrors [`Reader`](crate::Reader): one write per kind, defaults failing
/// with [`NotSupported`](ErrorCode::NotSupported).
pub trait Writer {
    /// Whether a node of kind `next` is accepted at the current position.
    fn peek_write(&mut self, next: DataEntry) -> bool {
        let _ = next;
        true
    }

    default_writes! {
        write_none();
        write_bool(value: bool);
        write_name(value: &str);
        write_string(value: &str);
        write_text(value: &str);
        write_enum(value: &EnumData);
        write_float(value: f32);
        write_double(value: f64);
        write_int8(value: i8);
        write_int16(value: i16);
        write_int32(value: i32);
        write_int64(value: i64);
        write_uint8(value: u8);
        write_uint16(value: u16);
        write_uint32(value: u32);
        write_uint64(value: u64);
        write_blob(value: &[u8]);
        /// Strong references must not be null.
        write_object_reference(value: &ObjectRef);
        /// Strong references must not be null.
        write_class_reference(value: &ClassRef);
        write_weak_object_reference(value: WeakRef);
        write_lazy_object_reference(value: &str);
        write_soft_object_reference(value: &str);
        write_soft_class_reference(value: &str);
        write_interface_reference(value: &InterfaceRef);
        write_field_path(value: &str);
        write_delegate(value: &str);
        write_multicast_inline_delegate(value: &str);
        write_multicast_sparse_delegate(value: &str);

        /// Opens a struct of the named type.
        write_struct_root(name: &str);
        write_struct_end();
        /// Opens a class of the named type.
        write_class_root(name: &str);
        write_class_end();
        write_map_root();
        write_map_end();
        write_array_root();
        write_array_end();
        write_set_root();
        write_set_end();
        write_optional_root();
        write_optional_end();
    }

    /// Hands out the datum of the next slot; writing through it fills the slot.
    ///
    /// Only writers targeting a host object graph can do this.
    fn write_datum(&mut self) -> DcResult<Datum<'_>> {
        Err(not_supported("write_datum"))
    }

    /// The static type of the next slot, if the writer knows it.
    fn peek_write_property(&mut self) -> DcResult<Option<PropertyDesc>> {
        Ok(None)
    }

    /// A human readable location of the cursor, for diagnostics.
    fn format_position(&self) -> Option<String> {
        None
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Opens the composite `entry`; `name` is used by structs and classes only.
pub fn write_root<W: Writer + ?Sized>(writer: &mut W, entry: DataEntry, name: &str) -> DcResult<()> {
    match entry {
        DataEntry::StructRoot => writer.write_struct_root(name),
        DataEntry::ClassRoot => writer.write_class_root(name),
        DataEntry::MapRoot => writer.write_map_root(),
        DataEntry::ArrayRoot => writer.write_array_root(),
        DataEntry::SetRoot => writer.write_set_root(),
        DataEntry::OptionalRoot => writer.write_optional_root(),
        _ => Err(write_mismatch(entry, DataEntry::StructRoot).with_note("not a root")),
    }
}

/// Closes the composite ended by `entry`.
pub fn write_end<W: Writer + ?Sized>(writer: &mut W, entry: DataEntry) -> DcResult<()> {
    match entry {
        DataEntry::StructEnd => writer.write_struct_end(),
        DataEntry::ClassEnd => writer.write_class_end(),
        DataEntry::MapEnd => writer.write_map_end(),
        DataEntry::ArrayEnd => writer.write_array_end(),
        DataEntry::SetEnd => writer.write_set_end(),
        DataEntry::OptionalEnd => writer.write_optional_end(),
        _ => Err(write_mismatch(entry, DataEntry::StructEnd).with_note("not an end")),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Writer, write_end, write_root};
    use crate::data::DataEntry;
    use crate::diagnostic::ErrorCode;

    struct Nothing;

    impl Writer for Nothing {}

    #[test]
    fn defaults_are_not_supported() {
        let mut writer = Nothing;
        assert!(writer.peek_write(DataEntry::Bool));

        let err = writer.write_string("x").unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotSupported);
        assert_eq!(err.arg("op"), Some("write_string"));

        let err = write_root(&mut writer, DataEntry::SetRoot, "").unwrap_err();
        assert_eq!(err.arg("op"), Some("write_set_root"));

        let err = write_end(&mut writer, DataEntry::Bool).unwrap_err();
        assert_eq!(err.code(), ErrorCode::WriteKindMismatch);
        assert!(writer.write_datum().is_err());
    }
}
