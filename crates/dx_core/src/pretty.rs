use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hasher;

use fnv::FnvHasher;

use crate::data::{DataEntry, EnumData};
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::types::{ClassRef, InterfaceRef, ObjectRef, WeakRef};
use crate::writer::Writer;

const PER_INDENT: &str = "|   ";
const LAST_INDENT: &str = "|---";

/// Prints every node it receives as one line of text.
///
/// Lines read `<Kind> 'value'`. Each root prints at the current level then
/// indents; each end unindents then prints. Nested lines are prefixed with
/// `"|   "` per ancestor and `"|---"` for their own level.
///
/// # Example
///
/// ```
/// use dx_core::Writer;
/// use dx_core::pretty::PrettyPrintWriter;
///
/// let mut writer = PrettyPrintWriter::new(String::new());
/// writer.write_array_root().unwrap();
/// writer.write_bool(true).unwrap();
/// writer.write_array_end().unwrap();
///
/// assert_eq!(
///     writer.into_inner(),
///     "<ArrayRoot>\n|---<Bool> 'true'\n<ArrayEnd>\n",
/// );
/// ```
pub struct PrettyPrintWriter<W: fmt::Write> {
    out: W,
    level: usize,
    indent: String,
    /// Type names of the open structs and classes, for their end lines.
    names: Vec<String>,
}

impl<W: fmt::Write> PrettyPrintWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            level: 0,
            indent: String::new(),
            names: Vec::new(),
        }
    }

    #[inline]
    pub fn indent_level(&self) -> usize {
        self.level
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn set_level(&mut self, level: usize) {
        self.indent.clear();
        if level > 0 {
            for _ in 1..level {
                self.indent.push_str(PER_INDENT);
            }
            self.indent.push_str(LAST_INDENT);
        }
        self.level = level;
    }

    fn line(&mut self, args: fmt::Arguments<'_>) -> DcResult<()> {
        self.out
            .write_str(&self.indent)
            .and_then(|()| self.out.write_fmt(args))
            .and_then(|()| self.out.write_char('\n'))
            .map_err(|fmt::Error| Diagnostic::new(ErrorCode::Output))
    }

    fn root(&mut self, args: fmt::Arguments<'_>) -> DcResult<()> {
        self.line(args)?;
        self.set_level(self.level + 1);
        Ok(())
    }

    fn end(&mut self, entry: DataEntry) -> DcResult<()> {
        let Some(level) = self.level.checked_sub(1) else {
            return Err(Diagnostic::new(ErrorCode::NegativeIndent).with_arg("end", entry));
        };
        self.set_level(level);
        Ok(())
    }

    fn named_end(&mut self, entry: DataEntry) -> DcResult<()> {
        self.end(entry)?;
        let name = self.names.pop().unwrap_or_default();
        self.line(format_args!("<{entry}> '{name}'"))
    }
}

impl PrettyPrintWriter<LogSink> {
    /// Prints through [`log::info!`], one record per line.
    pub fn to_log() -> Self {
        Self::new(LogSink::default())
    }
}

macro_rules! quoted_writes {
    ($($method:ident($ty:ty) => $kind:literal),* $(,)?) => {
        $(
            fn $method(&mut self, value: $ty) -> DcResult<()> {
                self.line(format_args!(concat!("<", $kind, "> '{}'"), value))
            }
        )*
    };
}

impl<W: fmt::Write> Writer for PrettyPrintWriter<W> {
    fn write_none(&mut self) -> DcResult<()> {
        self.line(format_args!("<None>"))
    }

    quoted_writes! {
        write_bool(bool) => "Bool",
        write_name(&str) => "Name",
        write_string(&str) => "String",
        write_text(&str) => "Text",
        write_int8(i8) => "Int8",
        write_int16(i16) => "Int16",
        write_int32(i32) => "Int32",
        write_int64(i64) => "Int64",
        write_uint8(u8) => "UInt8",
        write_uint16(u16) => "UInt16",
        write_uint32(u32) => "UInt32",
        write_uint64(u64) => "UInt64",
        write_lazy_object_reference(&str) => "LazyObjectReference",
        write_soft_object_reference(&str) => "SoftObjectReference",
        write_soft_class_reference(&str) => "SoftClassReference",
        write_field_path(&str) => "FieldPath",
        write_delegate(&str) => "Delegate",
        write_multicast_inline_delegate(&str) => "MulticastInlineDelegate",
        write_multicast_sparse_delegate(&str) => "MulticastSparseDelegate",
    }

    fn write_float(&mut self, value: f32) -> DcResult<()> {
        self.line(format_args!("<Float> '{value:.6}'"))
    }

    fn write_double(&mut self, value: f64) -> DcResult<()> {
        self.line(format_args!("<Double> '{value:.6}'"))
    }

    fn write_enum(&mut self, value: &EnumData) -> DcResult<()> {
        self.line(format_args!(
            "<Enum> '{}', '{}', IsUnsigned: '{}', '0x{:X}'",
            value.type_name,
            value.name,
            u8::from(value.is_unsigned),
            value.signed64,
        ))
    }

    fn write_blob(&mut self, value: &[u8]) -> DcResult<()> {
        let mut hasher = FnvHasher::default();
        hasher.write(value);
        self.line(format_args!(
            "<Blob>: Size: '{}', Hash: '{}'",
            value.len(),
            hasher.finish()
        ))
    }

    fn write_object_reference(&mut self, value: &ObjectRef) -> DcResult<()> {
        self.line(format_args!("<ObjectReference> '{}'", value.path))
    }

    fn write_class_reference(&mut self, value: &ClassRef) -> DcResult<()> {
        self.line(format_args!("<ClassReference> '{}'", value.path))
    }

    fn write_weak_object_reference(&mut self, value: WeakRef) -> DcResult<()> {
        self.line(format_args!(
            "<WeakObjectReference> Index: '{}', Gen: '{}'",
            value.index, value.generation
        ))
    }

    fn write_interface_reference(&mut self, value: &InterfaceRef) -> DcResult<()> {
        self.line(format_args!(
            "<InterfaceReference> '{}' '{}'",
            value.object.path, value.interface
        ))
    }

    fn write_struct_root(&mut self, name: &str) -> DcResult<()> {
        self.root(format_args!("<StructRoot> '{name}'"))?;
        self.names.push(name.into());
        Ok(())
    }

    fn write_struct_end(&mut self) -> DcResult<()> {
        self.named_end(DataEntry::StructEnd)
    }

    fn write_class_root(&mut self, name: &str) -> DcResult<()> {
        self.root(format_args!("<ClassRoot> '{name}'"))?;
        self.names.push(name.into());
        Ok(())
    }

    fn write_class_end(&mut self) -> DcResult<()> {
        self.named_end(DataEntry::ClassEnd)
    }

    fn write_map_root(&mut self) -> DcResult<()> {
        self.root(format_args!("<MapBegin>"))
    }

    fn write_map_end(&mut self) -> DcResult<()> {
        self.end(DataEntry::MapEnd)?;
        self.line(format_args!("<MapEnd>"))
    }

    fn write_array_root(&mut self) -> DcResult<()> {
        self.root(format_args!("<ArrayRoot>"))
    }

    fn write_array_end(&mut self) -> DcResult<()> {
        self.end(DataEntry::ArrayEnd)?;
        self.line(format_args!("<ArrayEnd>"))
    }

    fn write_set_root(&mut self) -> DcResult<()> {
        self.root(format_args!("<SetRoot>"))
    }

    fn write_set_end(&mut self) -> DcResult<()> {
        self.end(DataEntry::SetEnd)?;
        self.line(format_args!("<SetEnd>"))
    }

    fn write_optional_root(&mut self) -> DcResult<()> {
        self.root(format_args!("<OptionalRoot>"))
    }

    fn write_optional_end(&mut self) -> DcResult<()> {
        self.end(DataEntry::OptionalEnd)?;
        self.line(format_args!("<OptionalEnd>"))
    }
}

// -----------------------------------------------------------------------------
// LogSink

/// A text sink forwarding complete lines to [`log::info!`].
///
/// A trailing partial line is flushed on drop.
#[derive(Default)]
pub struct LogSink {
    pending: String,
}

impl fmt::Write for LogSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.pending.push_str(s);
        while let Some(pos) = self.pending.find('\n') {
            log::info!("{}", &self.pending[..pos]);
            self.pending.drain(..=pos);
        }
        Ok(())
    }
}

impl Drop for LogSink {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            log::info!("{}", self.pending);
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::fmt;

    use super::PrettyPrintWriter;
    use crate::data::EnumData;
    use crate::diagnostic::ErrorCode;
    use crate::types::{ObjectRef, WeakRef};
    use crate::writer::Writer;

    #[test]
    fn golden_layout() {
        let mut writer = PrettyPrintWriter::new(String::new());
        writer.write_struct_root("Actor").unwrap();
        writer.write_name("Pos").unwrap();
        writer.write_array_root().unwrap();
        writer.write_float(1.5).unwrap();
        writer.write_map_root().unwrap();
        writer.write_double(-2.0).unwrap();
        writer.write_none().unwrap();
        writer.write_map_end().unwrap();
        writer.write_array_end().unwrap();
        writer.write_name("Kind").unwrap();
        let kind = EnumData {
            type_name: "Color".into(),
            name: "Blue".into(),
            signed64: 2,
            is_unsigned: true,
        };
        writer.write_enum(&kind).unwrap();
        writer.write_blob(b"").unwrap();
        writer.write_weak_object_reference(WeakRef { index: 3, generation: 9 }).unwrap();
        writer.write_object_reference(&ObjectRef::new("/Game/Hero")).unwrap();
        writer.write_struct_end().unwrap();
        assert_eq!(writer.indent_level(), 0);

        let expected = "\
<StructRoot> 'Actor'
|---<Name> 'Pos'
|---<ArrayRoot>
|   |---<Float> '1.500000'
|   |---<MapBegin>
|   |   |---<Double> '-2.000000'
|   |   |---<None>
|   |---<MapEnd>
|---<ArrayEnd>
|---<Name> 'Kind'
|---<Enum> 'Color', 'Blue', IsUnsigned: '1', '0x2'
|---<Blob>: Size: '0', Hash: '14695981039346656037'
|---<WeakObjectReference> Index: '3', Gen: '9'
|---<ObjectReference> '/Game/Hero'
<StructEnd> 'Actor'
";
        assert_eq!(writer.into_inner(), expected);
    }

    #[test]
    fn negative_indent() {
        let mut writer = PrettyPrintWriter::new(String::new());
        let err = writer.write_set_end().unwrap_err();
        assert_eq!(err.code(), ErrorCode::NegativeIndent);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn enum_hex_from_signed_value() {
        let mut writer = PrettyPrintWriter::new(String::new());
        let low = EnumData {
            type_name: "Level".into(),
            name: "Low".into(),
            signed64: -2,
            is_unsigned: false,
        };
        writer.write_enum(&low).unwrap();
        assert_eq!(
            writer.into_inner(),
            "<Enum> 'Level', 'Low', IsUnsigned: '0', '0xFFFFFFFFFFFFFFFE'\n"
        );
    }

    struct Refusing;

    impl fmt::Write for Refusing {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn refused_output() {
        let mut writer = PrettyPrintWriter::new(Refusing);
        assert_eq!(writer.write_bool(true).unwrap_err().code(), ErrorCode::Output);

        let mut writer = PrettyPrintWriter::to_log();
        writer.write_int8(-1).unwrap();
    }
}
