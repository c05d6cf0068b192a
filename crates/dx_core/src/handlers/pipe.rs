use alloc::borrow::Cow;
use alloc::string::String;

use crate::context::Context;
use crate::data::DataEntry;
use crate::de::Deserializer;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::engine::Engine;
use crate::handlers::{at_end, type_mismatch};
use crate::path::{PathFrame, PathSegment};
use crate::reader::{Reader, read_end, read_root};
use crate::registry::HandlerRegistry;
use crate::ser::Serializer;
use crate::writer::{Writer, write_end, write_root};

/// Every kind a pipe handler is registered for.
const PIPED: &[DataEntry] = &[
    DataEntry::None,
    DataEntry::Bool,
    DataEntry::Name,
    DataEntry::String,
    DataEntry::Text,
    DataEntry::Enum,
    DataEntry::Float,
    DataEntry::Double,
    DataEntry::Int8,
    DataEntry::Int16,
    DataEntry::Int32,
    DataEntry::Int64,
    DataEntry::UInt8,
    DataEntry::UInt16,
    DataEntry::UInt32,
    DataEntry::UInt64,
    DataEntry::Blob,
    DataEntry::StructRoot,
    DataEntry::ClassRoot,
    DataEntry::MapRoot,
    DataEntry::ArrayRoot,
    DataEntry::SetRoot,
    DataEntry::OptionalRoot,
    DataEntry::ObjectReference,
    DataEntry::ClassReference,
    DataEntry::WeakObjectReference,
    DataEntry::LazyObjectReference,
    DataEntry::SoftObjectReference,
    DataEntry::SoftClassReference,
    DataEntry::InterfaceReference,
    DataEntry::FieldPath,
    DataEntry::Delegate,
    DataEntry::MulticastInlineDelegate,
    DataEntry::MulticastSparseDelegate,
];

pub fn setup_pipe_deserialize_handlers(registry: &mut HandlerRegistry<Deserializer>) {
    register_all(registry);
}

pub fn setup_pipe_serialize_handlers(registry: &mut HandlerRegistry<Serializer>) {
    register_all(registry);
}

pub(crate) fn register_all<E: Engine>(registry: &mut HandlerRegistry<E>) {
    for &entry in PIPED {
        registry.register_entry(entry, copy::<E>);
    }
}

// -----------------------------------------------------------------------------
// Copying

/// Copies one scalar node of kind `entry` unchanged.
pub fn copy_scalar<R, W>(reader: &mut R, writer: &mut W, entry: DataEntry) -> DcResult<()>
where
    R: Reader + ?Sized,
    W: Writer + ?Sized,
{
    use DataEntry as E;

    match entry {
        E::None => {
            reader.read_none()?;
            writer.write_none()
        }
        E::Bool => writer.write_bool(reader.read_bool()?),
        E::Name => writer.write_name(reader.read_name()?.as_str()),
        E::String => writer.write_string(&reader.read_string()?),
        E::Text => writer.write_text(reader.read_text()?.as_str()),
        E::Enum => writer.write_enum(&reader.read_enum()?),
        E::Float => writer.write_float(reader.read_float()?),
        E::Double => writer.write_double(reader.read_double()?),
        E::Int8 => writer.write_int8(reader.read_int8()?),
        E::Int16 => writer.write_int16(reader.read_int16()?),
        E::Int32 => writer.write_int32(reader.read_int32()?),
        E::Int64 => writer.write_int64(reader.read_int64()?),
        E::UInt8 => writer.write_uint8(reader.read_uint8()?),
        E::UInt16 => writer.write_uint16(reader.read_uint16()?),
        E::UInt32 => writer.write_uint32(reader.read_uint32()?),
        E::UInt64 => writer.write_uint64(reader.read_uint64()?),
        E::Blob => writer.write_blob(reader.read_blob()?.as_bytes()),
        E::ObjectReference => writer.write_object_reference(&reader.read_object_reference()?),
        E::ClassReference => writer.write_class_reference(&reader.read_class_reference()?),
        E::WeakObjectReference => {
            writer.write_weak_object_reference(reader.read_weak_object_reference()?)
        }
        E::LazyObjectReference => {
            writer.write_lazy_object_reference(reader.read_lazy_object_reference()?.as_str())
        }
        E::SoftObjectReference => {
            writer.write_soft_object_reference(reader.read_soft_object_reference()?.as_str())
        }
        E::SoftClassReference => {
            writer.write_soft_class_reference(reader.read_soft_class_reference()?.as_str())
        }
        E::InterfaceReference => {
            writer.write_interface_reference(&reader.read_interface_reference()?)
        }
        E::FieldPath => writer.write_field_path(reader.read_field_path()?.as_str()),
        E::Delegate => writer.write_delegate(reader.read_delegate()?.as_str()),
        E::MulticastInlineDelegate => writer
            .write_multicast_inline_delegate(reader.read_multicast_inline_delegate()?.as_str()),
        E::MulticastSparseDelegate => writer
            .write_multicast_sparse_delegate(reader.read_multicast_sparse_delegate()?.as_str()),
        _ => Err(type_mismatch("scalar", entry)),
    }
}

/// Copies the next node, recursing into composites through the context.
///
/// Struct and class names are forwarded, field names become path segments.
pub fn copy<E: Engine>(ctx: &mut Context<'_, E>) -> DcResult<()> {
    let entry = ctx.reader.peek()?;
    match entry {
        DataEntry::StructRoot | DataEntry::ClassRoot => copy_struct(ctx, entry),
        DataEntry::ArrayRoot | DataEntry::SetRoot => copy_sequence(ctx, entry),
        DataEntry::MapRoot => copy_map(ctx),
        DataEntry::OptionalRoot => copy_optional(ctx),
        DataEntry::Nil => Err(Diagnostic::new(ErrorCode::UnexpectedEnd)),
        entry if entry.is_end() => {
            Err(Diagnostic::new(ErrorCode::UnbalancedEnd).with_arg("end", entry))
        }
        entry => copy_scalar(&mut ctx.reader, &mut *ctx.writer, entry),
    }
}

fn copy_struct<E: Engine>(ctx: &mut Context<'_, E>, root: DataEntry) -> DcResult<()> {
    let name = match root {
        DataEntry::ClassRoot => ctx.reader.read_class_root()?,
        _ => ctx.reader.read_struct_root()?,
    };
    write_root(&mut *ctx.writer, root, name.as_str())?;
    ctx.enter(PathFrame::new(root, String::from(name.as_str())));
    copy_fields(ctx, root)?;
    copy_end(ctx, root)
}

/// Copies `Name`-then-value pairs up to the end of the open struct.
pub(crate) fn copy_fields<E: Engine>(ctx: &mut Context<'_, E>, root: DataEntry) -> DcResult<()> {
    let end = root.matching_end().unwrap_or(DataEntry::StructEnd);
    while !at_end(ctx, end)? {
        let field = ctx.reader.read_name()?;
        ctx.writer.write_name(field.as_str())?;
        ctx.set_segment(PathSegment::Field(Cow::Owned(field.0)));
        ctx.dispatch()?;
    }
    Ok(())
}

/// Leaves the path frame of `root` and copies its end.
pub(crate) fn copy_end<E: Engine>(ctx: &mut Context<'_, E>, root: DataEntry) -> DcResult<()> {
    let end = root.matching_end().unwrap_or(DataEntry::StructEnd);
    ctx.leave(end)?;
    read_end(&mut ctx.reader, end)?;
    write_end(&mut *ctx.writer, end)
}

fn copy_sequence<E: Engine>(ctx: &mut Context<'_, E>, root: DataEntry) -> DcResult<()> {
    let end = root.matching_end().unwrap_or(DataEntry::ArrayEnd);
    read_root(&mut ctx.reader, root)?;
    write_root(&mut *ctx.writer, root, "")?;
    ctx.enter(PathFrame::new(root, ""));

    let mut index = 0;
    while !at_end(ctx, end)? {
        ctx.set_segment(PathSegment::Index(index));
        ctx.dispatch()?;
        index += 1;
    }
    copy_end(ctx, root)
}

fn copy_map<E: Engine>(ctx: &mut Context<'_, E>) -> DcResult<()> {
    ctx.reader.read_map_root()?;
    ctx.writer.write_map_root()?;
    ctx.enter(PathFrame::new(DataEntry::MapRoot, ""));

    let mut index = 0;
    while !at_end(ctx, DataEntry::MapEnd)? {
        ctx.set_segment(PathSegment::MapKey(index));
        ctx.dispatch()?;
        ctx.set_segment(PathSegment::MapValue(index));
        ctx.dispatch()?;
        index += 1;
    }
    copy_end(ctx, DataEntry::MapRoot)
}

fn copy_optional<E: Engine>(ctx: &mut Context<'_, E>) -> DcResult<()> {
    ctx.reader.read_optional_root()?;
    ctx.writer.write_optional_root()?;
    ctx.enter(PathFrame::new(DataEntry::OptionalRoot, ""));
    if !at_end(ctx, DataEntry::OptionalEnd)? {
        ctx.set_segment(PathSegment::Payload);
        ctx.dispatch()?;
    }
    copy_end(ctx, DataEntry::OptionalRoot)
}

// -----------------------------------------------------------------------------
// Tests
