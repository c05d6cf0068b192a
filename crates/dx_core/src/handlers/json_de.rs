//! Reading JSON into typed slots.
//!
//! The destination slot decides what a JSON value means: the same string is
//! a name, an enum member or a reference depending on where it lands.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use dx_reflect::info::{EnumInfo, StructInfo};

use crate::context::Context;
use crate::data::{DataEntry, EnumData};
use crate::de::{Deserializer, UnknownFieldPolicy};
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::extra::AnyStruct;
use crate::handlers::numeric::{self, FromNumber, Number, read_as};
use crate::handlers::pipe::copy;
use crate::handlers::{TYPE_KEY, at_end, type_mismatch};
use crate::path::{PathFrame, PathSegment};
use crate::property::PropertyDesc;
use crate::reader::{Reader, skip};
use crate::registry::HandlerRegistry;
use crate::types::{ClassRef, InterfaceRef, ObjectRef, WeakRef};
use crate::writer::{Writer, write_end, write_root};

type Ctx<'a> = Context<'a, Deserializer>;

/// Registers the handlers reading a [`JsonReader`](crate::json::JsonReader).
///
/// Without a typed destination every value is copied as it is, so the same
/// set also turns JSON into JSON.
pub fn setup_json_deserialize_handlers(registry: &mut HandlerRegistry<Deserializer>) {
    macro_rules! numbers {
        ($($entry:ident: $ty:ty => $write:ident),* $(,)?) => {
            $(
                registry.register_entry(DataEntry::$entry, |ctx| {
                    if ctx.property().is_none() {
                        return copy(ctx);
                    }
                    let value = read_as::<$ty, _>(&mut ctx.reader)?;
                    ctx.writer.$write(value)
                });
            )*
        };
    }

    macro_rules! strings {
        ($($entry:ident => $write:ident),* $(,)?) => {
            $(
                registry.register_entry(DataEntry::$entry, |ctx| {
                    if ctx.property().is_none() {
                        return copy(ctx);
                    }
                    let value = read_text(ctx)?;
                    ctx.writer.$write(&value)
                });
            )*
        };
    }

    numbers! {
        Int8: i8 => write_int8,
        Int16: i16 => write_int16,
        Int32: i32 => write_int32,
        Int64: i64 => write_int64,
        UInt8: u8 => write_uint8,
        UInt16: u16 => write_uint16,
        UInt32: u32 => write_uint32,
        UInt64: u64 => write_uint64,
        Float: f32 => write_float,
        Double: f64 => write_double,
    }

    strings! {
        Name => write_name,
        String => write_string,
        Text => write_text,
        LazyObjectReference => write_lazy_object_reference,
        SoftObjectReference => write_soft_object_reference,
        SoftClassReference => write_soft_class_reference,
        FieldPath => write_field_path,
        Delegate => write_delegate,
        MulticastInlineDelegate => write_multicast_inline_delegate,
        MulticastSparseDelegate => write_multicast_sparse_delegate,
    }

    registry.register_entry(DataEntry::None, copy::<Deserializer>);
    registry.register_entry(DataEntry::Bool, typed(read_bool));
    registry.register_entry(DataEntry::Enum, typed(read_enum));
    registry.register_entry(DataEntry::Blob, typed(read_blob));
    registry.register_entry(DataEntry::StructRoot, typed(read_struct));
    registry.register_entry(DataEntry::ClassRoot, typed(read_struct));
    registry.register_entry(DataEntry::ArrayRoot, typed(read_array));
    registry.register_entry(DataEntry::SetRoot, typed(read_array));
    registry.register_entry(DataEntry::MapRoot, typed(read_map));
    registry.register_entry(DataEntry::OptionalRoot, typed(read_optional));
    registry.register_entry(DataEntry::ObjectReference, typed(read_object_reference));
    registry.register_entry(DataEntry::ClassReference, typed(read_class_reference));
    registry.register_entry(DataEntry::WeakObjectReference, typed(read_weak_reference));
    registry.register_entry(DataEntry::InterfaceReference, typed(read_interface_reference));
    registry.register_type::<AnyStruct>(typed(read_any_struct));
}

/// Runs `handler` when the destination is typed, copies the value otherwise.
fn typed(
    handler: fn(&mut Ctx<'_>, PropertyDesc) -> DcResult<()>,
) -> impl Fn(&mut Ctx<'_>) -> DcResult<()> + Send + Sync + 'static {
    move |ctx: &mut Ctx<'_>| match ctx.property().copied() {
        Some(desc) => handler(ctx, desc),
        None => copy(ctx),
    }
}

/// Fails unless the next JSON value is of kind `expected`.
fn expect(ctx: &mut Ctx<'_>, desc: &PropertyDesc, expected: DataEntry) -> DcResult<()> {
    match ctx.reader.peek()? {
        found if found == expected => Ok(()),
        found => Err(type_mismatch(desc.type_name(), found)),
    }
}

fn read_text(ctx: &mut Ctx<'_>) -> DcResult<String> {
    match ctx.reader.peek()? {
        DataEntry::String => ctx.reader.read_string(),
        found => Err(type_mismatch("string", found)),
    }
}

// -----------------------------------------------------------------------------
// Scalars

/// A JSON bool, or `"true"`/`"false"` as written for map keys.
fn read_bool(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    let value = match ctx.reader.peek()? {
        DataEntry::Bool => ctx.reader.read_bool()?,
        DataEntry::String => match ctx.reader.read_string()?.as_str() {
            "true" => true,
            "false" => false,
            text => {
                return Err(type_mismatch(desc.type_name(), DataEntry::String).with_arg("value", text));
            }
        },
        found => return Err(type_mismatch(desc.type_name(), found)),
    };
    ctx.writer.write_bool(value)
}

fn read_blob(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    expect(ctx, &desc, DataEntry::ArrayRoot)?;
    ctx.reader.read_array_root()?;
    let mut bytes = Vec::new();
    while !at_end(ctx, DataEntry::ArrayEnd)? {
        bytes.push(read_as::<u8, _>(&mut ctx.reader)?);
    }
    ctx.reader.read_array_end()?;
    ctx.writer.write_blob(&bytes)
}

/// The value of an enum member given by name, by `" | "`-joined flag names
/// or, if enabled, as an integer.
///
/// Flag sets always accept integers: a value with no named bits is written
/// as its number.
fn read_enum(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    let info = desc
        .type_info
        .as_enum()
        .map_err(|_| type_mismatch(desc.type_name(), DataEntry::Enum))?;
    let from_integer = ctx.options().enum_from_integer || info.is_flags();

    let signed64 = match ctx.reader.peek()? {
        DataEntry::String => {
            let text = ctx.reader.read_string()?;
            match member_value(info, &text) {
                Some(value) => value,
                None if from_integer => match numeric::parse_number(&text) {
                    Ok(number) => integral_member(info, number)?,
                    Err(_) => return Err(member_not_found(info, &text)),
                },
                None => return Err(member_not_found(info, &text)),
            }
        }
        DataEntry::Int64 | DataEntry::UInt64 | DataEntry::Double if from_integer => {
            integral_member(info, numeric::read_number(&mut ctx.reader)?)?
        }
        found => return Err(type_mismatch(desc.type_name(), found)),
    };

    let name = if info.is_flags() {
        info.flags_name(signed64).unwrap_or_default()
    } else {
        info.variant_by_value(signed64)
            .map(|variant| String::from(variant.name()))
            .unwrap_or_default()
    };
    ctx.writer.write_enum(&EnumData {
        type_name: String::from(desc.type_name()),
        name,
        signed64,
        is_unsigned: info.is_unsigned(),
    })
}

fn member_value(info: &EnumInfo, text: &str) -> Option<i64> {
    if info.is_flags() {
        info.parse_flags(text)
    } else {
        info.variant(text).map(|variant| variant.value())
    }
}

/// The bit pattern of an integral enum value.
fn integral_member(info: &EnumInfo, number: Number) -> DcResult<i64> {
    match number {
        Number::Int(value) => Ok(value),
        Number::UInt(value) if info.is_unsigned() => Ok(value as i64),
        Number::UInt(_) => Err(member_not_found(info, number)),
        Number::Float(_) => i64::from_number(number),
    }
}

#[cold]
fn member_not_found(info: &EnumInfo, value: impl core::fmt::Display) -> Diagnostic {
    Diagnostic::new(ErrorCode::EnumMemberNotFound)
        .with_arg("type", info.ty().name())
        .with_arg("value", value)
}

// -----------------------------------------------------------------------------
// References

fn read_object_reference(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    match read_nullable_path(ctx, &desc)? {
        Some(path) => ctx.writer.write_object_reference(&ObjectRef::new(path)),
        None => ctx.writer.write_none(),
    }
}

fn read_class_reference(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    match read_nullable_path(ctx, &desc)? {
        Some(path) => ctx.writer.write_class_reference(&ClassRef::new(path)),
        None => ctx.writer.write_none(),
    }
}

/// A reference path; `null` and the empty string are the null reference.
fn read_nullable_path(ctx: &mut Ctx<'_>, desc: &PropertyDesc) -> DcResult<Option<String>> {
    match ctx.reader.peek()? {
        DataEntry::None => {
            ctx.reader.read_none()?;
            Ok(None)
        }
        DataEntry::String => {
            let path = ctx.reader.read_string()?;
            Ok((!path.is_empty()).then_some(path))
        }
        found => Err(type_mismatch(desc.type_name(), found)),
    }
}

/// `[index, generation]`
fn read_weak_reference(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    expect(ctx, &desc, DataEntry::ArrayRoot)?;
    ctx.reader.read_array_root()?;
    let mut parts = [0i32; 2];
    for part in &mut parts {
        if at_end(ctx, DataEntry::ArrayEnd)? {
            return Err(invalid_reference(&desc, "expected [index, generation]"));
        }
        *part = read_as::<i32, _>(&mut ctx.reader)?;
    }
    if !at_end(ctx, DataEntry::ArrayEnd)? {
        return Err(invalid_reference(&desc, "expected [index, generation]"));
    }
    ctx.reader.read_array_end()?;
    ctx.writer.write_weak_object_reference(WeakRef {
        index: parts[0],
        generation: parts[1],
    })
}

/// `{"object": path, "interface": name}` or `null`.
fn read_interface_reference(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    match ctx.reader.peek()? {
        DataEntry::None => {
            ctx.reader.read_none()?;
            return ctx.writer.write_none();
        }
        DataEntry::MapRoot => ctx.reader.read_map_root()?,
        found => return Err(type_mismatch(desc.type_name(), found)),
    }

    let mut value = InterfaceRef::default();
    while !at_end(ctx, DataEntry::MapEnd)? {
        let key = read_text(ctx)?;
        match key.as_str() {
            "object" => value.object = ObjectRef::new(read_text(ctx)?),
            "interface" => value.interface = read_text(ctx)?,
            _ => return Err(invalid_reference(&desc, "unexpected key").with_arg("key", key)),
        }
    }
    ctx.reader.read_map_end()?;

    if value.is_null() {
        ctx.writer.write_none()
    } else {
        ctx.writer.write_interface_reference(&value)
    }
}

#[cold]
fn invalid_reference(desc: &PropertyDesc, note: &'static str) -> Diagnostic {
    Diagnostic::new(ErrorCode::InvalidReference)
        .with_arg("type", desc.type_name())
        .with_note(note)
}

// -----------------------------------------------------------------------------
// Composites

fn read_struct(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    let info = desc
        .type_info
        .as_struct()
        .map_err(|_| type_mismatch(desc.type_name(), desc.entry))?;
    expect(ctx, &desc, DataEntry::MapRoot)?;
    ctx.reader.read_map_root()?;
    write_struct_body(ctx, desc.entry, info)
}

/// Writes the struct opened in the reader's current object, then closes both.
fn write_struct_body(ctx: &mut Ctx<'_>, root: DataEntry, info: &'static StructInfo) -> DcResult<()> {
    let end = root.matching_end().unwrap_or(DataEntry::StructEnd);
    let name = info.ty().name();
    write_root(&mut *ctx.writer, root, name)?;
    ctx.enter(PathFrame::new(root, name));
    read_fields(ctx, info)?;
    ctx.leave(end)?;
    ctx.reader.read_map_end()?;
    write_end(&mut *ctx.writer, end)
}

/// Reads object members as struct fields up to the end of the object.
fn read_fields(ctx: &mut Ctx<'_>, info: &'static StructInfo) -> DcResult<()> {
    let policy = ctx.options().unknown_fields;
    while !at_end(ctx, DataEntry::MapEnd)? {
        let key = read_text(ctx)?;
        match info.field(&key) {
            Some(field) => {
                ctx.set_segment(PathSegment::Field(Cow::Borrowed(field.name())));
                ctx.writer.write_name(field.name())?;
                ctx.dispatch()?;
            }
            None if policy == UnknownFieldPolicy::Ignore => {
                log::debug!("skipping unknown field `{key}` of {} at {}", info.ty().name(), ctx.path);
                skip(&mut ctx.reader)?;
            }
            None => {
                ctx.set_segment(PathSegment::Field(Cow::Owned(key.clone())));
                return Err(Diagnostic::new(ErrorCode::UnknownField)
                    .with_arg("type", info.ty().name())
                    .with_arg("field", key));
            }
        }
    }
    Ok(())
}

fn read_array(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    expect(ctx, &desc, DataEntry::ArrayRoot)?;
    let root = desc.entry;
    let end = root.matching_end().unwrap_or(DataEntry::ArrayEnd);

    ctx.reader.read_array_root()?;
    write_root(&mut *ctx.writer, root, "")?;
    ctx.enter(PathFrame::new(root, desc.type_name()));
    let mut index = 0;
    while !at_end(ctx, DataEntry::ArrayEnd)? {
        ctx.set_segment(PathSegment::Index(index));
        ctx.dispatch()?;
        index += 1;
    }
    ctx.leave(end)?;
    ctx.reader.read_array_end()?;
    write_end(&mut *ctx.writer, end)
}

fn read_map(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    expect(ctx, &desc, DataEntry::MapRoot)?;
    ctx.reader.read_map_root()?;
    ctx.writer.write_map_root()?;
    ctx.enter(PathFrame::new(DataEntry::MapRoot, desc.type_name()));
    let mut index = 0;
    while !at_end(ctx, DataEntry::MapEnd)? {
        ctx.set_segment(PathSegment::MapKey(index));
        ctx.dispatch()?;
        ctx.set_segment(PathSegment::MapValue(index));
        ctx.dispatch()?;
        index += 1;
    }
    ctx.leave(DataEntry::MapEnd)?;
    ctx.reader.read_map_end()?;
    ctx.writer.write_map_end()
}

/// `null` is the empty optional, anything else its payload.
fn read_optional(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    ctx.writer.write_optional_root()?;
    if ctx.reader.peek()? == DataEntry::None {
        ctx.reader.read_none()?;
        ctx.writer.write_none()?;
    } else {
        ctx.enter(PathFrame::new(DataEntry::OptionalRoot, desc.type_name()));
        ctx.set_segment(PathSegment::Payload);
        ctx.dispatch()?;
        ctx.leave(DataEntry::OptionalEnd)?;
    }
    ctx.writer.write_optional_end()
}

/// `null`, or an object naming the payload type under a leading `"$type"`.
fn read_any_struct(ctx: &mut Ctx<'_>, desc: PropertyDesc) -> DcResult<()> {
    match ctx.reader.peek()? {
        DataEntry::None => {
            ctx.reader.read_none()?;
            return ctx.writer.write_none();
        }
        DataEntry::MapRoot => ctx.reader.read_map_root()?,
        found => return Err(type_mismatch(desc.type_name(), found)),
    }

    let key = match ctx.reader.peek()? {
        DataEntry::String => ctx.reader.read_string()?,
        _ => String::new(),
    };
    if key != TYPE_KEY {
        return Err(Diagnostic::new(ErrorCode::MissingTypeKey).with_arg("key", TYPE_KEY));
    }
    let type_name = read_text(ctx)?;

    let meta = ctx.host()?.type_meta_by_name(&type_name).ok_or_else(|| {
        Diagnostic::new(ErrorCode::TypeNotRegistered).with_arg("type", type_name.as_str())
    })?;
    let info = meta
        .type_info()
        .as_struct()
        .map_err(|_| type_mismatch("struct", DataEntry::MapRoot).with_arg("type", meta.type_name()))?;
    let root = if info.is_class() {
        DataEntry::ClassRoot
    } else {
        DataEntry::StructRoot
    };
    write_struct_body(ctx, root, info)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use dx_reflect::Reflect;
    use dx_reflect::registry::TypeRegistry;
    use dx_utils::collections::OrderedMap;
    use serde_json::{Value, json};

    use crate::context::Context;
    use crate::de::{DeserializeOptions, Deserializer, UnknownFieldPolicy};
    use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
    use crate::fixtures::{Actor, Color, KeyableStruct, Permissions, ScalarStruct};
    use crate::json::JsonReader;
    use crate::property::PropertyWriter;
    use crate::types::{ObjectRef, WeakRef};

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.register::<KeyableStruct>();
        registry.register::<ScalarStruct>();
        registry.register::<Actor>();
        registry
    }

    fn load_with(engine: &Deserializer, doc: &Value, value: &mut dyn Reflect) -> Result<(), Diagnostic> {
        let registry = registry();
        let mut reader = JsonReader::new(doc);
        let mut writer = PropertyWriter::new(&registry, value);
        let mut ctx = Context::new(engine, &mut reader, &mut writer).with_host(&registry);
        ctx.prepare()?;
        ctx.deserialize()?;
        drop(ctx);
        writer.finish()
    }

    fn load(doc: Value, value: &mut dyn Reflect) -> DcResult<()> {
        load_with(&Deserializer::json(), &doc, value)
    }

    #[test]
    fn name_and_index() {
        let mut value = KeyableStruct::default();
        load(json!({"Name": "Foo", "Index": 253}), &mut value).unwrap();
        assert_eq!(value.name.as_str(), "Foo");
        assert_eq!(value.index, 253);
    }

    #[test]
    fn scalar_kinds() {
        let mut value = ScalarStruct::default();
        load(
            json!({
                "Bool": true,
                "Int8": -8,
                "Int16": -16,
                "Int32": -32,
                "Int64": -64,
                "UInt8": 8,
                "UInt16": 16,
                "UInt32": 32,
                "UInt64": 18446744073709551615u64,
                "Float": 1.5,
                "Double": 2,
                "String": "str",
                "Text": "text",
                "Blob": [1, 2, 255],
            }),
            &mut value,
        )
        .unwrap();

        assert!(value.flag);
        assert_eq!((value.int8, value.int16, value.int32, value.int64), (-8, -16, -32, -64));
        assert_eq!((value.uint8, value.uint16, value.uint32), (8, 16, 32));
        assert_eq!(value.uint64, u64::MAX);
        assert_eq!(value.float, 1.5);
        assert_eq!(value.double, 2.0);
        assert_eq!(value.string, "str");
        assert_eq!(value.text.as_str(), "text");
        assert_eq!(value.blob.as_bytes(), [1, 2, 255]);
    }

    #[test]
    fn narrowing_fails_with_location() {
        let mut value = ScalarStruct::default();
        let err = load(json!({"UInt8": 300}), &mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfRange);
        assert_eq!(err.path(), Some("$.UInt8"));
        assert!(err.reader_position().is_some());
        assert_eq!(err.writer_position(), Some("<host> ScalarStruct.UInt8"));

        let err = load(json!({"Int16": 1.5}), &mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotIntegral);

        let err = load(json!({"Bool": "yes"}), &mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
    }

    #[test]
    fn unknown_fields() {
        let doc = json!({"Ghost": [1, {"a": 2}], "Index": 4});

        let mut value = KeyableStruct::default();
        let err = load(doc.clone(), &mut value).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownField);
        assert_eq!(err.arg("field"), Some("Ghost"));
        assert_eq!(err.path(), Some("$.Ghost"));

        let options = DeserializeOptions {
            unknown_fields: UnknownFieldPolicy::Ignore,
            ..DeserializeOptions::default()
        };
        let engine = Deserializer::json().with_options(options);
        load_with(&engine, &doc, &mut value).unwrap();
        assert_eq!(value.index, 4);
    }

    #[test]
    fn enums_and_flags() {
        let mut colors: Vec<Color> = Vec::new();
        load(json!(["Green", "Blue"]), &mut colors).unwrap();
        assert_eq!(colors, [Color::Green, Color::Blue]);

        let err = load(json!(["Purple"]), &mut colors).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EnumMemberNotFound);
        assert_eq!(err.path(), Some("$[0]"));
        let err = load(json!([1]), &mut colors).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);

        let options = DeserializeOptions {
            enum_from_integer: true,
            ..DeserializeOptions::default()
        };
        let engine = Deserializer::json().with_options(options);
        load_with(&engine, &json!([1, "2"]), &mut colors).unwrap();
        assert_eq!(colors, [Color::Green, Color::Blue]);

        let mut flags = Permissions::empty();
        load(json!("READ | WRITE"), &mut flags).unwrap();
        assert_eq!(flags, Permissions::READ | Permissions::WRITE);
        load(json!(0), &mut flags).unwrap();
        assert_eq!(flags, Permissions::empty());
        load(json!(9), &mut flags).unwrap();
        assert_eq!(flags, Permissions::READ | Permissions::from_bits_retain(8));
        let err = load(json!("READ | EXECUTE"), &mut flags).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EnumMemberNotFound);
    }

    #[test]
    fn containers_keep_order() {
        let mut map: OrderedMap<String, i32> = OrderedMap::new();
        load(json!({"b": 2, "a": 1}), &mut map).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["b", "a"]);

        let mut by_id: BTreeMap<u16, bool> = BTreeMap::new();
        load(json!({"7": true, "3": false}), &mut by_id).unwrap();
        assert_eq!(by_id.get(&7), Some(&true));
        assert_eq!(by_id.get(&3), Some(&false));

        let mut by_flag: BTreeMap<bool, i32> = BTreeMap::new();
        load(json!({"true": 1, "false": 2}), &mut by_flag).unwrap();
        assert_eq!(by_flag, BTreeMap::from([(true, 1), (false, 2)]));
        let err = load(json!({"yes": 1}), &mut by_flag).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeMismatch);
        assert_eq!(err.arg("value"), Some("yes"));

        let mut nested: Vec<Option<i32>> = vec![Some(9)];
        load(json!([null, 5]), &mut nested).unwrap();
        assert_eq!(nested, [None, Some(5)]);
    }

    #[test]
    fn references_and_shared_structs() {
        let mut actor = Actor::default();
        load(
            json!({
                "Owner": "/Game/Hero",
                "Payload": {"$type": "KeyableStruct", "Name": "Inner", "Index": 2},
                "Weak": [4, 1],
                "Soft": "",
            }),
            &mut actor,
        )
        .unwrap();
        assert_eq!(actor.owner, ObjectRef::new("/Game/Hero"));
        assert_eq!(actor.weak, WeakRef { index: 4, generation: 1 });
        let payload = actor.payload.downcast_ref::<KeyableStruct>().unwrap();
        assert_eq!(payload.name.as_str(), "Inner");

        load(json!({"Owner": null, "Payload": null}), &mut actor).unwrap();
        assert!(actor.owner.is_null());
        assert!(!actor.payload.is_valid());

        let err = load(json!({"Payload": {"Index": 2}}), &mut actor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingTypeKey);
        let err = load(json!({"Payload": {"$type": "Nope"}}), &mut actor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TypeNotRegistered);
        let err = load(json!({"Weak": [1]}), &mut actor).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidReference);
    }
}
