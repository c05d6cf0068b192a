use alloc::string::String;

use crate::context::Context;
use crate::data::DataEntry;
use crate::diagnostic::DcResult;
use crate::extra::AnyStruct;
use crate::handlers::TYPE_KEY;
use crate::handlers::pipe::{copy, copy_end, copy_fields, register_all};
use crate::path::PathFrame;
use crate::reader::Reader;
use crate::registry::HandlerRegistry;
use crate::ser::Serializer;
use crate::writer::{Writer, write_root};

type Ctx<'a> = Context<'a, Serializer>;

/// Registers the handlers writing host values into a
/// [`JsonWriter`](crate::json::JsonWriter).
///
/// Values are copied kind by kind. Enums are written by member name unless
/// [`enum_as_integer`](crate::ser::SerializeOptions::enum_as_integer) is set,
/// and shared structs lead with a `"$type"` key.
pub fn setup_json_serialize_handlers(registry: &mut HandlerRegistry<Serializer>) {
    register_all(registry);
    registry.register_entry(DataEntry::Enum, write_enum);
    registry.register_type::<AnyStruct>(write_any_struct);
}

fn write_enum(ctx: &mut Ctx<'_>) -> DcResult<()> {
    if ctx.reader.peek()? != DataEntry::Enum {
        return copy(ctx);
    }
    let mut value = ctx.reader.read_enum()?;
    if ctx.options().enum_as_integer {
        value.name = String::new();
    }
    ctx.writer.write_enum(&value)
}

fn write_any_struct(ctx: &mut Ctx<'_>) -> DcResult<()> {
    let root = ctx.reader.peek()?;
    let name = match root {
        DataEntry::StructRoot => ctx.reader.read_struct_root()?,
        DataEntry::ClassRoot => ctx.reader.read_class_root()?,
        _ => return copy(ctx),
    };

    write_root(&mut *ctx.writer, root, name.as_str())?;
    ctx.writer.write_name(TYPE_KEY)?;
    ctx.writer.write_string(name.as_str())?;
    ctx.enter(PathFrame::new(root, name.0));
    copy_fields(ctx, root)?;
    copy_end(ctx, root)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use dx_reflect::Reflect;
    use dx_reflect::registry::TypeRegistry;
    use serde_json::{Value, json};

    use crate::context::Context;
    use crate::extra::AnyStruct;
    use crate::fixtures::{Actor, Color, KeyableStruct, Permissions};
    use crate::json::JsonWriter;
    use crate::property::PropertyReader;
    use crate::ser::{SerializeOptions, Serializer};
    use crate::types::{Name, ObjectRef, WeakRef};

    fn save_with(engine: &Serializer, value: &dyn Reflect) -> Value {
        let mut registry = TypeRegistry::new();
        registry.register::<Actor>();
        let mut reader = PropertyReader::new(&registry, value);
        let mut writer = JsonWriter::new();
        let mut ctx = Context::new(engine, &mut reader, &mut writer).with_host(&registry);
        ctx.prepare().unwrap();
        ctx.serialize().unwrap();
        drop(ctx);
        writer.into_value().unwrap()
    }

    #[test]
    fn struct_fields_in_declaration_order() {
        let value = KeyableStruct {
            name: Name::from("Foo"),
            index: 253,
        };
        let out = save_with(&Serializer::json(), &value);
        assert_eq!(out, json!({"Name": "Foo", "Index": 253}));
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["Name", "Index"]);
    }

    #[test]
    fn enums_by_name_or_value() {
        let values = vec![Color::Blue, Color::Red];
        assert_eq!(save_with(&Serializer::json(), &values), json!(["Blue", "Red"]));

        let options = SerializeOptions {
            enum_as_integer: true,
            ..SerializeOptions::default()
        };
        let engine = Serializer::json().with_options(options);
        assert_eq!(save_with(&engine, &values), json!([2, 0]));

        let flags = Permissions::READ | Permissions::WRITE;
        assert_eq!(save_with(&Serializer::json(), &flags), json!("READ | WRITE"));
    }

    #[test]
    fn references_and_shared_structs() {
        let actor = Actor {
            owner: ObjectRef::new("/Game/Hero"),
            payload: AnyStruct::new(KeyableStruct {
                name: Name::from("Inner"),
                index: 2,
            }),
            weak: WeakRef {
                index: 4,
                generation: 1,
            },
            ..Actor::default()
        };
        let out = save_with(&Serializer::json(), &actor);
        assert_eq!(out["Owner"], json!("/Game/Hero"));
        assert_eq!(out["Weak"], json!([4, 1]));
        assert_eq!(
            out["Payload"],
            json!({"$type": "KeyableStruct", "Name": "Inner", "Index": 2})
        );
        let keys: Vec<&String> = out["Payload"].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "$type");

        let empty = save_with(&Serializer::json(), &Actor::default());
        assert_eq!(empty["Owner"], Value::Null);
        assert_eq!(empty["Payload"], Value::Null);
    }
}
