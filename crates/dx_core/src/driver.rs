use alloc::string::String;

use dx_reflect::Reflect;
use serde_json::Value;

use crate::context::Context;
use crate::de::Deserializer;
use crate::diagnostic::DcResult;
use crate::host::HostModel;
use crate::json::{self, JsonReader, JsonWriter};
use crate::pretty::PrettyPrintWriter;
use crate::property::{PropertyReader, PropertyWriter};
use crate::ser::Serializer;

// -----------------------------------------------------------------------------
// JSON

/// Fills `dest` from a JSON document with a fresh [`Deserializer::json`].
///
/// # Example
///
/// ```
/// use dx_core::deserialize_json;
/// use dx_reflect::reflect_struct;
/// use dx_reflect::registry::TypeRegistry;
///
/// reflect_struct! {
///     #[derive(Debug, Default)]
///     struct Slot {
///         index: i16 => "Index",
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Slot>();
///
/// let mut slot = Slot::default();
/// deserialize_json(&registry, &serde_json::json!({"Index": 7}), &mut slot).unwrap();
/// assert_eq!(slot.index, 7);
/// ```
pub fn deserialize_json(host: &dyn HostModel, value: &Value, dest: &mut dyn Reflect) -> DcResult<()> {
    deserialize_json_with(&Deserializer::json(), host, value, dest)
}

/// Like [`deserialize_json`], with a caller-built engine.
pub fn deserialize_json_with(
    engine: &Deserializer,
    host: &dyn HostModel,
    value: &Value,
    dest: &mut dyn Reflect,
) -> DcResult<()> {
    let mut reader = JsonReader::new(value);
    let mut writer = PropertyWriter::new(host, dest);
    {
        let mut ctx = Context::new(engine, &mut reader, &mut writer).with_host(host);
        ctx.prepare()?;
        ctx.deserialize()?;
    }
    writer.finish()
}

/// Parses `text` then fills `dest` from it.
pub fn deserialize_json_str(host: &dyn HostModel, text: &str, dest: &mut dyn Reflect) -> DcResult<()> {
    let value = json::parse(text)?;
    deserialize_json(host, &value, dest)
}

/// Writes `value` as a JSON document with a fresh [`Serializer::json`].
pub fn serialize_json(host: &dyn HostModel, value: &dyn Reflect) -> DcResult<Value> {
    serialize_json_with(&Serializer::json(), host, value)
}

/// Like [`serialize_json`], with a caller-built engine.
pub fn serialize_json_with(
    engine: &Serializer,
    host: &dyn HostModel,
    value: &dyn Reflect,
) -> DcResult<Value> {
    let mut reader = PropertyReader::new(host, value);
    let mut writer = JsonWriter::new();
    {
        let mut ctx = Context::new(engine, &mut reader, &mut writer).with_host(host);
        ctx.prepare()?;
        ctx.serialize()?;
    }
    writer.into_value()
}

/// Writes `value` as indented JSON text.
pub fn serialize_json_string(host: &dyn HostModel, value: &dyn Reflect) -> DcResult<String> {
    json::to_string_pretty(&serialize_json(host, value)?)
}

// -----------------------------------------------------------------------------
// Host to host

/// Copies `src` into `dst` node by node.
///
/// Both values must have the same shape; fields of `dst` that `src` does not
/// name keep their values.
pub fn copy_value(host: &dyn HostModel, src: &dyn Reflect, dst: &mut dyn Reflect) -> DcResult<()> {
    let engine = Serializer::pipe();
    let mut reader = PropertyReader::new(host, src);
    let mut writer = PropertyWriter::new(host, dst);
    {
        let mut ctx = Context::new(&engine, &mut reader, &mut writer).with_host(host);
        ctx.prepare()?;
        ctx.serialize()?;
    }
    writer.finish()
}

// -----------------------------------------------------------------------------
// Debug output

/// Renders the node stream of `value`, one line per node.
pub fn pretty_print(host: &dyn HostModel, value: &dyn Reflect) -> DcResult<String> {
    let engine = Serializer::pipe();
    let mut reader = PropertyReader::new(host, value);
    let mut writer = PrettyPrintWriter::new(String::new());
    {
        let mut ctx = Context::new(&engine, &mut reader, &mut writer).with_host(host);
        ctx.prepare()?;
        ctx.serialize()?;
    }
    Ok(writer.into_inner())
}

/// Sends the node stream of `value` to the `log` facade at `info` level.
pub fn log_value(host: &dyn HostModel, value: &dyn Reflect) -> DcResult<()> {
    let engine = Serializer::pipe();
    let mut reader = PropertyReader::new(host, value);
    let mut writer = PrettyPrintWriter::to_log();
    let mut ctx = Context::new(&engine, &mut reader, &mut writer).with_host(host);
    ctx.prepare()?;
    ctx.serialize()
}

// -----------------------------------------------------------------------------
// Tests
