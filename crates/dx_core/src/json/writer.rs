use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Number, Value};

use crate::data::{DataEntry, EnumData};
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::json::push_pointer_token;
use crate::types::{ClassRef, InterfaceRef, ObjectRef, WeakRef};
use crate::writer::{Writer, null_reference, write_mismatch};

enum Frame {
    /// Arrays and sets.
    Array { items: Vec<Value>, end: DataEntry },
    /// Structs, classes and maps.
    Object {
        map: Map<String, Value>,
        key: Option<String>,
        end: DataEntry,
    },
    /// Optionals are transparent: the payload, or `null`.
    Optional { written: bool },
}

impl Frame {
    fn end(&self) -> DataEntry {
        match self {
            Frame::Array { end, .. } | Frame::Object { end, .. } => *end,
            Frame::Optional { .. } => DataEntry::OptionalEnd,
        }
    }
}

/// Converts a scalar written at a key position into an object key.
fn into_key(value: Value) -> DcResult<String> {
    match value {
        Value::String(key) => Ok(key),
        Value::Bool(_) | Value::Number(_) => Ok(value.to_string()),
        _ => Err(Diagnostic::new(ErrorCode::TypeMismatch)
            .with_arg("expected", "scalar key")
            .with_note("object keys must be scalars")),
    }
}

fn float(value: f64) -> DcResult<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| Diagnostic::new(ErrorCode::NonFiniteFloat).with_arg("value", value))
}

/// Builds a JSON document.
///
/// Structs, classes and maps become objects; arrays and sets become arrays.
/// Optionals are transparent. Map keys written as numbers or booleans are
/// turned into their JSON text, so `{1: "a"}` becomes `{"1": "a"}`.
#[derive(Default)]
pub struct JsonWriter {
    frames: Vec<Frame>,
    output: Option<Value>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document.
    pub fn into_value(self) -> DcResult<Value> {
        if let Some(frame) = self.frames.last() {
            return Err(Diagnostic::new(ErrorCode::UnexpectedEnd).with_arg("open", frame.end()));
        }
        self.output
            .ok_or_else(|| Diagnostic::new(ErrorCode::UnexpectedEnd).with_note("nothing was written"))
    }

    fn at_key(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Object { key: None, .. }))
    }

    fn put(&mut self, value: Value) -> DcResult<()> {
        for frame in self.frames.iter_mut().rev() {
            match frame {
                Frame::Optional { written: true } => {
                    return Err(write_mismatch(DataEntry::None, DataEntry::OptionalEnd)
                        .with_note("optional already holds a value"));
                }
                Frame::Optional { written } => *written = true,
                Frame::Array { items, .. } => {
                    items.push(value);
                    return Ok(());
                }
                Frame::Object { map, key, .. } => {
                    match key.take() {
                        None => *key = Some(into_key(value)?),
                        Some(key) => {
                            map.insert(key, value);
                        }
                    }
                    return Ok(());
                }
            }
        }

        if self.output.is_some() {
            return Err(Diagnostic::new(ErrorCode::RootConsumed));
        }
        self.output = Some(value);
        Ok(())
    }

    fn open(&mut self, frame: Frame) -> DcResult<()> {
        if self.at_key() {
            return Err(write_mismatch(frame.end(), DataEntry::String).with_note("composite key"));
        }
        if self.frames.is_empty() && self.output.is_some() {
            return Err(Diagnostic::new(ErrorCode::RootConsumed));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn close(&mut self, end: DataEntry) -> DcResult<()> {
        let Some(frame) = self.frames.pop_if(|frame| frame.end() == end) else {
            let open = self.frames.last().map_or(DataEntry::Nil, Frame::end);
            return Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                .with_arg("open", open)
                .with_arg("end", end));
        };

        let value = match frame {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Object { key: Some(key), .. } => {
                return Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                    .with_arg("end", end)
                    .with_note(alloc::format!("key '{key}' has no value")));
            }
            Frame::Object { map, .. } => Value::Object(map),
            Frame::Optional { written: true } => return Ok(()),
            Frame::Optional { written: false } => Value::Null,
        };
        self.put(value)
    }

    fn open_object(&mut self, end: DataEntry) -> DcResult<()> {
        self.open(Frame::Object {
            map: Map::new(),
            key: None,
            end,
        })
    }

    fn open_array(&mut self, end: DataEntry) -> DcResult<()> {
        self.open(Frame::Array {
            items: Vec::new(),
            end,
        })
    }
}

macro_rules! string_writes {
    ($($method:ident),* $(,)?) => {
        $(
            fn $method(&mut self, value: &str) -> DcResult<()> {
                self.put(Value::String(value.into()))
            }
        )*
    };
}

macro_rules! number_writes {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(&mut self, value: $ty) -> DcResult<()> {
                self.put(Value::from(value))
            }
        )*
    };
}

impl Writer for JsonWriter {
    fn peek_write(&mut self, next: DataEntry) -> bool {
        if next.is_end() {
            return self.frames.last().is_some_and(|frame| frame.end() == next);
        }
        if self.at_key() {
            return matches!(
                next,
                DataEntry::Bool | DataEntry::Name | DataEntry::String | DataEntry::Enum
            ) || (next.is_numeric() && !matches!(next, DataEntry::Float | DataEntry::Double));
        }
        true
    }

    fn write_none(&mut self) -> DcResult<()> {
        self.put(Value::Null)
    }

    fn write_bool(&mut self, value: bool) -> DcResult<()> {
        self.put(Value::Bool(value))
    }

    string_writes! {
        write_name,
        write_string,
        write_text,
        write_lazy_object_reference,
        write_soft_object_reference,
        write_soft_class_reference,
        write_field_path,
        write_delegate,
        write_multicast_inline_delegate,
        write_multicast_sparse_delegate,
    }

    number_writes! {
        write_int8(i8),
        write_int16(i16),
        write_int32(i32),
        write_int64(i64),
        write_uint8(u8),
        write_uint16(u16),
        write_uint32(u32),
        write_uint64(u64),
    }

    fn write_float(&mut self, value: f32) -> DcResult<()> {
        self.put(float(f64::from(value))?)
    }

    fn write_double(&mut self, value: f64) -> DcResult<()> {
        self.put(float(value)?)
    }

    /// The member name, or the number when the value has no member.
    fn write_enum(&mut self, value: &EnumData) -> DcResult<()> {
        let json = if !value.name.is_empty() {
            Value::String(value.name.clone())
        } else if value.is_unsigned {
            Value::from(value.unsigned64())
        } else {
            Value::from(value.signed64)
        };
        self.put(json)
    }

    fn write_blob(&mut self, value: &[u8]) -> DcResult<()> {
        self.put(Value::Array(value.iter().copied().map(Value::from).collect()))
    }

    fn write_object_reference(&mut self, value: &ObjectRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::ObjectReference));
        }
        self.put(Value::String(value.path.clone()))
    }

    fn write_class_reference(&mut self, value: &ClassRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::ClassReference));
        }
        self.put(Value::String(value.path.clone()))
    }

    fn write_weak_object_reference(&mut self, value: WeakRef) -> DcResult<()> {
        self.put(Value::Array(alloc::vec![
            Value::from(value.index),
            Value::from(value.generation),
        ]))
    }

    fn write_interface_reference(&mut self, value: &InterfaceRef) -> DcResult<()> {
        if value.is_null() {
            return Err(null_reference(DataEntry::InterfaceReference));
        }
        let mut map = Map::new();
        map.insert("object".into(), Value::String(value.object.path.clone()));
        map.insert("interface".into(), Value::String(value.interface.clone()));
        self.put(Value::Object(map))
    }

    fn write_struct_root(&mut self, _name: &str) -> DcResult<()> {
        self.open_object(DataEntry::StructEnd)
    }

    fn write_struct_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::StructEnd)
    }

    fn write_class_root(&mut self, _name: &str) -> DcResult<()> {
        self.open_object(DataEntry::ClassEnd)
    }

    fn write_class_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::ClassEnd)
    }

    fn write_map_root(&mut self) -> DcResult<()> {
        self.open_object(DataEntry::MapEnd)
    }

    fn write_map_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::MapEnd)
    }

    fn write_array_root(&mut self) -> DcResult<()> {
        self.open_array(DataEntry::ArrayEnd)
    }

    fn write_array_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::ArrayEnd)
    }

    fn write_set_root(&mut self) -> DcResult<()> {
        self.open_array(DataEntry::SetEnd)
    }

    fn write_set_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::SetEnd)
    }

    fn write_optional_root(&mut self) -> DcResult<()> {
        self.open(Frame::Optional { written: false })
    }

    fn write_optional_end(&mut self) -> DcResult<()> {
        self.close(DataEntry::OptionalEnd)
    }

    /// A JSON pointer to the next slot, prefixed with `#`.
    fn format_position(&self) -> Option<String> {
        let mut out = String::from("#");
        for frame in &self.frames {
            match frame {
                Frame::Array { items, .. } => push_pointer_token(&mut out, &items.len().to_string()),
                Frame::Object { key: Some(key), .. } => push_pointer_token(&mut out, key),
                Frame::Object { key: None, .. } | Frame::Optional { .. } => {}
            }
        }
        Some(out)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::JsonWriter;
    use crate::data::{DataEntry, EnumData};
    use crate::diagnostic::ErrorCode;
    use crate::types::{InterfaceRef, ObjectRef, WeakRef};
    use crate::writer::Writer;

    #[test]
    fn build_nested_document() {
        let mut writer = JsonWriter::new();
        writer.write_struct_root("Actor").unwrap();
        writer.write_name("Tags").unwrap();
        writer.write_set_root().unwrap();
        writer.write_string("hero").unwrap();
        writer.write_set_end().unwrap();

        writer.write_name("Scores").unwrap();
        writer.write_map_root().unwrap();
        assert!(writer.peek_write(DataEntry::Int32));
        assert!(!writer.peek_write(DataEntry::ArrayRoot));
        writer.write_int32(10).unwrap();
        writer.write_optional_root().unwrap();
        writer.write_double(0.5).unwrap();
        writer.write_optional_end().unwrap();
        writer.write_bool(false).unwrap();
        writer.write_optional_root().unwrap();
        writer.write_optional_end().unwrap();
        assert_eq!(writer.format_position().unwrap(), "#/Scores");
        writer.write_map_end().unwrap();

        writer.write_name("Weak").unwrap();
        writer.write_weak_object_reference(WeakRef { index: 4, generation: 2 }).unwrap();
        writer.write_name("Face").unwrap();
        let face = InterfaceRef {
            object: ObjectRef::new("/Game/Door"),
            interface: "Openable".into(),
        };
        writer.write_interface_reference(&face).unwrap();
        writer.write_name("Kind").unwrap();
        let kind = EnumData {
            type_name: "Color".into(),
            name: "Blue".into(),
            signed64: 2,
            is_unsigned: true,
        };
        writer.write_enum(&kind).unwrap();
        writer.write_struct_end().unwrap();

        assert_eq!(
            writer.into_value().unwrap(),
            json!({
                "Tags": ["hero"],
                "Scores": {"10": 0.5, "false": null},
                "Weak": [4, 2],
                "Face": {"object": "/Game/Door", "interface": "Openable"},
                "Kind": "Blue",
            })
        );
    }

    #[test]
    fn rejected_writes() {
        let mut writer = JsonWriter::new();
        writer.write_array_root().unwrap();
        assert_eq!(writer.write_float(f32::NAN).unwrap_err().code(), ErrorCode::NonFiniteFloat);
        assert_eq!(
            writer.write_object_reference(&ObjectRef::null()).unwrap_err().code(),
            ErrorCode::NullReference
        );
        assert_eq!(writer.write_map_end().unwrap_err().code(), ErrorCode::UnbalancedEnd);
        writer.write_blob(&[1, 2]).unwrap();
        writer.write_array_end().unwrap();
        assert_eq!(writer.write_bool(true).unwrap_err().code(), ErrorCode::RootConsumed);
        assert_eq!(writer.into_value().unwrap(), json!([[1, 2]]));

        let mut writer = JsonWriter::new();
        writer.write_map_root().unwrap();
        writer.write_string("dangling").unwrap();
        assert_eq!(writer.write_map_end().unwrap_err().code(), ErrorCode::UnbalancedEnd);
        assert_eq!(writer.into_value().unwrap_err().code(), ErrorCode::UnexpectedEnd);
    }
}
