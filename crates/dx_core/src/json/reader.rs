use alloc::borrow::ToOwned;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use crate::data::DataEntry;
use crate::diagnostic::DcResult;
use crate::json::push_pointer_token;
use crate::reader::{Reader, read_mismatch};

/// The data entry a JSON value reads as.
fn entry_of(value: &Value) -> DataEntry {
    match value {
        Value::Null => DataEntry::None,
        Value::Bool(_) => DataEntry::Bool,
        Value::Number(n) if n.is_i64() => DataEntry::Int64,
        Value::Number(n) if n.is_u64() => DataEntry::UInt64,
        Value::Number(_) => DataEntry::Double,
        Value::String(_) => DataEntry::String,
        Value::Array(_) => DataEntry::ArrayRoot,
        Value::Object(_) => DataEntry::MapRoot,
    }
}

enum Frame<'de> {
    Array {
        items: &'de [Value],
        index: usize,
    },
    Object {
        entries: Vec<(&'de str, &'de Value)>,
        index: usize,
        at_value: bool,
    },
}

enum Next<'de> {
    Value(&'de Value),
    Key(&'de str),
    End(DataEntry),
    Nil,
}

/// Reads a borrowed JSON document.
///
/// Objects read as maps whose keys are strings, arrays as arrays and `null`
/// as [`DataEntry::None`]. Integers peek as [`Int64`](DataEntry::Int64),
/// or [`UInt64`](DataEntry::UInt64) beyond its range; other numbers as
/// [`Double`](DataEntry::Double).
///
/// # Example
///
/// ```
/// use dx_core::{DataEntry, Reader};
/// use dx_core::json::JsonReader;
/// use serde_json::json;
///
/// let doc = json!({ "hp": 3 });
/// let mut reader = JsonReader::new(&doc);
///
/// reader.read_map_root().unwrap();
/// assert_eq!(reader.read_string().unwrap(), "hp");
/// assert_eq!(reader.peek().unwrap(), DataEntry::Int64);
/// assert_eq!(reader.read_int64().unwrap(), 3);
/// reader.read_map_end().unwrap();
/// assert_eq!(reader.peek().unwrap(), DataEntry::Nil);
/// ```
pub struct JsonReader<'de> {
    root: Option<&'de Value>,
    frames: Vec<Frame<'de>>,
}

impl<'de> JsonReader<'de> {
    pub fn new(value: &'de Value) -> Self {
        Self {
            root: Some(value),
            frames: Vec::new(),
        }
    }

    fn next(&self) -> Next<'de> {
        match self.frames.last() {
            None => self.root.map_or(Next::Nil, Next::Value),
            Some(Frame::Array { items, index }) => match items.get(*index) {
                Some(value) => Next::Value(value),
                None => Next::End(DataEntry::ArrayEnd),
            },
            Some(Frame::Object {
                entries,
                index,
                at_value,
            }) => match entries.get(*index) {
                Some((_, value)) if *at_value => Next::Value(value),
                Some((key, _)) => Next::Key(key),
                None => Next::End(DataEntry::MapEnd),
            },
        }
    }

    fn entry(&self) -> DataEntry {
        match self.next() {
            Next::Value(value) => entry_of(value),
            Next::Key(_) => DataEntry::String,
            Next::End(entry) => entry,
            Next::Nil => DataEntry::Nil,
        }
    }

    /// Moves past the node just consumed.
    fn advance(&mut self) {
        match self.frames.last_mut() {
            None => self.root = None,
            Some(Frame::Array { index, .. }) => *index += 1,
            Some(Frame::Object {
                index, at_value, ..
            }) => {
                if *at_value {
                    *index += 1;
                }
                *at_value = !*at_value;
            }
        }
    }

    fn take(&mut self, expected: DataEntry) -> DcResult<&'de Value> {
        match self.next() {
            Next::Value(value) if entry_of(value) == expected => {
                self.advance();
                Ok(value)
            }
            _ => Err(read_mismatch(expected, self.entry())),
        }
    }

    fn leave(&mut self, end: DataEntry) -> DcResult<()> {
        match self.next() {
            Next::End(entry) if entry == end => {
                self.frames.pop();
                self.advance();
                Ok(())
            }
            _ => Err(read_mismatch(end, self.entry())),
        }
    }
}

impl Reader for JsonReader<'_> {
    fn peek(&mut self) -> DcResult<DataEntry> {
        Ok(self.entry())
    }

    fn read_none(&mut self) -> DcResult<()> {
        self.take(DataEntry::None).map(drop)
    }

    fn read_bool(&mut self) -> DcResult<bool> {
        match self.take(DataEntry::Bool)? {
            Value::Bool(value) => Ok(*value),
            value => Err(read_mismatch(DataEntry::Bool, entry_of(value))),
        }
    }

    fn read_string(&mut self) -> DcResult<String> {
        if let Next::Key(key) = self.next() {
            self.advance();
            return Ok(key.to_owned());
        }
        match self.take(DataEntry::String)? {
            Value::String(value) => Ok(value.clone()),
            value => Err(read_mismatch(DataEntry::String, entry_of(value))),
        }
    }

    fn read_int64(&mut self) -> DcResult<i64> {
        let value = self.take(DataEntry::Int64)?;
        value
            .as_i64()
            .ok_or_else(|| read_mismatch(DataEntry::Int64, entry_of(value)))
    }

    fn read_uint64(&mut self) -> DcResult<u64> {
        let value = self.take(DataEntry::UInt64)?;
        value
            .as_u64()
            .ok_or_else(|| read_mismatch(DataEntry::UInt64, entry_of(value)))
    }

    fn read_double(&mut self) -> DcResult<f64> {
        let value = self.take(DataEntry::Double)?;
        value
            .as_f64()
            .ok_or_else(|| read_mismatch(DataEntry::Double, entry_of(value)))
    }

    fn read_array_root(&mut self) -> DcResult<()> {
        match self.next() {
            Next::Value(Value::Array(items)) => {
                self.frames.push(Frame::Array { items, index: 0 });
                Ok(())
            }
            _ => Err(read_mismatch(DataEntry::ArrayRoot, self.entry())),
        }
    }

    fn read_array_end(&mut self) -> DcResult<()> {
        self.leave(DataEntry::ArrayEnd)
    }

    fn read_map_root(&mut self) -> DcResult<()> {
        match self.next() {
            Next::Value(Value::Object(map)) => {
                let entries = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
                self.frames.push(Frame::Object {
                    entries,
                    index: 0,
                    at_value: false,
                });
                Ok(())
            }
            _ => Err(read_mismatch(DataEntry::MapRoot, self.entry())),
        }
    }

    fn read_map_end(&mut self) -> DcResult<()> {
        self.leave(DataEntry::MapEnd)
    }

    /// A JSON pointer to the next node, prefixed with `#`.
    fn format_position(&self) -> Option<String> {
        let mut out = String::from("#");
        for frame in &self.frames {
            match frame {
                Frame::Array { index, .. } => push_pointer_token(&mut out, &index.to_string()),
                Frame::Object { entries, index, .. } => match entries.get(*index) {
                    Some((key, _)) => push_pointer_token(&mut out, key),
                    None => push_pointer_token(&mut out, "-"),
                },
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

    use super::JsonReader;
    use crate::data::DataEntry;
    use crate::diagnostic::ErrorCode;
    use crate::reader::Reader;

    #[test]
    fn walk_document_in_order() {
        let doc = json!({"b": [true, null], "a": -1.5, "c": u64::MAX});
        let mut reader = JsonReader::new(&doc);

        assert_eq!(reader.peek().unwrap(), DataEntry::MapRoot);
        reader.read_map_root().unwrap();
        assert_eq!(reader.read_string().unwrap(), "b");
        reader.read_array_root().unwrap();
        assert_eq!(reader.format_position().unwrap(), "#/b/0");
        assert!(reader.read_bool().unwrap());
        reader.read_none().unwrap();
        reader.read_array_end().unwrap();

        assert_eq!(reader.read_string().unwrap(), "a");
        assert_eq!(reader.read_double().unwrap(), -1.5);
        assert_eq!(reader.read_string().unwrap(), "c");
        assert_eq!(reader.peek().unwrap(), DataEntry::UInt64);
        assert_eq!(reader.read_uint64().unwrap(), u64::MAX);
        reader.read_map_end().unwrap();
        assert_eq!(reader.peek().unwrap(), DataEntry::Nil);
    }

    #[test]
    fn kind_mismatch_consumes_nothing() {
        let doc = json!(["x", 7]);
        let mut reader = JsonReader::new(&doc);

        assert_eq!(reader.read_map_root().unwrap_err().code(), ErrorCode::ReadKindMismatch);
        reader.read_array_root().unwrap();

        let err = reader.read_int64().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReadKindMismatch);
        assert_eq!(err.arg("found"), Some("String"));
        assert_eq!(reader.read_string().unwrap(), "x");
        assert_eq!(reader.read_int64().unwrap(), 7);

        assert_eq!(reader.read_map_end().unwrap_err().code(), ErrorCode::ReadKindMismatch);
        reader.read_array_end().unwrap();
        assert_eq!(reader.read_bool().unwrap_err().code(), ErrorCode::UnexpectedEnd);
    }

    #[test]
    fn unsupported_kinds() {
        let doc = json!("x");
        let mut reader = JsonReader::new(&doc);
        assert_eq!(reader.read_name().unwrap_err().code(), ErrorCode::NotSupported);
        assert_eq!(reader.read_datum().unwrap_err().code(), ErrorCode::NotSupported);
    }
}
