use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use dx_reflect::Reflect;
use dx_reflect::info::StructInfo;
use dx_reflect::ops::{ReflectRef, Struct};

use crate::data::{DataEntry, EnumData};
use crate::datum::DatumRef;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::host::HostModel;
use crate::property::{PropertyDesc, is_null, transparent, value_entry};
use crate::reader::{Reader, read_mismatch};
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};

// -----------------------------------------------------------------------------
// Frames

enum Frame<'a> {
    Struct {
        value: &'a dyn Struct,
        info: &'static StructInfo,
        index: usize,
        at_value: bool,
    },
    Sequence {
        items: Vec<&'a dyn Reflect>,
        index: usize,
        end: DataEntry,
    },
    Map {
        entries: Vec<(&'a dyn Reflect, &'a dyn Reflect)>,
        index: usize,
        at_value: bool,
    },
    Optional {
        value: Option<&'a dyn Reflect>,
        done: bool,
    },
}

/// What the cursor points at.
#[derive(Clone, Copy)]
enum Next<'a> {
    Value(&'a dyn Reflect),
    FieldName(&'static str),
    /// The empty payload of an optional.
    Empty,
    End(DataEntry),
    Nil,
}

// -----------------------------------------------------------------------------
// PropertyReader

/// Reads a host value node by node.
///
/// Struct fields are yielded as a [`Name`](DataEntry::Name) holding the
/// reflected field name followed by the field value, in declaration order.
/// Null strong references and empty [`AnyStruct`](crate::extra::AnyStruct)s
/// read as [`None`](DataEntry::None).
pub struct PropertyReader<'a> {
    host: &'a dyn HostModel,
    root: Option<&'a dyn Reflect>,
    frames: Vec<Frame<'a>>,
}

impl<'a> PropertyReader<'a> {
    pub fn new(host: &'a dyn HostModel, value: &'a dyn Reflect) -> Self {
        Self {
            host,
            root: Some(value),
            frames: Vec::new(),
        }
    }

    /// Reads the value behind a datum.
    pub fn from_datum(datum: DatumRef<'a>) -> Self {
        Self::new(datum.host(), datum.reflect())
    }

    fn next(&self) -> Next<'a> {
        let Some(frame) = self.frames.last() else {
            return self.root.map_or(Next::Nil, Next::Value);
        };

        match frame {
            Frame::Struct {
                value,
                info,
                index,
                at_value,
            } => match info.field_at(*index) {
                Some(field) if *at_value => match value.field(field.name()) {
                    Some(field) => Next::Value(field),
                    None => Next::End(Self::struct_end(info)),
                },
                Some(field) => Next::FieldName(field.name()),
                None => Next::End(Self::struct_end(info)),
            },
            Frame::Sequence { items, index, end } => match items.get(*index) {
                Some(item) => Next::Value(*item),
                None => Next::End(*end),
            },
            Frame::Map {
                entries,
                index,
                at_value,
            } => match entries.get(*index) {
                Some((_, value)) if *at_value => Next::Value(*value),
                Some((key, _)) => Next::Value(*key),
                None => Next::End(DataEntry::MapEnd),
            },
            Frame::Optional { value, done } => match (value, done) {
                (_, true) => Next::End(DataEntry::OptionalEnd),
                (Some(value), false) => Next::Value(*value),
                (None, false) => Next::Empty,
            },
        }
    }

    fn struct_end(info: &StructInfo) -> DataEntry {
        if info.is_class() {
            DataEntry::ClassEnd
        } else {
            DataEntry::StructEnd
        }
    }

    fn entry_of(next: Next<'a>) -> DcResult<DataEntry> {
        match next {
            Next::Value(value) => value_entry(value),
            Next::FieldName(_) => Ok(DataEntry::Name),
            Next::Empty => Ok(DataEntry::None),
            Next::End(entry) => Ok(entry),
            Next::Nil => Ok(DataEntry::Nil),
        }
    }

    /// Moves past the node at the cursor.
    fn advance(&mut self) {
        match self.frames.last_mut() {
            None => self.root = None,
            Some(Frame::Struct {
                index, at_value, ..
            })
            | Some(Frame::Map {
                index, at_value, ..
            }) => {
                if *at_value {
                    *index += 1;
                }
                *at_value = !*at_value;
            }
            Some(Frame::Sequence { index, .. }) => *index += 1,
            Some(Frame::Optional { done, .. }) => *done = true,
        }
    }

    /// The value at the cursor, which must be of kind `expected`.
    fn expect_value(&self, expected: DataEntry) -> DcResult<&'a dyn Reflect> {
        let next = self.next();
        let found = Self::entry_of(next)?;
        match next {
            Next::Value(value) if found == expected => Ok(transparent(value)),
            _ => Err(read_mismatch(expected, found)),
        }
    }

    fn read_cloned<T: Reflect + Clone>(&mut self, expected: DataEntry) -> DcResult<T> {
        let value = self.expect_value(expected)?;
        let value = value.downcast_ref::<T>().cloned().ok_or_else(|| {
            Diagnostic::new(ErrorCode::TypeMismatch)
                .with_arg("expected", expected)
                .with_arg("type", value.reflect_type_info().type_path())
        })?;
        self.advance();
        Ok(value)
    }

    fn read_struct_like(&mut self, expected: DataEntry) -> DcResult<Name> {
        let value = self.expect_value(expected)?;
        let ReflectRef::Struct(value) = value.reflect_ref() else {
            return Err(read_mismatch(expected, DataEntry::None));
        };
        let info = value
            .reflect_type_info()
            .as_struct()
            .map_err(|_| read_mismatch(expected, DataEntry::None))?;

        self.frames.push(Frame::Struct {
            value,
            info,
            index: 0,
            at_value: false,
        });
        Ok(Name::from(info.ty().name()))
    }

    fn read_end(&mut self, expected: DataEntry) -> DcResult<()> {
        let found = Self::entry_of(self.next())?;
        if found != expected {
            return Err(read_mismatch(expected, found));
        }
        self.frames.pop();
        self.advance();
        Ok(())
    }
}

macro_rules! cloned_reads {
    ($( $method:ident -> $ty:ty => $entry:ident; )*) => {
        $(
            fn $method(&mut self) -> DcResult<$ty> {
                self.read_cloned::<$ty>(DataEntry::$entry)
            }
        )*
    };
}

impl Reader for PropertyReader<'_> {
    fn peek(&mut self) -> DcResult<DataEntry> {
        Self::entry_of(self.next())
    }

    fn read_none(&mut self) -> DcResult<()> {
        match self.next() {
            Next::Empty => {}
            Next::Value(value) if is_null(value) => {}
            next => return Err(read_mismatch(DataEntry::None, Self::entry_of(next)?)),
        }
        self.advance();
        Ok(())
    }

    fn read_name(&mut self) -> DcResult<Name> {
        if let Next::FieldName(name) = self.next() {
            self.advance();
            return Ok(Name::from(name));
        }
        self.read_cloned::<Name>(DataEntry::Name)
    }

    cloned_reads! {
        read_bool -> bool => Bool;
        read_string -> String => String;
        read_text -> Text => Text;
        read_float -> f32 => Float;
        read_double -> f64 => Double;
        read_int8 -> i8 => Int8;
        read_int16 -> i16 => Int16;
        read_int32 -> i32 => Int32;
        read_int64 -> i64 => Int64;
        read_uint8 -> u8 => UInt8;
        read_uint16 -> u16 => UInt16;
        read_uint32 -> u32 => UInt32;
        read_uint64 -> u64 => UInt64;
        read_blob -> Blob => Blob;
        read_object_reference -> ObjectRef => ObjectReference;
        read_class_reference -> ClassRef => ClassReference;
        read_weak_object_reference -> WeakRef => WeakObjectReference;
        read_lazy_object_reference -> LazyRef => LazyObjectReference;
        read_soft_object_reference -> SoftObjectRef => SoftObjectReference;
        read_soft_class_reference -> SoftClassRef => SoftClassReference;
        read_interface_reference -> InterfaceRef => InterfaceReference;
        read_field_path -> FieldPath => FieldPath;
        read_delegate -> Delegate => Delegate;
        read_multicast_inline_delegate -> MulticastDelegate => MulticastInlineDelegate;
        read_multicast_sparse_delegate -> SparseDelegate => MulticastSparseDelegate;
    }

    fn read_enum(&mut self) -> DcResult<EnumData> {
        let value = self.expect_value(DataEntry::Enum)?;
        let ReflectRef::Enum(value) = value.reflect_ref() else {
            return Err(read_mismatch(DataEntry::Enum, DataEntry::None));
        };
        let info = value
            .reflect_type_info()
            .as_enum()
            .map_err(|_| read_mismatch(DataEntry::Enum, DataEntry::None))?;

        let signed64 = value.discriminant();
        let name = if info.is_flags() {
            info.flags_name(signed64).unwrap_or_default()
        } else {
            value.variant_name().map(String::from).unwrap_or_default()
        };

        self.advance();
        Ok(EnumData {
            type_name: String::from(info.ty().name()),
            name,
            signed64,
            is_unsigned: info.is_unsigned(),
        })
    }

    fn read_struct_root(&mut self) -> DcResult<Name> {
        self.read_struct_like(DataEntry::StructRoot)
    }

    fn read_struct_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::StructEnd)
    }

    fn read_class_root(&mut self) -> DcResult<Name> {
        self.read_struct_like(DataEntry::ClassRoot)
    }

    fn read_class_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::ClassEnd)
    }

    fn read_map_root(&mut self) -> DcResult<()> {
        let value = self.expect_value(DataEntry::MapRoot)?;
        let ReflectRef::Map(value) = value.reflect_ref() else {
            return Err(read_mismatch(DataEntry::MapRoot, DataEntry::None));
        };
        self.frames.push(Frame::Map {
            entries: value.iter().collect(),
            index: 0,
            at_value: false,
        });
        Ok(())
    }

    fn read_map_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::MapEnd)
    }

    fn read_array_root(&mut self) -> DcResult<()> {
        let value = self.expect_value(DataEntry::ArrayRoot)?;
        let ReflectRef::List(value) = value.reflect_ref() else {
            return Err(read_mismatch(DataEntry::ArrayRoot, DataEntry::None));
        };
        self.frames.push(Frame::Sequence {
            items: value.iter().collect(),
            index: 0,
            end: DataEntry::ArrayEnd,
        });
        Ok(())
    }

    fn read_array_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::ArrayEnd)
    }

    fn read_set_root(&mut self) -> DcResult<()> {
        let value = self.expect_value(DataEntry::SetRoot)?;
        let ReflectRef::Set(value) = value.reflect_ref() else {
            return Err(read_mismatch(DataEntry::SetRoot, DataEntry::None));
        };
        self.frames.push(Frame::Sequence {
            items: value.iter().collect(),
            index: 0,
            end: DataEntry::SetEnd,
        });
        Ok(())
    }

    fn read_set_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::SetEnd)
    }

    fn read_optional_root(&mut self) -> DcResult<()> {
        let value = self.expect_value(DataEntry::OptionalRoot)?;
        let ReflectRef::Optional(value) = value.reflect_ref() else {
            return Err(read_mismatch(DataEntry::OptionalRoot, DataEntry::None));
        };
        self.frames.push(Frame::Optional {
            value: value.value(),
            done: false,
        });
        Ok(())
    }

    fn read_optional_end(&mut self) -> DcResult<()> {
        self.read_end(DataEntry::OptionalEnd)
    }

    fn read_datum(&mut self) -> DcResult<DatumRef<'_>> {
        let Next::Value(value) = self.next() else {
            let found = Self::entry_of(self.next())?;
            return Err(Diagnostic::new(ErrorCode::DatumUnavailable).with_arg("found", found));
        };
        let datum = DatumRef::new(self.host, value)?;
        self.advance();
        Ok(datum)
    }

    fn peek_read_property(&mut self) -> DcResult<Option<PropertyDesc>> {
        match self.next() {
            Next::Value(value) => PropertyDesc::of(value.reflect_type_info()).map(Some),
            _ => Ok(None),
        }
    }

    fn format_position(&self) -> Option<String> {
        let mut out = String::from("<host>");
        for frame in &self.frames {
            let _ = match frame {
                Frame::Struct { info, index, .. } => match info.field_at(*index) {
                    Some(field) => write!(out, " {}.{}", info.ty().name(), field.name()),
                    None => write!(out, " {}", info.ty().name()),
                },
                Frame::Sequence { index, .. } => write!(out, "[{index}]"),
                Frame::Map {
                    index, at_value, ..
                } => {
                    let half = if *at_value { "value" } else { "key" };
                    write!(out, "{{{half}#{index}}}")
                }
                Frame::Optional { .. } => write!(out, "?"),
            };
        }
        Some(out)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;

    use dx_reflect::registry::TypeRegistry;
    use dx_utils::collections::OrderedMap;

    use super::PropertyReader;
    use crate::data::DataEntry;
    use crate::diagnostic::ErrorCode;
    use crate::extra::AnyStruct;
    use crate::fixtures::{Actor, Color, KeyableStruct, Permissions};
    use crate::reader::{Reader, skip};
    use crate::types::{Name, ObjectRef};

    #[test]
    fn struct_fields_in_order() {
        let registry = TypeRegistry::new();
        let value = KeyableStruct {
            name: Name::from("Foo"),
            index: 7,
        };
        let mut reader = PropertyReader::new(&registry, &value);

        assert_eq!(reader.peek().unwrap(), DataEntry::StructRoot);
        assert_eq!(reader.peek_read_property().unwrap().unwrap().entry, DataEntry::StructRoot);
        assert_eq!(reader.read_struct_root().unwrap().as_str(), "KeyableStruct");

        assert_eq!(reader.peek().unwrap(), DataEntry::Name);
        assert!(reader.peek_read_property().unwrap().is_none());
        assert_eq!(reader.read_name().unwrap().as_str(), "Name");
        assert_eq!(reader.read_name().unwrap().as_str(), "Foo");

        assert_eq!(reader.read_name().unwrap().as_str(), "Index");
        assert_eq!(reader.format_position().unwrap(), "<host> KeyableStruct.Index");
        assert_eq!(reader.peek().unwrap(), DataEntry::Int16);
        let err = reader.read_int32().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReadKindMismatch);
        assert_eq!(reader.read_int16().unwrap(), 7);

        reader.read_struct_end().unwrap();
        assert_eq!(reader.peek().unwrap(), DataEntry::Nil);
        assert_eq!(reader.read_bool().unwrap_err().code(), ErrorCode::UnexpectedEnd);
    }

    #[test]
    fn containers_and_optionals() {
        let registry = TypeRegistry::new();
        let mut map = OrderedMap::new();
        map.insert(String::from("b"), Some(2u8));
        map.insert(String::from("a"), None);
        let mut reader = PropertyReader::new(&registry, &map);

        reader.read_map_root().unwrap();
        assert_eq!(reader.read_string().unwrap(), "b");
        reader.read_optional_root().unwrap();
        assert_eq!(reader.read_uint8().unwrap(), 2);
        reader.read_optional_end().unwrap();
        assert_eq!(reader.read_string().unwrap(), "a");
        reader.read_optional_root().unwrap();
        assert_eq!(reader.peek().unwrap(), DataEntry::None);
        reader.read_none().unwrap();
        reader.read_optional_end().unwrap();
        reader.read_map_end().unwrap();

        let set: BTreeSet<i32> = [3, 1].into_iter().collect();
        let mut reader = PropertyReader::new(&registry, &set);
        reader.read_set_root().unwrap();
        assert_eq!(reader.read_int32().unwrap(), 1);
        assert_eq!(reader.read_int32().unwrap(), 3);
        assert_eq!(reader.read_array_end().unwrap_err().code(), ErrorCode::ReadKindMismatch);
        reader.read_set_end().unwrap();
    }

    #[test]
    fn enums_and_flags() {
        let registry = TypeRegistry::new();
        let values = vec![Color::Blue];
        let mut reader = PropertyReader::new(&registry, &values);
        reader.read_array_root().unwrap();
        let data = reader.read_enum().unwrap();
        assert_eq!(data.type_name, "Color");
        assert_eq!(data.name, "Blue");
        assert_eq!(data.signed64, 2);
        assert!(data.is_unsigned);

        let flags = Permissions::READ | Permissions::WRITE;
        let mut reader = PropertyReader::new(&registry, &flags);
        assert_eq!(reader.read_enum().unwrap().name, "READ | WRITE");
    }

    #[test]
    fn nulls_and_shared_structs() {
        let registry = TypeRegistry::new();
        let actor = Actor {
            owner: ObjectRef::null(),
            payload: AnyStruct::new(KeyableStruct::default()),
            ..Actor::default()
        };
        let mut reader = PropertyReader::new(&registry, &actor);

        assert_eq!(reader.read_class_root().unwrap().as_str(), "Actor");
        assert_eq!(reader.read_name().unwrap().as_str(), "Owner");
        let desc = reader.peek_read_property().unwrap().unwrap();
        assert_eq!(desc.entry, DataEntry::ObjectReference);
        assert_eq!(reader.peek().unwrap(), DataEntry::None);
        reader.read_none().unwrap();

        assert_eq!(reader.read_name().unwrap().as_str(), "Payload");
        assert!(reader.peek_read_property().unwrap().unwrap().is::<AnyStruct>());
        assert_eq!(reader.read_struct_root().unwrap().as_str(), "KeyableStruct");
        skip(&mut reader).unwrap();
        skip(&mut reader).unwrap();
        skip(&mut reader).unwrap();
        skip(&mut reader).unwrap();
        reader.read_struct_end().unwrap();
    }

    #[test]
    fn datum_moves_past_the_value() {
        let registry = TypeRegistry::new();
        let values = vec![4u16, 5];
        let mut reader = PropertyReader::new(&registry, &values);

        reader.read_array_root().unwrap();
        let datum = reader.read_datum().unwrap();
        assert_eq!(datum.downcast_ref::<u16>(), Some(&4));
        assert_eq!(reader.read_uint16().unwrap(), 5);
        assert_eq!(reader.read_datum().unwrap_err().code(), ErrorCode::DatumUnavailable);
    }
}
