//! Reader and writer over host object graphs.
//!
//! - [`PropertyReader`] walks a value through [`Reflect`] and yields its nodes.
//! - [`PropertyWriter`] fills a value in place from the nodes written to it.
//! - [`PropertyDesc`]: the static type of the next value, as exposed to the
//!   engine by [`Reader::peek_read_property`](crate::Reader::peek_read_property)
//!   and [`Writer::peek_write_property`](crate::Writer::peek_write_property).

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::PropertyReader;
pub use writer::PropertyWriter;

use alloc::string::String;
use core::any::TypeId;
use std::sync::OnceLock;

use dx_reflect::Reflect;
use dx_reflect::info::TypeInfo;
use dx_utils::TypeIdMap;

use crate::data::DataEntry;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::extra::AnyStruct;
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};

// -----------------------------------------------------------------------------
// PropertyDesc

/// The static type of a value slot.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDesc {
    pub entry: DataEntry,
    pub type_info: &'static TypeInfo,
}

impl PropertyDesc {
    /// Fails with [`UnsupportedType`](ErrorCode::UnsupportedType) if the type
    /// has no data entry.
    pub fn of(type_info: &'static TypeInfo) -> DcResult<Self> {
        Ok(Self {
            entry: data_entry_of(type_info)?,
            type_info,
        })
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_info.type_id()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_info.type_name()
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_info.is::<T>()
    }
}

// -----------------------------------------------------------------------------
// Data entries of host types

fn opaque_entries() -> &'static TypeIdMap<DataEntry> {
    static TABLE: OnceLock<TypeIdMap<DataEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = TypeIdMap::new();
        table.insert_type::<bool>(DataEntry::Bool);
        table.insert_type::<i8>(DataEntry::Int8);
        table.insert_type::<i16>(DataEntry::Int16);
        table.insert_type::<i32>(DataEntry::Int32);
        table.insert_type::<i64>(DataEntry::Int64);
        table.insert_type::<u8>(DataEntry::UInt8);
        table.insert_type::<u16>(DataEntry::UInt16);
        table.insert_type::<u32>(DataEntry::UInt32);
        table.insert_type::<u64>(DataEntry::UInt64);
        table.insert_type::<f32>(DataEntry::Float);
        table.insert_type::<f64>(DataEntry::Double);
        table.insert_type::<String>(DataEntry::String);
        table.insert_type::<Name>(DataEntry::Name);
        table.insert_type::<Text>(DataEntry::Text);
        table.insert_type::<Blob>(DataEntry::Blob);
        table.insert_type::<ObjectRef>(DataEntry::ObjectReference);
        table.insert_type::<ClassRef>(DataEntry::ClassReference);
        table.insert_type::<WeakRef>(DataEntry::WeakObjectReference);
        table.insert_type::<LazyRef>(DataEntry::LazyObjectReference);
        table.insert_type::<SoftObjectRef>(DataEntry::SoftObjectReference);
        table.insert_type::<SoftClassRef>(DataEntry::SoftClassReference);
        table.insert_type::<InterfaceRef>(DataEntry::InterfaceReference);
        table.insert_type::<FieldPath>(DataEntry::FieldPath);
        table.insert_type::<Delegate>(DataEntry::Delegate);
        table.insert_type::<MulticastDelegate>(DataEntry::MulticastInlineDelegate);
        table.insert_type::<SparseDelegate>(DataEntry::MulticastSparseDelegate);
        table.insert_type::<AnyStruct>(DataEntry::StructRoot);
        table
    })
}

/// The data entry a host type reads and writes as.
///
/// Composite kinds map to their root. Opaque types must be one of the value
/// types known to the engine.
pub fn data_entry_of(info: &TypeInfo) -> DcResult<DataEntry> {
    match info {
        TypeInfo::Struct(info) if info.is_class() => Ok(DataEntry::ClassRoot),
        TypeInfo::Struct(_) => Ok(DataEntry::StructRoot),
        TypeInfo::List(_) => Ok(DataEntry::ArrayRoot),
        TypeInfo::Set(_) => Ok(DataEntry::SetRoot),
        TypeInfo::Map(_) => Ok(DataEntry::MapRoot),
        TypeInfo::Optional(_) => Ok(DataEntry::OptionalRoot),
        TypeInfo::Enum(_) => Ok(DataEntry::Enum),
        TypeInfo::Opaque(_) => opaque_entries()
            .get(&info.type_id())
            .copied()
            .ok_or_else(|| unsupported(info)),
    }
}

#[cold]
pub(crate) fn unsupported(info: &TypeInfo) -> Diagnostic {
    Diagnostic::new(ErrorCode::UnsupportedType).with_arg("type", info.type_path())
}

/// Null strong references and empty shared structs.
pub(crate) fn is_null(value: &dyn Reflect) -> bool {
    if let Some(value) = value.downcast_ref::<ObjectRef>() {
        value.is_null()
    } else if let Some(value) = value.downcast_ref::<ClassRef>() {
        value.is_null()
    } else if let Some(value) = value.downcast_ref::<InterfaceRef>() {
        value.is_null()
    } else if let Some(value) = value.downcast_ref::<AnyStruct>() {
        !value.is_valid()
    } else {
        false
    }
}

/// The value a shared struct stands for, or the value itself.
pub(crate) fn transparent(value: &dyn Reflect) -> &dyn Reflect {
    match value.downcast_ref::<AnyStruct>().and_then(AnyStruct::get) {
        Some(inner) => inner,
        None => value,
    }
}

/// The data entry of a concrete value.
///
/// Unlike [`data_entry_of`] this sees through shared structs and reports
/// null references as [`DataEntry::None`].
pub(crate) fn value_entry(value: &dyn Reflect) -> DcResult<DataEntry> {
    if is_null(value) {
        return Ok(DataEntry::None);
    }

    let value = transparent(value);
    let info = value.reflect_type_info();
    match data_entry_of(info)? {
        DataEntry::StructRoot if info.is::<AnyStruct>() => Err(unsupported(info)),
        entry => Ok(entry),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use dx_reflect::info::Typed;

    use super::{PropertyDesc, data_entry_of, value_entry};
    use crate::data::DataEntry;
    use crate::diagnostic::ErrorCode;
    use crate::extra::AnyStruct;
    use crate::fixtures::{Actor, KeyableStruct, Unknown};
    use crate::types::{ObjectRef, WeakRef};

    #[test]
    fn static_entries() {
        assert_eq!(data_entry_of(u8::type_info()).unwrap(), DataEntry::UInt8);
        assert_eq!(data_entry_of(f32::type_info()).unwrap(), DataEntry::Float);
        assert_eq!(data_entry_of(WeakRef::type_info()).unwrap(), DataEntry::WeakObjectReference);
        assert_eq!(data_entry_of(Vec::<u8>::type_info()).unwrap(), DataEntry::ArrayRoot);
        assert_eq!(
            data_entry_of(BTreeMap::<String, i32>::type_info()).unwrap(),
            DataEntry::MapRoot
        );
        assert_eq!(data_entry_of(KeyableStruct::type_info()).unwrap(), DataEntry::StructRoot);
        assert_eq!(data_entry_of(Actor::type_info()).unwrap(), DataEntry::ClassRoot);

        let err = PropertyDesc::of(Unknown::type_info()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnsupportedType);
    }

    #[test]
    fn value_entries_see_nulls() {
        assert_eq!(value_entry(&ObjectRef::null()).unwrap(), DataEntry::None);
        assert_eq!(
            value_entry(&ObjectRef::new("/Game/Hero")).unwrap(),
            DataEntry::ObjectReference
        );
        assert_eq!(value_entry(&AnyStruct::none()).unwrap(), DataEntry::None);
        assert_eq!(
            value_entry(&AnyStruct::new(Actor::default())).unwrap(),
            DataEntry::ClassRoot
        );

        let desc = PropertyDesc::of(AnyStruct::type_info()).unwrap();
        assert_eq!(desc.entry, DataEntry::StructRoot);
        assert!(desc.is::<AnyStruct>());
    }
}
