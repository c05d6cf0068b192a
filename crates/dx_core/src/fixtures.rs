//! Reflected types shared by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use dx_reflect::bitflags::bitflags;
use dx_reflect::{impl_reflect_flags, impl_reflect_opaque, reflect_class, reflect_enum, reflect_struct};

use crate::extra::AnyStruct;
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};

reflect_struct! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct KeyableStruct {
        pub name: Name => "Name",
        pub index: i16 => "Index",
    }
}

reflect_struct! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ScalarStruct {
        pub flag: bool => "Bool",
        pub int8: i8 => "Int8",
        pub int16: i16 => "Int16",
        pub int32: i32 => "Int32",
        pub int64: i64 => "Int64",
        pub uint8: u8 => "UInt8",
        pub uint16: u16 => "UInt16",
        pub uint32: u32 => "UInt32",
        pub uint64: u64 => "UInt64",
        pub float: f32 => "Float",
        pub double: f64 => "Double",
        pub string: String => "String",
        pub text: Text => "Text",
        pub blob: Blob => "Blob",
    }
}

reflect_enum! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub enum Color: u8 {
        #[default]
        Red = 0,
        Green = 1,
        Blue = 2,
    }
}

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Permissions: u32 {
        const READ = 1;
        const WRITE = 2;
    }
}

impl_reflect_flags!(Permissions);

reflect_class! {
    #[derive(Debug, Default)]
    pub struct Actor {
        pub owner: ObjectRef => "Owner",
        pub payload: AnyStruct => "Payload",
        pub weak: WeakRef => "Weak",
        pub soft: SoftObjectRef => "Soft",
        pub tags: Vec<Name> => "Tags",
        pub color: Color => "Color",
    }
}

reflect_struct! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct References {
        pub class: ClassRef => "Class",
        pub lazy: LazyRef => "Lazy",
        pub soft_class: SoftClassRef => "SoftClass",
        pub interface: InterfaceRef => "Interface",
        pub field: FieldPath => "Field",
        pub delegate: Delegate => "Delegate",
        pub multicast: MulticastDelegate => "Multicast",
        pub sparse: SparseDelegate => "Sparse",
    }
}

/// Reflected, but has no data entry.
#[derive(Debug, Default)]
pub struct Unknown(pub u32);

impl_reflect_opaque!(Unknown);
