use alloc::boxed::Box;
use core::any::TypeId;

use dx_utils::hash::HashMap;

use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// NamedField

/// A named field of a struct.
#[derive(Clone, Debug)]
pub struct NamedField {
    name: &'static str,
    type_id: TypeId,
    // Resolved on first use, so recursive structs can be described.
    type_info: fn() -> &'static TypeInfo,
}

impl NamedField {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            type_info: T::type_info,
        }
    }

    /// The reflected name, which may differ from the Rust identifier.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn type_is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Type info for structs with named fields.
///
/// A struct may be flagged as a *class*: a struct that is addressed by
/// identity in the host model. Both share the same layout description.
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    field_names: Box<[&'static str]>,
    field_indices: HashMap<&'static str, usize>,
    class: bool,
}

impl StructInfo {
    /// Fields keep the order given here, which is also the iteration order.
    pub fn new<T: Typed>(fields: &[NamedField]) -> Self {
        let field_indices = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.name(), index))
            .collect();
        let field_names = fields.iter().map(NamedField::name).collect();

        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            field_names,
            field_indices,
            class: false,
        }
    }

    /// Marks the struct as a class.
    #[inline]
    pub fn with_class(mut self, class: bool) -> Self {
        self.class = class;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn is_class(&self) -> bool {
        self.class
    }

    pub fn field(&self, name: &str) -> Option<&NamedField> {
        self.field_indices.get(name).map(|index| &self.fields[*index])
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.field_indices.get(name).copied()
    }

    #[inline]
    pub fn field_names(&self) -> &[&'static str] {
        &self.field_names
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, NamedField> {
        self.fields.iter()
    }
}
