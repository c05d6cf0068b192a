use core::fmt;

use crate::Reflect;
use crate::info::NamedField;

/// A struct with named fields.
///
/// Field order is the declaration order recorded in
/// [`StructInfo`](crate::info::StructInfo).
pub trait Struct: Reflect {
    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    fn name_at(&self, index: usize) -> Option<&'static str> {
        let info = self.reflect_type_info().as_struct().ok()?;
        info.field_at(index).map(NamedField::name)
    }

    fn field_at(&self, index: usize) -> Option<&dyn Reflect> {
        self.name_at(index).and_then(|name| self.field(name))
    }

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        let name = self.name_at(index)?;
        self.field_mut(name)
    }

    fn field_len(&self) -> usize {
        self.reflect_type_info()
            .as_struct()
            .map_or(0, |info| info.field_len())
    }
}

pub(crate) fn struct_debug(value: &dyn Struct, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct(value.reflect_type_info().type_name());
    for index in 0..value.field_len() {
        if let (Some(name), Some(field)) = (value.name_at(index), value.field_at(index)) {
            debug.field(name, &field);
        }
    }
    debug.finish()
}
