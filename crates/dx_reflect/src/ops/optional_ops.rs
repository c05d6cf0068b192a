use core::fmt;

use crate::Reflect;

/// A value that may be absent.
pub trait Optional: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn is_some(&self) -> bool {
        self.value().is_some()
    }

    fn set_none(&mut self);

    /// Replaces the content with a default-constructed value and returns it.
    fn insert_default(&mut self) -> &mut dyn Reflect;
}

pub(crate) fn optional_debug(value: &dyn Optional, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.value() {
        Some(inner) => f.debug_tuple("Some").field(&inner).finish(),
        None => f.write_str("None"),
    }
}
