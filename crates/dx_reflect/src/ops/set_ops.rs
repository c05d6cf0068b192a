use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;

/// A collection of unique values.
pub trait Set: Reflect {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, value: &dyn Reflect) -> bool;

    /// Inserts a value, returning `Ok(false)` if it was already present.
    ///
    /// The value is handed back if its type is not the element type.
    fn insert(&mut self, value: Box<dyn Reflect>) -> Result<bool, Box<dyn Reflect>>;

    fn clear(&mut self);

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

pub(crate) fn set_debug(value: &dyn Set, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(value.iter()).finish()
}
