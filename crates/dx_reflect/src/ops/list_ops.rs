use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;

/// A growable, ordered sequence.
pub trait List: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a value, handing it back if its type is not the item type.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Appends a default-constructed item and returns it.
    fn push_default(&mut self) -> &mut dyn Reflect;

    fn clear(&mut self);

    fn iter(&self) -> Box<dyn Iterator<Item = &dyn Reflect> + '_>;
}

pub(crate) fn list_debug(value: &dyn List, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(value.iter()).finish()
}
