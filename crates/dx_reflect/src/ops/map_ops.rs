use alloc::boxed::Box;
use core::fmt;

use crate::Reflect;

/// A key-value map.
///
/// Iteration order follows [`MapInfo::is_ordered`](crate::info::MapInfo::is_ordered):
/// deterministic for ordered maps, arbitrary otherwise.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    /// Inserts a pair, replacing any previous value for the key.
    ///
    /// On a type mismatch both halves are handed back untouched.
    fn insert(
        &mut self,
        key: Box<dyn Reflect>,
        value: Box<dyn Reflect>,
    ) -> Result<(), (Box<dyn Reflect>, Box<dyn Reflect>)>;

    fn clear(&mut self);

    fn iter(&self) -> Box<dyn Iterator<Item = (&dyn Reflect, &dyn Reflect)> + '_>;
}

pub(crate) fn map_debug(value: &dyn Map, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(value.iter()).finish()
}
