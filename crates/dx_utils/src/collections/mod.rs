//! Collection types not covered by `alloc`.

mod ordered_map;

pub use ordered_map::OrderedMap;
