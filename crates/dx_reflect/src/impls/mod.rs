//! Reflection for foreign types, plus the helpers the macros build on.
//!
//! - [`NonGenericTypeInfoCell`]: used to implement [`Typed`] for non-generic types.
//! - [`GenericTypeInfoCell`]: used to implement [`Typed`] for generic types.
//! - [`FlagBits`]: integer backing of flag enums.
//!
//! ## Implemented Menu
//!
//! - opaque: `bool`, `i8`-`i64`, `u8`-`u64`, `f32`, `f64`, `String`
//! - list: `Vec<T>`
//! - optional: `Option<T>`
//! - map: `std::collections::HashMap`, `BTreeMap`, `dx_utils::hash::HashMap`,
//!   `dx_utils::collections::OrderedMap`
//! - set: `std::collections::HashSet`, `BTreeSet`, `dx_utils::hash::HashSet`
//!
//! [`Typed`]: crate::info::Typed

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod flags;
mod list;
mod map;
mod optional;
mod primitives;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use flags::FlagBits;
