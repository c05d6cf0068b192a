//! Runtime reflection for host object graphs.
//!
//! This crate describes *what* a value looks like at runtime so that code
//! which does not know the concrete type can still walk and mutate it:
//!
//! - [`Reflect`]: the object-safe entry point, implemented by every reflected type.
//! - [`info`]: static type descriptions ([`TypeInfo`](info::TypeInfo)), one per type.
//! - [`ops`]: kind-specific views (`Struct`, `List`, `Set`, `Map`, `Optional`, `Enum`).
//! - [`registry`]: a [`TypeRegistry`](registry::TypeRegistry) mapping type ids and
//!   names to [`TypeMeta`](registry::TypeMeta) plus per-type capabilities.
//!
//! Types are made reflectable with declarative macros:
//!
//! ```
//! use dx_reflect::{reflect_struct, Reflect};
//! use dx_reflect::ops::ReflectRef;
//!
//! reflect_struct! {
//!     #[derive(Debug, Default)]
//!     pub struct Point {
//!         pub x: i32,
//!         pub y: i32 => "Y",
//!     }
//! }
//!
//! let point = Point { x: 1, y: 2 };
//! let ReflectRef::Struct(view) = point.reflect_ref() else { unreachable!() };
//!
//! assert_eq!(view.name_at(1), Some("Y"));
//! assert_eq!(view.field("Y").and_then(|v| v.downcast_ref::<i32>()), Some(&2));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod macros;
mod reflect;

pub mod impls;
pub mod info;
pub mod ops;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-level exports

pub use reflect::Reflect;

pub use bitflags;

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::vec::Vec;
}
