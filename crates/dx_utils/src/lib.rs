//! Small containers shared by the `dx` crates.
//!
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) with a no-op hasher.
//! - [`hash`]: hash states with fixed seeds, plus `HashMap`/`HashSet` aliases.
//! - [`collections::OrderedMap`]: a map that iterates in insertion order.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod collections;
pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
