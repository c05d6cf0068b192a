//! Hash states and hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! [`FixedHashState`] produces hashes that only depend on the input, so
//! iteration order of [`HashMap`] is stable between runs of the same build.
//! [`NoOpHashState`] passes a `u64` straight through and is meant for keys
//! that are already well distributed, such as [`TypeId`](core::any::TypeId).

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};
pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
