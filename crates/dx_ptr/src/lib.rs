//! Lifetime-carrying, type-erased pointers.
//!
//! [`Ptr<'a>`] and [`PtrMut<'a>`] stand in for `&'a T` and `&'a mut T` when
//! the pointee type is only known at runtime (for example through a type
//! registry). They keep the borrow lifetime that raw pointers lose, so a
//! pointer into a host object graph can never outlive the graph itself.
//!
//! Turning one back into a typed reference is `unsafe`: the caller vouches
//! for the pointee type.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use type_erased::{Ptr, PtrMut};
