//! Optional value types built on top of the engine.

mod any_struct;

pub use any_struct::AnyStruct;
