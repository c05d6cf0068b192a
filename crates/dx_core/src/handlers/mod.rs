//! Shipped handler sets.
//!
//! - Pipe handlers copy node by node between any reader and writer.
//! - JSON deserialize handlers read a [`JsonReader`](crate::json::JsonReader)
//!   into the slot type described by the writer.
//! - JSON serialize handlers are the pipe handlers plus the JSON forms of
//!   enums and shared structs.

// -----------------------------------------------------------------------------
// Modules

mod json_de;
mod json_ser;
mod numeric;
mod pipe;

// -----------------------------------------------------------------------------
// Exports

pub use json_de::setup_json_deserialize_handlers;
pub use json_ser::setup_json_serialize_handlers;
pub use pipe::{copy, copy_scalar, setup_pipe_deserialize_handlers, setup_pipe_serialize_handlers};

use crate::context::Context;
use crate::data::DataEntry;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::engine::Engine;
use crate::reader::Reader;

/// Key of the payload type in the JSON form of a shared struct.
pub const TYPE_KEY: &str = "$type";

#[cold]
pub(crate) fn type_mismatch(expected: impl core::fmt::Display, found: DataEntry) -> Diagnostic {
    Diagnostic::new(ErrorCode::TypeMismatch)
        .with_arg("expected", expected)
        .with_arg("found", found)
}

/// Whether the reader is at `end`; running out of input is an error.
pub(crate) fn at_end<E: Engine>(ctx: &mut Context<'_, E>, end: DataEntry) -> DcResult<bool> {
    match ctx.reader.peek()? {
        entry if entry == end => Ok(true),
        DataEntry::Nil => Err(Diagnostic::new(ErrorCode::UnexpectedEnd).with_arg("expected", end)),
        _ => Ok(false),
    }
}
