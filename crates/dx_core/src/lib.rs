//! A format-agnostic data-interchange engine.
//!
//! Values travel as a stream of typed nodes ([`DataEntry`]) from a [`Reader`]
//! to a [`Writer`]. An engine ([`Deserializer`] or [`Serializer`]) walks the
//! stream and hands every node to the handler its [`HandlerRegistry`]
//! resolves for it; handlers recurse into composites through the
//! [`Context`], which also tracks the [`PathStack`] quoted by every
//! [`Diagnostic`].
//!
//! Shipped endpoints:
//!
//! - [`json`]: [`JsonReader`](json::JsonReader) and [`JsonWriter`](json::JsonWriter)
//!   over `serde_json` documents.
//! - [`property`]: [`PropertyReader`](property::PropertyReader) and
//!   [`PropertyWriter`](property::PropertyWriter) over host values reflected
//!   with `dx_reflect`, addressed through [`Datum`]s.
//! - [`pretty`]: a writer printing one line per node.
//!
//! # Example
//!
//! ```
//! use dx_core::types::Name;
//! use dx_reflect::reflect_struct;
//! use dx_reflect::registry::TypeRegistry;
//!
//! reflect_struct! {
//!     #[derive(Debug, Default)]
//!     struct Entry {
//!         name: Name => "Name",
//!         index: i16 => "Index",
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Entry>();
//!
//! let mut entry = Entry::default();
//! dx_core::deserialize_json_str(&registry, r#"{"Name": "Foo", "Index": 7}"#, &mut entry).unwrap();
//! assert_eq!(entry.name.as_str(), "Foo");
//!
//! let err = dx_core::deserialize_json_str(&registry, r#"{"Index": 1.5}"#, &mut entry).unwrap_err();
//! assert_eq!(err.code(), dx_core::ErrorCode::NotIntegral);
//! assert_eq!(err.path(), Some("$.Index"));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod context;
mod data;
mod datum;
mod diagnostic;
mod driver;
mod engine;
mod host;
mod path;
mod reader;
mod registry;
mod writer;

pub mod de;
pub mod extra;
pub mod handlers;
pub mod json;
pub mod pretty;
pub mod property;
pub mod ser;
pub mod types;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-level exports

pub use context::{Context, ReadMark, RunState, TrackedReader};
pub use data::{DataEntry, EnumData};
pub use datum::{Datum, DatumRef};
pub use de::Deserializer;
pub use diagnostic::{
    Category, CollectConsumer, ContextEntry, DcResult, Diagnostic, DiagnosticConsumer, ErrorCode,
    LogConsumer,
};
pub use driver::{
    copy_value, deserialize_json, deserialize_json_str, deserialize_json_with, log_value,
    pretty_print, serialize_json, serialize_json_string, serialize_json_with,
};
pub use engine::Engine;
pub use host::HostModel;
pub use path::{PathFrame, PathSegment, PathStack};
pub use reader::{Reader, read_end, read_root, read_scalar, skip};
pub use registry::{Handler, HandlerRegistry, HandlerTier, Predicate};
pub use ser::Serializer;
pub use writer::{Writer, write_end, write_root};
