use alloc::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::diagnostic::{DcResult, DiagnosticConsumer, LogConsumer};
use crate::engine::Engine;
use crate::handlers::{setup_json_deserialize_handlers, setup_pipe_deserialize_handlers};
use crate::property::PropertyDesc;
use crate::registry::HandlerRegistry;

/// What to do with a source key naming no destination field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownFieldPolicy {
    /// Skip the value.
    Ignore,
    #[default]
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeserializeOptions {
    pub unknown_fields: UnknownFieldPolicy,
    /// Accept an integral value for an enum when no member name matches.
    pub enum_from_integer: bool,
    /// Deepest nesting accepted before failing with `DepthLimit`.
    pub max_depth: usize,
}

impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFieldPolicy::Fail,
            enum_from_integer: false,
            max_depth: 64,
        }
    }
}

/// Drives a reader into a writer, resolving handlers by the type of the
/// destination slot.
///
/// # Example
///
/// ```
/// use dx_core::Deserializer;
/// use dx_core::de::{DeserializeOptions, UnknownFieldPolicy};
///
/// let options: DeserializeOptions =
///     serde_json::from_str(r#"{ "unknown_fields": "Ignore" }"#).unwrap();
/// assert_eq!(options.max_depth, 64);
///
/// let engine = Deserializer::json().with_options(options);
/// assert_eq!(engine.options().unknown_fields, UnknownFieldPolicy::Ignore);
/// ```
pub struct Deserializer {
    registry: HandlerRegistry<Self>,
    options: DeserializeOptions,
    consumer: Arc<dyn DiagnosticConsumer>,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer {
    /// An engine without handlers.
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            options: DeserializeOptions::default(),
            consumer: Arc::new(LogConsumer),
        }
    }

    /// Reads JSON into host values.
    pub fn json() -> Self {
        let mut engine = Self::new();
        setup_json_deserialize_handlers(&mut engine.registry);
        engine
    }

    /// Copies between any reader and writer kind by kind.
    pub fn pipe() -> Self {
        let mut engine = Self::new();
        setup_pipe_deserialize_handlers(&mut engine.registry);
        engine
    }

    pub fn with_options(mut self, options: DeserializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_consumer(mut self, consumer: Arc<dyn DiagnosticConsumer>) -> Self {
        self.consumer = consumer;
        self
    }

    #[inline]
    pub fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut HandlerRegistry<Self> {
        &mut self.registry
    }
}

impl Engine for Deserializer {
    const NAME: &'static str = "deserialize";

    type Options = DeserializeOptions;

    #[inline]
    fn registry(&self) -> &HandlerRegistry<Self> {
        &self.registry
    }

    #[inline]
    fn options(&self) -> &DeserializeOptions {
        &self.options
    }

    #[inline]
    fn max_depth(&self) -> usize {
        self.options.max_depth
    }

    #[inline]
    fn consumer(&self) -> &dyn DiagnosticConsumer {
        &*self.consumer
    }

    fn expected_property(ctx: &mut Context<'_, Self>) -> DcResult<Option<PropertyDesc>> {
        ctx.writer.peek_write_property()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{DeserializeOptions, Deserializer, UnknownFieldPolicy};
    use crate::engine::Engine;

    #[test]
    fn options_from_json() {
        let options: DeserializeOptions =
            serde_json::from_str(r#"{"enum_from_integer": true, "max_depth": 8}"#).unwrap();
        assert!(options.enum_from_integer);
        assert_eq!(options.unknown_fields, UnknownFieldPolicy::Fail);

        let engine = Deserializer::json().with_options(options);
        assert_eq!(engine.max_depth(), 8);
        assert!(!engine.registry().is_empty());
        assert!(Deserializer::new().registry().is_empty());
    }
}
