//! The state of one run.
//!
//! A [`Context`] binds a reader, a writer and an engine. Handlers receive it
//! and recurse into [`Context::dispatch`] for every nested value.

// -----------------------------------------------------------------------------
// Modules

mod tracked;

// -----------------------------------------------------------------------------
// Exports

pub use tracked::{ReadMark, TrackedReader};

use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::engine::{Engine, dispatch_one};
use crate::host::HostModel;
use crate::path::{PathFrame, PathSegment, PathStack};
use crate::property::PropertyDesc;
use crate::reader::Reader;
use crate::writer::Writer;

// -----------------------------------------------------------------------------
// RunState

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    /// Prepared, waiting for the top-level call.
    Ready,
    Running,
    Succeeded,
    Failed,
}

// -----------------------------------------------------------------------------
// Context

/// One run of an engine from a reader into a writer.
///
/// The context borrows the engine for its whole life, so handlers cannot be
/// registered while a run is prepared.
///
/// # Example
///
/// ```
/// use dx_core::{Context, Deserializer, RunState};
/// use dx_core::json::{JsonReader, JsonWriter};
/// use serde_json::json;
///
/// let engine = Deserializer::pipe();
/// let doc = json!([1, "two"]);
/// let mut reader = JsonReader::new(&doc);
/// let mut writer = JsonWriter::new();
///
/// let mut ctx = Context::new(&engine, &mut reader, &mut writer);
/// ctx.prepare().unwrap();
/// ctx.deserialize().unwrap();
/// assert_eq!(ctx.state(), RunState::Succeeded);
/// drop(ctx);
///
/// assert_eq!(writer.into_value().unwrap(), doc);
/// ```
pub struct Context<'a, E: Engine> {
    pub reader: TrackedReader<'a>,
    pub writer: &'a mut dyn Writer,
    pub path: PathStack,
    engine: &'a E,
    host: Option<&'a dyn HostModel>,
    state: RunState,
    property: Option<PropertyDesc>,
}

impl<'a, E: Engine> Context<'a, E> {
    pub fn new(engine: &'a E, reader: &'a mut dyn Reader, writer: &'a mut dyn Writer) -> Self {
        Self {
            reader: TrackedReader::new(reader),
            writer,
            path: PathStack::new(),
            engine,
            host: None,
            state: RunState::NotStarted,
            property: None,
        }
    }

    /// Binds the host model handlers resolve types through.
    pub fn with_host(mut self, host: &'a dyn HostModel) -> Self {
        self.host = Some(host);
        self
    }

    /// Validates the bindings and resets the path.
    pub fn prepare(&mut self) -> DcResult<()> {
        if self.engine.registry().is_empty() {
            return Err(Diagnostic::new(ErrorCode::NoHandlers).with_arg("engine", E::NAME));
        }
        self.path.clear();
        self.property = None;
        self.state = RunState::Ready;
        Ok(())
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn engine(&self) -> &'a E {
        self.engine
    }

    #[inline]
    pub fn options(&self) -> &'a E::Options {
        self.engine.options()
    }

    pub fn host(&self) -> DcResult<&'a dyn HostModel> {
        self.host
            .ok_or_else(|| Diagnostic::new(ErrorCode::NoHost).with_arg("engine", E::NAME))
    }

    /// The expected type of the value being handled, if either side knows it.
    #[inline]
    pub fn property(&self) -> Option<&PropertyDesc> {
        self.property.as_ref()
    }

    #[inline]
    pub(crate) fn replace_property(&mut self, desc: Option<PropertyDesc>) -> Option<PropertyDesc> {
        core::mem::replace(&mut self.property, desc)
    }

    /// Pushes a path frame for a composite being entered.
    #[inline]
    pub fn enter(&mut self, frame: PathFrame) {
        self.path.push(frame);
    }

    /// Pops the innermost path frame, which must match `end`.
    #[inline]
    pub fn leave(&mut self, end: crate::data::DataEntry) -> DcResult<()> {
        self.path.pop(end).map(drop)
    }

    #[inline]
    pub fn set_segment(&mut self, segment: PathSegment) {
        self.path.set_segment(segment);
    }

    /// Handles one value.
    ///
    /// Called on a prepared context this is the top-level run: the outcome
    /// moves the state to `Succeeded` or `Failed`, and a failure is handed to
    /// the engine's consumer before it is returned. Handlers call it while
    /// running to recurse.
    pub fn dispatch(&mut self) -> DcResult<()> {
        match self.state {
            RunState::Running => dispatch_one(self),
            RunState::Ready => {
                self.state = RunState::Running;
                log::debug!("{} run started", E::NAME);

                let result = dispatch_one(self);
                match &result {
                    Ok(()) => {
                        self.state = RunState::Succeeded;
                        log::debug!("{} run succeeded", E::NAME);
                    }
                    Err(err) => {
                        self.state = RunState::Failed;
                        self.path.clear();
                        log::debug!("{} run failed: {}", E::NAME, err.code());
                        self.engine.consumer().consume(err);
                    }
                }
                self.property = None;
                result
            }
            state => Err(Diagnostic::new(ErrorCode::NotPrepared)
                .with_arg("state", format_args!("{state:?}"))),
        }
    }

    #[inline]
    pub fn deserialize(&mut self) -> DcResult<()> {
        self.dispatch()
    }

    #[inline]
    pub fn serialize(&mut self) -> DcResult<()> {
        self.dispatch()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use serde_json::json;

    use super::{Context, RunState};
    use crate::data::DataEntry;
    use crate::de::Deserializer;
    use crate::diagnostic::{CollectConsumer, ErrorCode};
    use crate::json::{JsonReader, JsonWriter};
    use crate::reader::Reader;

    #[test]
    fn must_prepare_first() {
        let engine = Deserializer::pipe();
        let doc = json!(1);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();

        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        assert_eq!(ctx.state(), RunState::NotStarted);
        assert_eq!(ctx.deserialize().unwrap_err().code(), ErrorCode::NotPrepared);
        assert_eq!(ctx.host().err().map(|e| e.code()), Some(ErrorCode::NoHost));

        ctx.prepare().unwrap();
        ctx.deserialize().unwrap();
        assert_eq!(ctx.state(), RunState::Succeeded);
        assert_eq!(ctx.deserialize().unwrap_err().code(), ErrorCode::NotPrepared);
    }

    #[test]
    fn empty_registry_is_rejected() {
        let engine = Deserializer::new();
        let doc = json!(1);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();

        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        assert_eq!(ctx.prepare().unwrap_err().code(), ErrorCode::NoHandlers);
    }

    #[test]
    fn consumption_is_checked() {
        let collect = Arc::new(CollectConsumer::new());
        let mut engine = Deserializer::new().with_consumer(collect.clone());
        engine.registry_mut().register_entry(DataEntry::ArrayRoot, |ctx| {
            ctx.reader.read_array_root()?;
            ctx.writer.write_array_root()
        });

        let doc = json!([]);
        let mut reader = JsonReader::new(&doc);
        let mut writer = JsonWriter::new();
        let mut ctx = Context::new(&engine, &mut reader, &mut writer);
        ctx.prepare().unwrap();

        let err = ctx.deserialize().unwrap_err();
        assert_eq!(err.code(), ErrorCode::HandlerConsumedNothing);
        assert_eq!(ctx.state(), RunState::Failed);
        assert!(ctx.path.is_empty());
        assert_eq!(collect.take()[0].code(), ErrorCode::HandlerConsumedNothing);
    }
}
