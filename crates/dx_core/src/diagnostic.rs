//! Structured failures of a run.
//!
//! A [`Diagnostic`] carries an [`ErrorCode`], a list of context entries, the
//! path from the tree root to the failing node and, when known, the source
//! positions of the reader and the writer. Every fallible operation returns
//! [`DcResult`] and composes with `?`.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Result of every fallible engine operation.
pub type DcResult<T> = Result<T, Diagnostic>;

// -----------------------------------------------------------------------------
// Category

/// How a failure should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Broken nesting or handler contract; always fatal for the run.
    Structural,
    /// Input that does not fit the destination.
    Data,
    /// A type or reference that could not be resolved.
    Lookup,
    /// Missing or conflicting engine setup.
    Configuration,
    /// API misuse by the calling code.
    Usage,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => f.pad("structural"),
            Self::Data => f.pad("data"),
            Self::Lookup => f.pad("lookup"),
            Self::Configuration => f.pad("configuration"),
            Self::Usage => f.pad("usage"),
        }
    }
}

// -----------------------------------------------------------------------------
// ErrorCode

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    // structural
    #[error("end does not close the innermost open root")]
    UnbalancedEnd,
    #[error("handler did not consume its node")]
    HandlerConsumedNothing,
    #[error("handler consumed more than its node")]
    HandlerConsumedTooMuch,
    #[error("indent level went below zero")]
    NegativeIndent,
    #[error("handler left the path stack unbalanced")]
    PathUnbalanced,

    // data
    #[error("value does not match the expected kind")]
    TypeMismatch,
    #[error("number does not fit the destination")]
    OutOfRange,
    #[error("string is not a valid number")]
    ParseNumber,
    #[error("number is not integral")]
    NotIntegral,
    #[error("float is not finite")]
    NonFiniteFloat,
    #[error("field does not exist on the destination")]
    UnknownField,
    #[error("enum has no such member")]
    EnumMemberNotFound,
    #[error("input ended before the value was complete")]
    UnexpectedEnd,
    #[error("nesting is deeper than the configured limit")]
    DepthLimit,
    #[error("malformed reference")]
    InvalidReference,
    #[error("object does not start with a type key")]
    MissingTypeKey,
    #[error("malformed json")]
    Json,
    #[error("output sink rejected a write")]
    Output,

    // lookup
    #[error("type has no data entry")]
    UnsupportedType,
    #[error("type is not registered in the host model")]
    TypeNotRegistered,
    #[error("no handler for the type")]
    NoTypeHandler,

    // configuration
    #[error("no built-in handler for the node kind")]
    NoHandler,
    #[error("more than one predicated handler accepts the node")]
    AmbiguousHandler,
    #[error("registered type lacks a required type trait")]
    MissingTypeTrait,
    #[error("context has no host model")]
    NoHost,
    #[error("engine has no handlers")]
    NoHandlers,

    // usage
    #[error("read does not match the peeked kind")]
    ReadKindMismatch,
    #[error("write is not accepted at this position")]
    WriteKindMismatch,
    #[error("operation is not supported")]
    NotSupported,
    #[error("context is not prepared")]
    NotPrepared,
    #[error("strong reference must not be null")]
    NullReference,
    #[error("root value was already consumed")]
    RootConsumed,
    #[error("struct expects a field name first")]
    ExpectFieldName,
    #[error("no datum at this position")]
    DatumUnavailable,
}

impl ErrorCode {
    pub const fn category(self) -> Category {
        use ErrorCode::*;

        match self {
            UnbalancedEnd | HandlerConsumedNothing | HandlerConsumedTooMuch | NegativeIndent
            | PathUnbalanced => Category::Structural,
            TypeMismatch | OutOfRange | ParseNumber | NotIntegral | NonFiniteFloat
            | UnknownField | EnumMemberNotFound | UnexpectedEnd | DepthLimit
            | InvalidReference | MissingTypeKey | Json | Output => Category::Data,
            UnsupportedType | TypeNotRegistered | NoTypeHandler => Category::Lookup,
            NoHandler | AmbiguousHandler | MissingTypeTrait | NoHost | NoHandlers => {
                Category::Configuration
            }
            ReadKindMismatch | WriteKindMismatch | NotSupported | NotPrepared | NullReference
            | RootConsumed | ExpectFieldName | DatumUnavailable => Category::Usage,
        }
    }
}

// -----------------------------------------------------------------------------
// Diagnostic

/// One context entry of a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEntry {
    Arg { name: &'static str, value: String },
    Note(String),
}

#[derive(Debug, Clone)]
struct DiagnosticInner {
    code: ErrorCode,
    context: Vec<ContextEntry>,
    path: Option<String>,
    reader_position: Option<String>,
    writer_position: Option<String>,
}

/// A structured failure.
///
/// # Example
///
/// ```
/// use dx_core::{Category, Diagnostic, ErrorCode};
///
/// let diag = Diagnostic::new(ErrorCode::UnknownField).with_arg("field", "Ghost");
///
/// assert_eq!(diag.category(), Category::Data);
/// assert_eq!(diag.arg("field"), Some("Ghost"));
/// assert!(diag.is_recoverable());
/// ```
#[derive(Clone)]
pub struct Diagnostic(Box<DiagnosticInner>);

impl Diagnostic {
    #[cold]
    pub fn new(code: ErrorCode) -> Self {
        Self(Box::new(DiagnosticInner {
            code,
            context: Vec::new(),
            path: None,
            reader_position: None,
            writer_position: None,
        }))
    }

    /// Appends a named value.
    #[must_use]
    pub fn with_arg(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.0.context.push(ContextEntry::Arg {
            name,
            value: value.to_string(),
        });
        self
    }

    /// Appends free text.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.0.context.push(ContextEntry::Note(note.into()));
        self
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.0.code.category()
    }

    /// Data and lookup failures depend on the input; the caller may retry
    /// with corrected input.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self.category(), Category::Data | Category::Lookup)
    }

    #[inline]
    pub fn context(&self) -> &[ContextEntry] {
        &self.0.context
    }

    /// The value of the first argument called `name`.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.0.context.iter().find_map(|entry| match entry {
            ContextEntry::Arg { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn notes(&self) -> impl Iterator<Item = &str> {
        self.0.context.iter().filter_map(|entry| match entry {
            ContextEntry::Note(note) => Some(note.as_str()),
            ContextEntry::Arg { .. } => None,
        })
    }

    /// The path from the tree root to the failing node, such as `$.Items[2].Name`.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.0.path.as_deref()
    }

    #[inline]
    pub fn reader_position(&self) -> Option<&str> {
        self.0.reader_position.as_deref()
    }

    #[inline]
    pub fn writer_position(&self) -> Option<&str> {
        self.0.writer_position.as_deref()
    }

    #[inline]
    pub(crate) fn has_location(&self) -> bool {
        self.0.path.is_some()
    }

    pub(crate) fn set_location(
        &mut self,
        path: String,
        reader_position: Option<String>,
        writer_position: Option<String>,
    ) {
        self.0.path = Some(path);
        self.0.reader_position = reader_position;
        self.0.writer_position = writer_position;
    }
}

impl From<ErrorCode> for Diagnostic {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostic")
            .field("code", &self.0.code)
            .field("context", &self.0.context)
            .field("path", &self.0.path)
            .field("reader_position", &self.0.reader_position)
            .field("writer_position", &self.0.writer_position)
            .finish()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category(), self.0.code)?;
        for entry in &self.0.context {
            match entry {
                ContextEntry::Arg { name, value } => write!(f, ", {name}: '{value}'")?,
                ContextEntry::Note(note) => write!(f, ", {note}")?,
            }
        }
        if let Some(path) = &self.0.path {
            write!(f, "\n  path: {path}")?;
        }
        if let Some(position) = &self.0.reader_position {
            write!(f, "\n  reading: {position}")?;
        }
        if let Some(position) = &self.0.writer_position {
            write!(f, "\n  writing: {position}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Diagnostic {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.0.code)
    }
}

// -----------------------------------------------------------------------------
// DiagnosticConsumer

/// Receives every diagnostic surfaced by a top-level run.
pub trait DiagnosticConsumer: Send + Sync {
    fn consume(&self, diagnostic: &Diagnostic);
}

impl<T: DiagnosticConsumer + ?Sized> DiagnosticConsumer for Arc<T> {
    #[inline]
    fn consume(&self, diagnostic: &Diagnostic) {
        (**self).consume(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogConsumer;

impl DiagnosticConsumer for LogConsumer {
    fn consume(&self, diagnostic: &Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Stores diagnostics for later inspection.
#[derive(Debug, Default)]
pub struct CollectConsumer {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Removes and returns everything collected so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        core::mem::take(&mut *self.diagnostics.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticConsumer for CollectConsumer {
    fn consume(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;

    use super::{Category, CollectConsumer, Diagnostic, DiagnosticConsumer, ErrorCode};

    #[test]
    fn categories() {
        assert_eq!(ErrorCode::NegativeIndent.category(), Category::Structural);
        assert_eq!(ErrorCode::OutOfRange.category(), Category::Data);
        assert_eq!(ErrorCode::TypeNotRegistered.category(), Category::Lookup);
        assert_eq!(ErrorCode::NoTypeHandler.category(), Category::Lookup);
        assert_eq!(ErrorCode::NoHandler.category(), Category::Configuration);
        assert_eq!(ErrorCode::AmbiguousHandler.category(), Category::Configuration);
        assert_eq!(ErrorCode::ReadKindMismatch.category(), Category::Usage);

        assert!(Diagnostic::new(ErrorCode::UnsupportedType).is_recoverable());
        assert!(!Diagnostic::new(ErrorCode::NotPrepared).is_recoverable());
    }

    #[test]
    fn display_includes_context_and_location() {
        let mut diag = Diagnostic::new(ErrorCode::OutOfRange)
            .with_arg("value", 300)
            .with_note("destination is UInt8");
        diag.set_location(String::from("$.Level"), Some(String::from("/Level")), None);

        let text = diag.to_string();
        assert!(text.starts_with("[data] number does not fit the destination"));
        assert!(text.contains("value: '300'"));
        assert!(text.contains("destination is UInt8"));
        assert!(text.contains("path: $.Level"));
        assert!(text.contains("reading: /Level"));
        assert_eq!(diag.notes().count(), 1);
    }

    #[test]
    fn collect_consumer_through_arc() {
        let collect = Arc::new(CollectConsumer::new());
        let shared: Arc<dyn DiagnosticConsumer> = collect.clone();

        shared.consume(&Diagnostic::new(ErrorCode::Json));
        assert_eq!(collect.len(), 1);
        assert_eq!(collect.take()[0].code(), ErrorCode::Json);
        assert_eq!(collect.len(), 0);
    }
}
