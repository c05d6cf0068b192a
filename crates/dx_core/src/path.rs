use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write};

use crate::data::DataEntry;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};

// -----------------------------------------------------------------------------
// PathSegment

/// The position inside the innermost open composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Nothing visited yet.
    Start,
    Field(Cow<'static, str>),
    Index(usize),
    MapKey(usize),
    MapValue(usize),
    /// The payload of an optional.
    Payload,
}

// -----------------------------------------------------------------------------
// PathFrame

/// One open composite node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFrame {
    pub root: DataEntry,
    pub name: Cow<'static, str>,
    pub segment: PathSegment,
}

impl PathFrame {
    pub fn new(root: DataEntry, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            root,
            name: name.into(),
            segment: PathSegment::Start,
        }
    }
}

// -----------------------------------------------------------------------------
// PathStack

/// The live structural location of a run.
///
/// A frame is pushed for every root and popped for every end, so the depth
/// always equals the current nesting depth.
///
/// # Example
///
/// ```
/// use dx_core::{DataEntry, PathFrame, PathSegment, PathStack};
///
/// let mut path = PathStack::new();
/// path.push(PathFrame::new(DataEntry::StructRoot, "Player"));
/// path.set_segment(PathSegment::Field("Items".into()));
/// path.push(PathFrame::new(DataEntry::ArrayRoot, ""));
/// path.set_segment(PathSegment::Index(2));
///
/// assert_eq!(path.snapshot(), "$.Items[2]");
/// path.pop(DataEntry::ArrayEnd).unwrap();
/// assert!(path.pop(DataEntry::MapEnd).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathStack {
    frames: Vec<PathFrame>,
}

impl PathStack {
    #[inline]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn frames(&self) -> &[PathFrame] {
        &self.frames
    }

    #[inline]
    pub fn top(&self) -> Option<&PathFrame> {
        self.frames.last()
    }

    #[inline]
    pub fn push(&mut self, frame: PathFrame) {
        self.frames.push(frame);
    }

    /// Pops the innermost frame, which must be opened by the root of `end`.
    pub fn pop(&mut self, end: DataEntry) -> DcResult<PathFrame> {
        match self.frames.pop() {
            Some(frame) if frame.root.matching_end() == Some(end) => Ok(frame),
            Some(frame) => {
                let err = Diagnostic::new(ErrorCode::UnbalancedEnd)
                    .with_arg("open", frame.root)
                    .with_arg("end", end);
                self.frames.push(frame);
                Err(err)
            }
            None => Err(Diagnostic::new(ErrorCode::UnbalancedEnd)
                .with_arg("end", end)
                .with_note("nothing is open")),
        }
    }

    /// Moves the innermost frame to `segment`; no-op on an empty stack.
    #[inline]
    pub fn set_segment(&mut self, segment: PathSegment) {
        if let Some(frame) = self.frames.last_mut() {
            frame.segment = segment;
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Renders the path as `$`, followed by `.field`, `[index]`,
    /// `{key#i}`, `{value#i}` or `?` per frame.
    #[inline]
    pub fn snapshot(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('$')?;
        for frame in &self.frames {
            match &frame.segment {
                PathSegment::Start => {}
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
                PathSegment::MapKey(index) => write!(f, "{{key#{index}}}")?,
                PathSegment::MapValue(index) => write!(f, "{{value#{index}}}")?,
                PathSegment::Payload => f.write_char('?')?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{PathFrame, PathSegment, PathStack};
    use crate::data::DataEntry;
    use crate::diagnostic::ErrorCode;

    #[test]
    fn snapshot_all_segments() {
        let mut path = PathStack::new();
        assert_eq!(path.snapshot(), "$");

        path.push(PathFrame::new(DataEntry::MapRoot, ""));
        path.set_segment(PathSegment::MapValue(1));
        path.push(PathFrame::new(DataEntry::OptionalRoot, ""));
        path.set_segment(PathSegment::Payload);
        path.push(PathFrame::new(DataEntry::MapRoot, ""));
        path.set_segment(PathSegment::MapKey(0));

        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "${value#1}?{key#0}");
    }

    #[test]
    fn pop_rejects_mismatched_end() {
        let mut path = PathStack::new();
        assert_eq!(
            path.pop(DataEntry::StructEnd).unwrap_err().code(),
            ErrorCode::UnbalancedEnd
        );

        path.push(PathFrame::new(DataEntry::ClassRoot, "Actor"));
        let err = path.pop(DataEntry::StructEnd).unwrap_err();
        assert_eq!(err.arg("open"), Some("ClassRoot"));
        assert_eq!(path.depth(), 1);

        let frame = path.pop(DataEntry::ClassEnd).unwrap();
        assert_eq!(frame.name, "Actor");
        assert!(path.is_empty());
    }
}
