use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::data::{DataEntry, EnumData};
use crate::datum::DatumRef;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::property::PropertyDesc;
use crate::reader::Reader;
use crate::types::{
    Blob, ClassRef, Delegate, FieldPath, InterfaceRef, LazyRef, MulticastDelegate, Name, ObjectRef,
    SoftClassRef, SoftObjectRef, SparseDelegate, Text, WeakRef,
};

/// The reader position a handler starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadMark {
    depth: usize,
    completed: u64,
}

/// A reader counting the nodes completed at every nesting depth.
///
/// A scalar completes at the depth it is read at; a composite completes at
/// the depth of its root once its end is read. The engine compares the
/// counts before and after each handler.
pub struct TrackedReader<'a> {
    inner: &'a mut dyn Reader,
    depth: usize,
    completed: Vec<u64>,
}

impl<'a> TrackedReader<'a> {
    pub fn new(inner: &'a mut dyn Reader) -> Self {
        Self {
            inner,
            depth: 0,
            completed: vec![0],
        }
    }

    /// Current nesting depth relative to where tracking started.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn mark(&self) -> ReadMark {
        ReadMark {
            depth: self.depth,
            completed: self.completed[self.depth],
        }
    }

    /// Checks that exactly one node was completed since `mark`.
    pub fn verify(&self, mark: ReadMark) -> DcResult<()> {
        let consumed = match self.depth.cmp(&mark.depth) {
            core::cmp::Ordering::Greater => {
                return Err(Diagnostic::new(ErrorCode::HandlerConsumedNothing)
                    .with_note("a composite was opened but not closed"));
            }
            core::cmp::Ordering::Less => {
                return Err(Diagnostic::new(ErrorCode::HandlerConsumedTooMuch)
                    .with_note("an enclosing composite was closed"));
            }
            core::cmp::Ordering::Equal => self.completed[self.depth] - mark.completed,
        };

        match consumed {
            1 => Ok(()),
            0 => Err(Diagnostic::new(ErrorCode::HandlerConsumedNothing)),
            n => Err(Diagnostic::new(ErrorCode::HandlerConsumedTooMuch).with_arg("nodes", n)),
        }
    }

    fn complete(&mut self) {
        self.completed[self.depth] += 1;
    }

    fn open(&mut self) {
        self.depth += 1;
        if self.completed.len() == self.depth {
            self.completed.push(0);
        } else {
            self.completed[self.depth] = 0;
        }
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.complete();
    }
}

macro_rules! tracked {
    (scalar $($method:ident -> $ty:ty;)*) => {
        $(
            fn $method(&mut self) -> DcResult<$ty> {
                let value = self.inner.$method()?;
                self.complete();
                Ok(value)
            }
        )*
    };
    (root $($method:ident -> $ty:ty;)*) => {
        $(
            fn $method(&mut self) -> DcResult<$ty> {
                let value = self.inner.$method()?;
                self.open();
                Ok(value)
            }
        )*
    };
    (end $($method:ident;)*) => {
        $(
            fn $method(&mut self) -> DcResult<()> {
                self.inner.$method()?;
                self.close();
                Ok(())
            }
        )*
    };
}

impl Reader for TrackedReader<'_> {
    #[inline]
    fn peek(&mut self) -> DcResult<DataEntry> {
        self.inner.peek()
    }

    tracked! { scalar
        read_none -> ();
        read_bool -> bool;
        read_name -> Name;
        read_string -> String;
        read_text -> Text;
        read_enum -> EnumData;
        read_float -> f32;
        read_double -> f64;
        read_int8 -> i8;
        read_int16 -> i16;
        read_int32 -> i32;
        read_int64 -> i64;
        read_uint8 -> u8;
        read_uint16 -> u16;
        read_uint32 -> u32;
        read_uint64 -> u64;
        read_blob -> Blob;
        read_object_reference -> ObjectRef;
        read_class_reference -> ClassRef;
        read_weak_object_reference -> WeakRef;
        read_lazy_object_reference -> LazyRef;
        read_soft_object_reference -> SoftObjectRef;
        read_soft_class_reference -> SoftClassRef;
        read_interface_reference -> InterfaceRef;
        read_field_path -> FieldPath;
        read_delegate -> Delegate;
        read_multicast_inline_delegate -> MulticastDelegate;
        read_multicast_sparse_delegate -> SparseDelegate;
    }

    tracked! { root
        read_struct_root -> Name;
        read_class_root -> Name;
        read_map_root -> ();
        read_array_root -> ();
        read_set_root -> ();
        read_optional_root -> ();
    }

    tracked! { end
        read_struct_end;
        read_class_end;
        read_map_end;
        read_array_end;
        read_set_end;
        read_optional_end;
    }

    fn read_datum(&mut self) -> DcResult<DatumRef<'_>> {
        let TrackedReader {
            inner,
            depth,
            completed,
        } = self;
        let datum = inner.read_datum()?;
        completed[*depth] += 1;
        Ok(datum)
    }

    #[inline]
    fn peek_read_property(&mut self) -> DcResult<Option<PropertyDesc>> {
        self.inner.peek_read_property()
    }

    #[inline]
    fn format_position(&self) -> Option<String> {
        self.inner.format_position()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::TrackedReader;
    use crate::diagnostic::ErrorCode;
    use crate::json::JsonReader;
    use crate::reader::{Reader, skip};

    #[test]
    fn one_node_per_mark() {
        let doc = json!([1, [2, 3], 4]);
        let mut json = JsonReader::new(&doc);
        let mut reader = TrackedReader::new(&mut json);

        reader.read_array_root().unwrap();
        assert_eq!(reader.depth(), 1);

        let mark = reader.mark();
        assert_eq!(reader.verify(mark).unwrap_err().code(), ErrorCode::HandlerConsumedNothing);
        reader.read_int64().unwrap();
        reader.verify(mark).unwrap();

        let mark = reader.mark();
        reader.read_array_root().unwrap();
        assert_eq!(reader.verify(mark).unwrap_err().code(), ErrorCode::HandlerConsumedNothing);
        reader.read_int64().unwrap();
        reader.read_int64().unwrap();
        reader.read_array_end().unwrap();
        reader.verify(mark).unwrap();

        let mark = reader.mark();
        skip(&mut reader).unwrap();
        reader.read_array_end().unwrap();
        let err = reader.verify(mark).unwrap_err();
        assert_eq!(err.code(), ErrorCode::HandlerConsumedTooMuch);
    }

    #[test]
    fn two_scalars_is_too_much() {
        let doc = json!([true, false]);
        let mut json = JsonReader::new(&doc);
        let mut reader = TrackedReader::new(&mut json);

        reader.read_array_root().unwrap();
        let mark = reader.mark();
        reader.read_bool().unwrap();
        reader.read_bool().unwrap();
        let err = reader.verify(mark).unwrap_err();
        assert_eq!(err.code(), ErrorCode::HandlerConsumedTooMuch);
        assert_eq!(err.arg("nodes"), Some("2"));
    }
}
