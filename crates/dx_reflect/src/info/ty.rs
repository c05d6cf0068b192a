use alloc::boxed::Box;
use alloc::string::String;
use core::any::{TypeId, type_name};
use core::fmt;

// -----------------------------------------------------------------------------
// Type

/// The identity of a type: its [`TypeId`], full path and short name.
///
/// The short name drops module paths from every segment, so
/// `alloc::vec::Vec<my_crate::Foo>` becomes `Vec<Foo>`.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Describes `T`.
    ///
    /// Computing the short name allocates once; call this when building a
    /// [`TypeInfo`](crate::info::TypeInfo), not on hot paths.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let path = type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_type_name(path),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full path, as reported by [`core::any::type_name`].
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The path with module prefixes removed.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

fn is_delimiter(c: char) -> bool {
    matches!(c, '<' | '>' | ',' | ' ' | '[' | ']' | '(' | ')' | ';' | '&' | '*')
}

fn short_type_name(path: &'static str) -> &'static str {
    if !path.contains("::") {
        return path;
    }

    let mut out = String::with_capacity(path.len());
    let mut rest = path;
    while !rest.is_empty() {
        let end = rest.find(is_delimiter).unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        out.push_str(segment.rsplit("::").next().unwrap_or(segment));

        let mut chars = tail.chars();
        match chars.next() {
            Some(delimiter) => {
                out.push(delimiter);
                rest = chars.as_str();
            }
            None => rest = tail,
        }
    }

    Box::leak(out.into_boxed_str())
}

// -----------------------------------------------------------------------------
// Tests
