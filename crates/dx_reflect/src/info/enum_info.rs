use alloc::boxed::Box;
use alloc::string::String;

use crate::info::{Type, Typed};

// -----------------------------------------------------------------------------
// EnumVariant

/// One named member of a C-like or flag enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumVariant {
    name: &'static str,
    value: i64,
}

impl EnumVariant {
    /// `value` holds the bit pattern of the discriminant; unsigned
    /// discriminants above `i64::MAX` wrap into the negative range.
    #[inline]
    pub const fn new(name: &'static str, value: i64) -> Self {
        Self { name, value }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

// -----------------------------------------------------------------------------
// EnumInfo

/// Type info for fieldless enums and bit flag sets.
///
/// Flag enums describe each named bit as a variant; a value is any
/// combination of them and its name joins the members with `" | "`.
#[derive(Clone, Debug)]
pub struct EnumInfo {
    ty: Type,
    variants: Box<[EnumVariant]>,
    unsigned: bool,
    flags: bool,
}

impl EnumInfo {
    pub fn new<T: Typed>(variants: &[EnumVariant], unsigned: bool) -> Self {
        Self {
            ty: Type::of::<T>(),
            variants: variants.into(),
            unsigned,
            flags: false,
        }
    }

    #[inline]
    pub fn with_flags(mut self, flags: bool) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// `true` if the underlying representation is an unsigned integer.
    #[inline]
    pub const fn is_unsigned(&self) -> bool {
        self.unsigned
    }

    #[inline]
    pub const fn is_flags(&self) -> bool {
        self.flags
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }

    /// Joins the names of the set bits of `value` with `" | "`.
    ///
    /// Returns `None` if some set bit has no name. Zero maps to the
    /// variant named for zero, or to the empty string.
    pub fn flags_name(&self, value: i64) -> Option<String> {
        if value == 0 {
            let name = self.variant_by_value(0).map(EnumVariant::name);
            return Some(String::from(name.unwrap_or_default()));
        }

        let mut out = String::new();
        let mut remaining = value;
        for variant in self.variants.iter() {
            let bits = variant.value;
            if bits != 0 && value & bits == bits && remaining & bits != 0 {
                if !out.is_empty() {
                    out.push_str(" | ");
                }
                out.push_str(variant.name);
                remaining &= !bits;
            }
        }

        (remaining == 0).then_some(out)
    }

    /// Parses a `" | "`-joined list of member names into a value.
    pub fn parse_flags(&self, text: &str) -> Option<i64> {
        text.split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(0i64, |acc, name| self.variant(name).map(|v| acc | v.value))
    }
}
