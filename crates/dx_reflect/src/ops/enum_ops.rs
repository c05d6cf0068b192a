use core::fmt;

use crate::Reflect;

/// A fieldless enum or a bit flag set.
///
/// The discriminant is widened to `i64`; unsigned representations keep their
/// bit pattern.
pub trait Enum: Reflect {
    fn discriminant(&self) -> i64;

    /// Sets the value from a discriminant.
    ///
    /// Returns `false`, leaving the value unchanged, if `value` names no
    /// member (or, for flags, contains unknown bits).
    fn set_discriminant(&mut self, value: i64) -> bool;

    /// The member name of the current value, if it is a single member.
    fn variant_name(&self) -> Option<&'static str> {
        let info = self.reflect_type_info().as_enum().ok()?;
        info.variant_by_value(self.discriminant()).map(|v| v.name())
    }
}

pub(crate) fn enum_debug(value: &dyn Enum, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value.variant_name() {
        Some(name) => f.write_str(name),
        None => write!(f, "{}({})", value.reflect_type_info().type_name(), value.discriminant()),
    }
}
