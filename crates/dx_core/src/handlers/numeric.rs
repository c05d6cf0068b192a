use core::fmt;

use crate::data::DataEntry;
use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};
use crate::handlers::type_mismatch;
use crate::reader::Reader;

/// A number as it comes from a text format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => fmt::Display::fmt(v, f),
            Self::UInt(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

/// Parses a number from a string such as a JSON object key.
pub(crate) fn parse_number(text: &str) -> DcResult<Number> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        Ok(Number::Int(v))
    } else if let Ok(v) = trimmed.parse::<u64>() {
        Ok(Number::UInt(v))
    } else if let Ok(v) = trimmed.parse::<f64>() {
        Ok(Number::Float(v))
    } else {
        Err(Diagnostic::new(ErrorCode::ParseNumber).with_arg("text", text))
    }
}

/// Reads a number node, or a string holding one.
pub(crate) fn read_number<R: Reader + ?Sized>(reader: &mut R) -> DcResult<Number> {
    match reader.peek()? {
        DataEntry::Int64 => reader.read_int64().map(Number::Int),
        DataEntry::UInt64 => reader.read_uint64().map(Number::UInt),
        DataEntry::Double => reader.read_double().map(Number::Float),
        DataEntry::String => parse_number(&reader.read_string()?),
        found => Err(type_mismatch("number", found)),
    }
}

/// Reads a number converted to `T`, checking range and integrality.
pub(crate) fn read_as<T: FromNumber, R: Reader + ?Sized>(reader: &mut R) -> DcResult<T> {
    T::from_number(read_number(reader)?)
}

// -----------------------------------------------------------------------------
// Conversions

pub(crate) trait FromNumber: Sized {
    const ENTRY: DataEntry;

    fn from_number(number: Number) -> DcResult<Self>;
}

#[cold]
fn out_of_range(entry: DataEntry, number: Number) -> Diagnostic {
    Diagnostic::new(ErrorCode::OutOfRange)
        .with_arg("value", number)
        .with_arg("target", entry)
}

fn integral(number: Number) -> DcResult<i128> {
    match number {
        Number::Int(v) => Ok(i128::from(v)),
        Number::UInt(v) => Ok(i128::from(v)),
        Number::Float(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i128),
        Number::Float(v) => Err(Diagnostic::new(ErrorCode::NotIntegral).with_arg("value", v)),
    }
}

macro_rules! impl_integral {
    ($($ty:ty => $entry:ident),* $(,)?) => {
        $(
            impl FromNumber for $ty {
                const ENTRY: DataEntry = DataEntry::$entry;

                fn from_number(number: Number) -> DcResult<Self> {
                    <$ty>::try_from(integral(number)?)
                        .map_err(|_| out_of_range(Self::ENTRY, number))
                }
            }
        )*
    };
}

impl_integral! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

impl FromNumber for f64 {
    const ENTRY: DataEntry = DataEntry::Double;

    fn from_number(number: Number) -> DcResult<Self> {
        Ok(match number {
            Number::Int(v) => v as f64,
            Number::UInt(v) => v as f64,
            Number::Float(v) => v,
        })
    }
}

impl FromNumber for f32 {
    const ENTRY: DataEntry = DataEntry::Float;

    fn from_number(number: Number) -> DcResult<Self> {
        let wide = f64::from_number(number)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(out_of_range(Self::ENTRY, number));
        }
        Ok(wide as f32)
    }
}

// -----------------------------------------------------------------------------
// Tests
