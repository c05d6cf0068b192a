//! JSON over [`serde_json::Value`] trees.
//!
//! [`JsonReader`] walks a borrowed document, [`JsonWriter`] builds a new one.
//! Object keys keep document order.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::JsonReader;
pub use writer::JsonWriter;

pub use serde_json::Value;

use alloc::string::String;

use crate::diagnostic::{DcResult, Diagnostic, ErrorCode};

/// Parses JSON text, reporting malformed input as a [`Json`](ErrorCode::Json)
/// data error with its line and column.
pub fn parse(text: &str) -> DcResult<Value> {
    serde_json::from_str(text).map_err(|err| {
        Diagnostic::new(ErrorCode::Json)
            .with_arg("line", err.line())
            .with_arg("column", err.column())
            .with_note(alloc::format!("{err}"))
    })
}

/// Renders a value as indented JSON text.
pub fn to_string_pretty(value: &Value) -> DcResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| Diagnostic::new(ErrorCode::Output).with_note(alloc::format!("{err}")))
}

/// Appends one JSON pointer token, escaped.
pub(crate) fn push_pointer_token(out: &mut String, token: &str) {
    out.push('/');
    for c in token.chars() {
        match c {
            '~' => out.push_str("~0"),
            '/' => out.push_str("~1"),
            c => out.push(c),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use super::{parse, push_pointer_token};
    use crate::diagnostic::ErrorCode;

    #[test]
    fn malformed_text() {
        assert_eq!(parse("[1, 2]").unwrap(), json!([1, 2]));

        let err = parse("{\"a\": }").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Json);
        assert_eq!(err.arg("line"), Some("1"));
    }

    #[test]
    fn pointer_escapes() {
        let mut out = String::from("#");
        push_pointer_token(&mut out, "a/b~c");
        assert_eq!(out, "#/a~1b~0c");
    }
}
