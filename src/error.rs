//! Structured error types for the label rendering pipeline.
//!
//! Three failure sources surface to callers: input parsing, template
//! geometry, and canvas allocation/commit. Symbol-encoding failures never
//! appear here; they are recovered inside the renderer, which leaves the
//! affected region blank and keeps going.

use thiserror::Error;

use crate::canvas::CanvasError;
use crate::template::TemplateError;

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum LabelError {
    /// JSON input failed to parse as a label-data record.
    #[error("failed to parse label data: {source}\n  hint: {hint}")]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// The layout template is internally inconsistent. Raised at
    /// resolution time, before any drawing occurs.
    #[error("invalid layout template: {0}")]
    Template(#[from] TemplateError),

    /// The page could not be allocated or committed. There is no partial
    /// output for the affected render.
    #[error("canvas failure: {0}")]
    Canvas(#[from] CanvasError),
}

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "check for trailing commas, missing quotes, or unescaped characters".to_string()
            }
            serde_json::error::Category::Data => {
                "the JSON is valid but does not match the label-data record; check field names and types"
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "unexpected end of input; is the document truncated?".to_string()
            }
            serde_json::error::Category::Io => "could not read the input".to_string(),
        };
        LabelError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_a_syntax_hint() {
        let e = serde_json::from_str::<serde_json::Value>("{,}").unwrap_err();
        match LabelError::from(e) {
            LabelError::Parse { hint, .. } => assert!(hint.contains("trailing commas")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn truncated_input_carries_an_eof_hint() {
        let e = serde_json::from_str::<serde_json::Value>("{\"a\": ").unwrap_err();
        match LabelError::from(e) {
            LabelError::Parse { hint, .. } => assert!(hint.contains("truncated")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
