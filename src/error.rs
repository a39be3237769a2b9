use std::ops::Range;

use thiserror::Error;

/// Byte range into the parsed source
pub type Span = Range<usize>;

/// Errors raised while turning a schematic export into a [`Snapshot`](crate::Snapshot).
///
/// The comparison engine itself never fails; only ingestion does.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("SExpr {0} not found")]
    MissingChild(String),
    #[error("Value of {0} not found")]
    MissingValue(String),
    #[error("Unexpected end of input at {at:?}")]
    UnexpectedEof { at: Span },
    #[error("Expected {expected}, found {found} at {at:?}")]
    UnexpectedToken {
        expected: String,
        found: String,
        at: Span,
    },
    #[error("Unknown token at {at:?}")]
    UnknownToken { at: Span },
    #[error("Trailing input at {at:?}")]
    TrailingInput { at: Span },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unrecognised export layout, expected objDsn.lstSche, lstSche or lstPage")]
    UnknownLayout,
    #[error("Duplicate reference designator {reference}")]
    DuplicateReference { reference: String },
}
