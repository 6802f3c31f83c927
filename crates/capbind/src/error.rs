use crate::radix::Radix;
use capbind_format::{TemplateError, Verb};
use thiserror::Error;

/// Failure to convert one submatch into its destination.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("invalid boolean {text:?}")]
    InvalidBoolean { text: String },

    #[error("invalid integer {text:?} (radix {radix})")]
    InvalidInteger { text: String, radix: Radix },

    #[error("integer {text:?} out of range for {target}")]
    IntegerOverflow { text: String, target: &'static str },

    #[error("invalid float {text:?}")]
    InvalidFloat { text: String },

    #[error("expected a character, got empty input")]
    EmptyInput,

    #[error("did not consume last {remaining} bytes of {text:?}")]
    ExtraInput { remaining: usize, text: String },

    #[error("expected 1 byte, got {len}: {text:?}")]
    WrongByteCount { len: usize, text: String },

    #[error("did not consume last {remaining} bytes of input {text:?}")]
    UnconsumedInput { remaining: usize, text: String },

    #[error("scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Custom(anyhow::Error),
}

/// Failure while applying a scan template to a submatch.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("bad template: {0}")]
    Template(#[from] TemplateError),

    #[error("too few operands for format '{verb}'")]
    TooFewOperands { verb: Verb },

    #[error("too many operands: template reads {expected}, got {got}")]
    TooManyOperands { expected: usize, got: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("input does not match format: expected {expected:?}, found {found:?}")]
    LiteralMismatch { expected: char, found: char },

    #[error("bad verb '{verb}' for {operand}")]
    BadVerb { verb: Verb, operand: &'static str },

    #[error("expected {verb} token")]
    EmptyToken { verb: Verb },

    #[error("operand {index}: {source}")]
    Operand {
        index: usize,
        source: Box<BindError>,
    },
}
