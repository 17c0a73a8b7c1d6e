use std::path::PathBuf;

use crate::foundation::core::FrameValue;

/// Crate-wide result alias.
pub type FramespanResult<T> = Result<T, FramespanError>;

/// Errors produced while parsing expressions or reconciling sequences.
#[derive(thiserror::Error, Debug)]
pub enum FramespanError {
    /// Malformed expression grammar. Fail-fast: no partial frame list is
    /// ever produced for an invalid expression.
    #[error("parse error at token {token_index}: {reason}")]
    Parse {
        /// Human-readable description of the malformed construct.
        reason: String,
        /// Index of the offending token in the lexed stream.
        token_index: usize,
    },

    /// A stepped range with a zero or negative increment.
    #[error("invalid range step {0} (step must be > 0)")]
    InvalidStep(FrameValue),

    /// A range whose bounds do not fit the representable frame span at the
    /// precision its step demands.
    #[error("range {start}-{end} with step {step} is out of numeric range")]
    RangeOverflow {
        /// Lower bound of the offending range.
        start: FrameValue,
        /// Upper bound of the offending range.
        end: FrameValue,
        /// The range step.
        step: FrameValue,
    },

    /// A syntactically valid expression that denotes no frames at all.
    #[error("expression resolves to an empty frame set")]
    EmptyResult,

    /// A sequence filename template without a usable numeric placeholder.
    #[error("invalid sequence pattern: {0}")]
    Pattern(String),

    /// A directory that cannot be read (or a file that cannot be copied).
    #[error("filesystem error at '{}': {source}", path.display())]
    Filesystem {
        /// Path the operation failed on.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No source material exists to duplicate for a missing frame.
    #[error("no source frame available to fill frame {0}")]
    NoSourceFrame(FrameValue),

    #[error(transparent)]
    #[allow(missing_docs)]
    Other(#[from] anyhow::Error),
}

impl FramespanError {
    pub(crate) fn parse(reason: impl Into<String>, token_index: usize) -> Self {
        Self::Parse {
            reason: reason.into(),
            token_index,
        }
    }

    pub(crate) fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
