//! Framespan turns compact frame-range expressions into exact frame sets and
//! reconciles those sets against image sequences on disk.
//!
//! The library splits into two halves:
//!
//! - [`expression`]: lex, parse, expand and resolve expressions like
//!   `"1-10 ^3-5"` or `"1-2x0.1"` into an ordered, duplicate-free
//!   [`FrameSet`]. Subframes are exact fixed-precision decimals, never
//!   binary floats.
//! - [`sequence`]: scan a directory for the files of a numbered image
//!   sequence, diff them against an expected set, and fill gaps by copying
//!   the nearest existing frame.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod expression;
pub mod sequence;

pub use crate::foundation::core::{FrameSet, FrameValue, SceneRange};
pub use crate::foundation::error::{FramespanError, FramespanResult};

pub use crate::expression::expand::expand;
pub use crate::expression::parser::{Clause, ClauseBody, ClauseKind, parse};
pub use crate::expression::resolve::{ResolveMode, resolve, resolve_clauses};
pub use crate::sequence::fill::{FillAction, FillFailure, FillReport, fill, plan};
pub use crate::sequence::pattern::SequencePattern;
pub use crate::sequence::reconcile::{
    Expected, ReconciliationResult, SequenceEntry, interior_gaps, reconcile, reconcile_entries,
    reconcile_interior, scan,
};
