//! Resolution of a clause sequence into the final frame set.
//!
//! The two modes are two pure functions over the same clause sequence:
//!
//! - [`ResolveMode::GlobalExclude`]: a single set subtraction. The first
//!   exclusion marker "sticks": every clause from there on participates as
//!   an exclusion whether or not it carries its own marker, so
//!   `"1-10 ^3-5, 9"` sweeps the trailing `9` into the exclusion as well.
//! - [`ResolveMode::PositionalFilter`]: clauses replay left to right
//!   against a running working set, so an inclusion appearing after an
//!   exclusion re-adds frames: `"1-10 23 ^3-7 4 6"` restores exactly 4
//!   and 6.

use std::collections::BTreeSet;

use crate::expression::expand::expand;
use crate::expression::parser::{Clause, ClauseKind, parse};
use crate::foundation::core::{FrameSet, FrameValue};
use crate::foundation::error::{FramespanError, FramespanResult};

/// How inclusion and exclusion clauses combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// One global subtraction; exclusion persists from its first marker to
    /// the end of the expression.
    #[default]
    GlobalExclude,
    /// Order-sensitive filtering over a running working set.
    PositionalFilter,
}

/// Parse and resolve an expression in one step.
///
/// Errors: [`FramespanError::Parse`] fail-fast on malformed grammar,
/// [`FramespanError::InvalidStep`] for a non-positive range step,
/// [`FramespanError::RangeOverflow`] for bounds that leave the
/// representable frame span, and [`FramespanError::EmptyResult`] when a
/// valid expression denotes no frames at all.
pub fn resolve(expression: &str, mode: ResolveMode) -> FramespanResult<FrameSet> {
    resolve_clauses(&parse(expression)?, mode)
}

/// Resolve an already-parsed clause sequence.
pub fn resolve_clauses(clauses: &[Clause], mode: ResolveMode) -> FramespanResult<FrameSet> {
    let set = match mode {
        ResolveMode::GlobalExclude => global_exclude(clauses)?,
        ResolveMode::PositionalFilter => positional_filter(clauses)?,
    };
    if set.is_empty() {
        return Err(FramespanError::EmptyResult);
    }
    Ok(FrameSet::from_sorted(set.into_iter().collect()))
}

fn global_exclude(clauses: &[Clause]) -> FramespanResult<BTreeSet<FrameValue>> {
    let first_exclusion = clauses
        .iter()
        .position(|c| c.kind == ClauseKind::Exclude);

    let mut include = BTreeSet::new();
    let mut exclude = BTreeSet::new();
    for clause in clauses {
        let values = expand(clause)?;
        match first_exclusion {
            Some(cut) if clause.position >= cut => exclude.extend(values),
            _ => include.extend(values),
        }
    }
    Ok(&include - &exclude)
}

fn positional_filter(clauses: &[Clause]) -> FramespanResult<BTreeSet<FrameValue>> {
    let mut working = BTreeSet::new();
    for clause in clauses {
        let values = expand(clause)?;
        match clause.kind {
            ClauseKind::Include => working.extend(values),
            ClauseKind::Exclude => {
                for value in values {
                    working.remove(&value);
                }
            }
        }
    }
    Ok(working)
}
