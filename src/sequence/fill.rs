//! Gap filling: materialize missing frames by copying existing ones.
//!
//! Policy carried over from the original tool: a missing frame is filled
//! from the nearest present frame strictly below it; only when nothing
//! exists below (the gap precedes the whole sequence) does the nearest
//! frame above serve as the source. Copies are additive and independent:
//! existing frame files are never touched, and re-running a fill over an
//! already-filled directory copies nothing.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;

use crate::foundation::core::FrameValue;
use crate::foundation::error::FramespanError;
use crate::sequence::pattern::SequencePattern;
use crate::sequence::reconcile::{ReconciliationResult, SequenceEntry};

/// One planned (or executed) copy.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FillAction {
    /// Existing file to duplicate.
    pub source_path: std::path::PathBuf,
    /// The missing frame being materialized.
    pub target_frame: FrameValue,
    /// Destination filename for the copy.
    pub target_path: std::path::PathBuf,
}

/// A missing frame that could not be filled, with the reason.
#[derive(Debug)]
pub struct FillFailure {
    /// The frame that stays missing.
    pub frame: FrameValue,
    /// Why it could not be filled.
    pub error: FramespanError,
}

/// Outcome of executing a fill.
#[derive(Debug, Default)]
pub struct FillReport {
    /// Copies performed.
    pub copied: Vec<FillAction>,
    /// Planned copies skipped because the target already existed.
    pub skipped: Vec<FillAction>,
    /// Per-frame failures; the batch continues past them.
    pub failed: Vec<FillFailure>,
    /// `true` when the cancellation check stopped the batch early.
    /// Completed copies stay on disk; re-running is safe.
    pub cancelled: bool,
}

/// Plan the copies for every missing frame. Pure; no I/O.
///
/// Only an entirely empty present set produces failures
/// ([`FramespanError::NoSourceFrame`], one per missing frame); they are
/// collected, not fatal.
pub fn plan(
    dir: &Path,
    pattern: &SequencePattern,
    reconciliation: &ReconciliationResult,
    entries: &BTreeMap<FrameValue, SequenceEntry>,
) -> (Vec<FillAction>, Vec<FillFailure>) {
    let mut actions = Vec::new();
    let mut failures = Vec::new();

    for frame in reconciliation.missing.iter() {
        let below = entries.range(..frame).next_back();
        let source = below.or_else(|| {
            entries
                .range((Bound::Excluded(frame), Bound::Unbounded))
                .next()
        });
        match source {
            Some((_, entry)) => actions.push(FillAction {
                source_path: entry.path.clone(),
                target_frame: frame,
                target_path: dir.join(pattern.file_name(frame)),
            }),
            None => failures.push(FillFailure {
                frame,
                error: FramespanError::NoSourceFrame(frame),
            }),
        }
    }

    (actions, failures)
}

/// Plan and execute a fill.
///
/// `cancel` is consulted once per file; returning `true` stops the batch
/// between copies. Copy errors are recorded per frame and the batch moves
/// on, so a failed frame is never silently dropped from the report.
pub fn fill<F: Fn() -> bool>(
    dir: &Path,
    pattern: &SequencePattern,
    reconciliation: &ReconciliationResult,
    entries: &BTreeMap<FrameValue, SequenceEntry>,
    cancel: F,
) -> FillReport {
    let (actions, failures) = plan(dir, pattern, reconciliation, entries);
    let mut report = FillReport {
        failed: failures,
        ..FillReport::default()
    };

    for action in actions {
        if cancel() {
            report.cancelled = true;
            break;
        }
        if action.target_path.exists() {
            report.skipped.push(action);
            continue;
        }
        match std::fs::copy(&action.source_path, &action.target_path) {
            Ok(_) => report.copied.push(action),
            Err(e) => report.failed.push(FillFailure {
                frame: action.target_frame,
                error: FramespanError::filesystem(&action.target_path, e),
            }),
        }
    }

    report
}
