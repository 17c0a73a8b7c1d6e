//! Image-sequence reconciliation: scan a directory for numbered frame
//! files, diff them against an expected frame set, and fill gaps by
//! copying the nearest existing frame.

pub mod fill;
pub mod pattern;
pub mod reconcile;
