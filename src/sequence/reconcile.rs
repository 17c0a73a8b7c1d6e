//! Directory scanning and expected-vs-present reconciliation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::core::{FrameSet, FrameValue, SceneRange};
use crate::foundation::error::{FramespanError, FramespanResult};
use crate::sequence::pattern::SequencePattern;

/// One frame file found on disk.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SequenceEntry {
    /// The frame number parsed from the filename.
    pub frame: FrameValue,
    /// Full path of the file.
    pub path: PathBuf,
}

/// The frames the caller expects to exist: a resolved expression or the
/// host scene's range.
#[derive(Clone, Debug)]
pub enum Expected {
    /// An explicit, already-resolved frame set.
    Set(FrameSet),
    /// The host scene's whole-frame range.
    Scene(SceneRange),
}

impl Expected {
    fn into_frame_set(self) -> FrameSet {
        match self {
            Expected::Set(set) => set,
            Expected::Scene(range) => range.to_frame_set(),
        }
    }
}

impl From<FrameSet> for Expected {
    fn from(set: FrameSet) -> Self {
        Expected::Set(set)
    }
}

impl From<SceneRange> for Expected {
    fn from(range: SceneRange) -> Self {
        Expected::Scene(range)
    }
}

/// Outcome of comparing an expected frame set against files on disk.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReconciliationResult {
    /// The set the comparison ran against.
    pub expected: FrameSet,
    /// Frames that exist on disk: the full scan, not restricted to the
    /// expected set.
    pub present: FrameSet,
    /// Expected frames with no file, ascending.
    pub missing: FrameSet,
}

/// Scan `dir` (non-recursively) for files of the sequence described by
/// `pattern`.
///
/// An unreadable directory is a [`FramespanError::Filesystem`]; an empty
/// one simply yields no entries. Directories may change between calls, so
/// nothing is cached. If several filenames map to the same frame value
/// (`frame_01.5.png` vs `frame_0001.5.png`), the lexically last one wins
/// and a warning is logged.
#[tracing::instrument(skip(pattern))]
pub fn scan(
    dir: &Path,
    pattern: &SequencePattern,
) -> FramespanResult<BTreeMap<FrameValue, SequenceEntry>> {
    let read = std::fs::read_dir(dir).map_err(|e| FramespanError::filesystem(dir, e))?;

    let mut names = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| FramespanError::filesystem(dir, e))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    // Lexical order makes the collision policy deterministic: last wins.
    names.sort();

    let mut entries = BTreeMap::new();
    for name in names {
        let Some(frame) = pattern.frame_of(&name) else {
            continue;
        };
        let entry = SequenceEntry {
            frame,
            path: dir.join(&name),
        };
        if let Some(previous) = entries.insert(frame, entry) {
            tracing::warn!(
                frame = %frame,
                kept = %dir.join(&name).display(),
                dropped = %previous.path.display(),
                "several files map to the same frame number"
            );
        }
    }
    Ok(entries)
}

/// Diff already-scanned entries against an expected set. Pure; no I/O.
pub fn reconcile_entries(
    entries: &BTreeMap<FrameValue, SequenceEntry>,
    expected: impl Into<Expected>,
) -> ReconciliationResult {
    let expected = expected.into().into_frame_set();
    let present: FrameSet = entries.keys().copied().collect();
    let missing = expected.difference(&present);
    ReconciliationResult {
        expected,
        present,
        missing,
    }
}

/// Scan `dir` and reconcile in one step.
pub fn reconcile(
    dir: &Path,
    pattern: &SequencePattern,
    expected: impl Into<Expected>,
) -> FramespanResult<ReconciliationResult> {
    let entries = scan(dir, pattern)?;
    Ok(reconcile_entries(&entries, expected))
}

/// Reconcile against the span of the frames actually present: expected is
/// every whole frame from the lowest to the highest found, so `missing`
/// holds exactly the interior gaps of the sequence. With fewer than two
/// entries there is no span and nothing is missing.
pub fn reconcile_interior(
    entries: &BTreeMap<FrameValue, SequenceEntry>,
) -> ReconciliationResult {
    let expected = match (entries.keys().next(), entries.keys().next_back()) {
        (Some(first), Some(last)) if first != last => (first.ceil()..=last.floor())
            .map(FrameValue::from_int)
            .collect(),
        _ => FrameSet::default(),
    };
    reconcile_entries(entries, expected)
}

/// The interior gaps of an already-scanned sequence, ascending.
pub fn interior_gaps(entries: &BTreeMap<FrameValue, SequenceEntry>) -> FrameSet {
    reconcile_interior(entries).missing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(s: &str) -> FrameValue {
        s.parse().unwrap()
    }

    fn entries_for(frames: &[&str]) -> BTreeMap<FrameValue, SequenceEntry> {
        frames
            .iter()
            .map(|f| {
                let frame = fv(f);
                (
                    frame,
                    SequenceEntry {
                        frame,
                        path: PathBuf::from(format!("/seq/frame_{f}.png")),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn missing_is_expected_minus_present() {
        let entries = entries_for(&["1", "2", "4", "5"]);
        let result = reconcile_entries(&entries, SceneRange::new(1, 5, 1).unwrap());
        assert_eq!(result.missing.to_arg_list(), ["3"]);
        assert_eq!(result.present.len(), 4);
    }

    #[test]
    fn empty_directory_misses_everything() {
        let entries = BTreeMap::new();
        let result = reconcile_entries(&entries, SceneRange::new(1, 3, 1).unwrap());
        assert!(result.present.is_empty());
        assert_eq!(result.missing.to_arg_list(), ["1", "2", "3"]);
    }

    #[test]
    fn expected_can_be_a_resolved_set() {
        let entries = entries_for(&["1", "1.5", "2"]);
        let expected: FrameSet = ["1", "1.5", "2", "2.5"].iter().map(|s| fv(s)).collect();
        let result = reconcile_entries(&entries, expected);
        assert_eq!(result.missing.to_arg_list(), ["2.5"]);
    }

    #[test]
    fn interior_gaps_span_the_present_frames() {
        let entries = entries_for(&["2", "3", "7", "9"]);
        assert_eq!(interior_gaps(&entries).to_arg_list(), ["4", "5", "6", "8"]);
        assert!(interior_gaps(&entries_for(&["5"])).is_empty());
        assert!(interior_gaps(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn scan_reports_unreadable_directory() {
        let pattern = SequencePattern::from_template("frame_####.png").unwrap();
        let err = scan(Path::new("/nonexistent/framespan-test"), &pattern).unwrap_err();
        assert!(matches!(err, FramespanError::Filesystem { .. }));
    }
}
