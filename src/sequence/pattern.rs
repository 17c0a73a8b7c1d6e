//! Sequence filename templates and frame-number extraction.

use std::path::Path;

use regex::{Regex, RegexBuilder};

use crate::foundation::core::FrameValue;
use crate::foundation::error::{FramespanError, FramespanResult};

/// Default zero-padding width for integer frame numbers.
pub const DEFAULT_PAD: usize = 4;

/// A sequence filename template: `<prefix><digits>(.<digits>)?<suffix>`.
///
/// Built either from explicit parts or from a template filename using `#`
/// placeholders (`render_####.png`, the convention the host application
/// uses for output paths). Integer frames are zero-padded to the
/// placeholder width; subframes encode their fractional digits literally
/// after a second point (`render_0001.25.png`). Matching tolerates wider
/// numbers than the configured pad, so frame 10000 in a `####` sequence is
/// still recognized.
#[derive(Clone, Debug)]
pub struct SequencePattern {
    prefix: String,
    pad: usize,
    suffix: String,
    matcher: Regex,
}

impl SequencePattern {
    /// Build from explicit parts. `suffix` is everything after the number,
    /// extension included (`".png"`).
    pub fn new(prefix: &str, pad: usize, suffix: &str) -> FramespanResult<Self> {
        if pad == 0 {
            return Err(FramespanError::pattern(
                "numeric placeholder width must be at least 1",
            ));
        }
        let matcher = RegexBuilder::new(&format!(
            "^{}(-?\\d{{{pad},}})(?:\\.(\\d+))?{}$",
            regex::escape(prefix),
            regex::escape(suffix),
        ))
        .case_insensitive(true)
        .build()
        .map_err(|e| FramespanError::pattern(e.to_string()))?;
        Ok(Self {
            prefix: prefix.to_owned(),
            pad,
            suffix: suffix.to_owned(),
            matcher,
        })
    }

    /// Build from a template filename containing a run of `#` placeholders,
    /// for example `render_####.png` or a full path to it.
    pub fn from_template(template: impl AsRef<Path>) -> FramespanResult<Self> {
        let name = template
            .as_ref()
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FramespanError::pattern("template has no filename"))?;
        let Some(first) = name.find('#') else {
            return Err(FramespanError::pattern(format!(
                "'{name}' contains no '#' frame placeholder"
            )));
        };
        let run_len = name[first..].bytes().take_while(|b| *b == b'#').count();
        let rest = &name[first + run_len..];
        if rest.contains('#') {
            return Err(FramespanError::pattern(format!(
                "'{name}' has a split '#' placeholder run"
            )));
        }
        Self::new(&name[..first], run_len, rest)
    }

    /// Zero-padding width of the integer part.
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// The filename for `frame`.
    ///
    /// Only the digits are zero-padded; a negative frame keeps its sign in
    /// front of the padding (`frame_-0003.png`), so the name still matches
    /// the `-?` prefix of the scan pattern and reads back as the same frame.
    pub fn file_name(&self, frame: FrameValue) -> String {
        let sign = if frame < FrameValue::ZERO { "-" } else { "" };
        let whole = frame.trunc().unsigned_abs();
        match frame.fraction_text() {
            None => format!(
                "{}{sign}{:0pad$}{}",
                self.prefix,
                whole,
                self.suffix,
                pad = self.pad
            ),
            Some(frac) => format!(
                "{}{sign}{:0pad$}.{}{}",
                self.prefix,
                whole,
                frac,
                self.suffix,
                pad = self.pad
            ),
        }
    }

    /// Extract the frame number from a filename of this sequence, if it is
    /// one. Over-precise fractions (beyond the subframe precision cap) do
    /// not match.
    pub fn frame_of(&self, file_name: &str) -> Option<FrameValue> {
        let caps = self.matcher.captures(file_name)?;
        let int_text = caps.get(1)?.as_str();
        let value = match caps.get(2) {
            Some(frac) => FrameValue::parse_decimal(&format!("{int_text}.{}", frac.as_str())),
            None => FrameValue::parse_decimal(int_text),
        };
        value.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(s: &str) -> FrameValue {
        s.parse().unwrap()
    }

    #[test]
    fn template_round_trip() {
        let pat = SequencePattern::from_template("render_####.png").unwrap();
        assert_eq!(pat.file_name(fv("7")), "render_0007.png");
        assert_eq!(pat.file_name(fv("12345")), "render_12345.png");
        assert_eq!(pat.frame_of("render_0007.png"), Some(fv("7")));
        assert_eq!(pat.frame_of("render_12345.png"), Some(fv("12345")));
        assert_eq!(pat.frame_of("other_0007.png"), None);
        assert_eq!(pat.frame_of("render_0007.exr"), None);
    }

    #[test]
    fn subframe_names_encode_the_fraction_literally() {
        let pat = SequencePattern::from_template("frame_####.png").unwrap();
        assert_eq!(pat.file_name(fv("1.25")), "frame_0001.25.png");
        assert_eq!(pat.frame_of("frame_0001.25.png"), Some(fv("1.25")));
        assert_eq!(pat.frame_of("frame_0001.250.png"), Some(fv("1.25")));
    }

    #[test]
    fn negative_frames_round_trip() {
        let pat = SequencePattern::from_template("frame_####.png").unwrap();
        assert_eq!(pat.file_name(fv("-3")), "frame_-0003.png");
        assert_eq!(pat.frame_of("frame_-0003.png"), Some(fv("-3")));
        assert_eq!(pat.file_name(fv("-0.5")), "frame_-0000.5.png");
        assert_eq!(pat.frame_of("frame_-0000.5.png"), Some(fv("-0.5")));
        assert_eq!(pat.file_name(fv("-12.25")), "frame_-0012.25.png");
        assert_eq!(pat.frame_of(&pat.file_name(fv("-12.25"))), Some(fv("-12.25")));
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        let pat = SequencePattern::from_template("shot_###.EXR").unwrap();
        assert_eq!(pat.frame_of("shot_042.exr"), Some(fv("42")));
    }

    #[test]
    fn underpadded_names_do_not_match() {
        let pat = SequencePattern::from_template("render_####.png").unwrap();
        assert_eq!(pat.frame_of("render_7.png"), None);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(matches!(
            SequencePattern::from_template("render.png"),
            Err(FramespanError::Pattern(_))
        ));
        assert!(matches!(
            SequencePattern::from_template("a#b#.png"),
            Err(FramespanError::Pattern(_))
        ));
    }

    #[test]
    fn full_paths_are_accepted_as_templates() {
        let pat = SequencePattern::from_template("/tmp/out/render_##.png").unwrap();
        assert_eq!(pat.file_name(fv("3")), "render_03.png");
    }
}
