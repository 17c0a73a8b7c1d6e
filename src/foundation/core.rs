use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{FramespanError, FramespanResult};

/// Upper bound on fractional digits a frame value may carry.
///
/// Subframe ladders are computed exactly at this precision or below; anything
/// finer is rejected at parse time instead of silently rounded.
pub const MAX_PRECISION: u8 = 5;

fn pow10(n: u8) -> i64 {
    10i64.pow(u32::from(n))
}

/// An exact frame number: an integer or a fixed-precision decimal (subframe).
///
/// Stored as a scaled integer `units * 10^-scale`, normalized so trailing
/// fractional zeros are stripped. Two values are equal iff their normalized
/// decimal representations are equal (`1.30 == 1.3`), and ordering is total
/// numeric ascending. No binary floating point is involved anywhere, so
/// stepped subframe ladders never accumulate drift.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct FrameValue {
    units: i64,
    scale: u8,
}

impl FrameValue {
    /// Frame zero.
    pub const ZERO: FrameValue = FrameValue { units: 0, scale: 0 };
    /// Frame one, the default range step.
    pub const ONE: FrameValue = FrameValue { units: 1, scale: 0 };

    /// Build from a whole frame number.
    pub fn from_int(value: i64) -> Self {
        Self {
            units: value,
            scale: 0,
        }
    }

    /// Build from scaled-integer parts, normalizing the representation.
    pub fn from_scaled(mut units: i64, mut scale: u8) -> Self {
        while scale > 0 && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }
        Self { units, scale }
    }

    /// Number of fractional digits in the normalized representation.
    pub fn precision(self) -> u8 {
        self.scale
    }

    /// Scaled-integer units at `scale` fractional digits, or `None` when
    /// the value does not fit at that scale.
    ///
    /// `scale` must be at least [`precision`](Self::precision); expansion
    /// always rescales to the most precise of the values involved.
    pub fn rescaled(self, scale: u8) -> Option<i64> {
        debug_assert!(scale >= self.scale);
        self.units.checked_mul(pow10(scale - self.scale))
    }

    /// `true` when the value has no fractional part.
    pub fn is_integer(self) -> bool {
        self.scale == 0
    }

    /// The value as a plain integer, if it is one.
    pub fn as_i64(self) -> Option<i64> {
        self.is_integer().then_some(self.units)
    }

    /// Largest integer `<=` this value.
    pub fn floor(self) -> i64 {
        self.units.div_euclid(pow10(self.scale))
    }

    /// Smallest integer `>=` this value.
    pub fn ceil(self) -> i64 {
        let p = pow10(self.scale);
        if self.units.rem_euclid(p) == 0 {
            self.units.div_euclid(p)
        } else {
            self.units.div_euclid(p) + 1
        }
    }

    /// Integer part truncated toward zero.
    pub fn trunc(self) -> i64 {
        self.units / pow10(self.scale)
    }

    /// Fractional digits as text (no leading point), if any.
    ///
    /// `1.25` yields `"25"`, `7` yields `None`. Used to build subframe
    /// filenames, which encode the fraction literally after a second `.`.
    pub fn fraction_text(self) -> Option<String> {
        if self.scale == 0 {
            return None;
        }
        let frac = self.units.unsigned_abs() % pow10(self.scale) as u64;
        Some(format!("{frac:0width$}", width = self.scale as usize))
    }

    pub(crate) fn parse_decimal(text: &str) -> Result<Self, String> {
        let t = text.trim();
        let (negative, rest) = match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t.strip_prefix('+').unwrap_or(t)),
        };
        let (int_text, frac_text) = match rest.split_once('.') {
            Some((a, b)) => (a, b),
            None => (rest, ""),
        };
        if int_text.is_empty() && frac_text.is_empty() {
            return Err(format!("'{text}' is not a frame number"));
        }
        if !int_text.bytes().all(|b| b.is_ascii_digit())
            || !frac_text.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!("'{text}' is not a frame number"));
        }
        if frac_text.len() > MAX_PRECISION as usize {
            return Err(format!(
                "'{text}' has more than {MAX_PRECISION} fractional digits"
            ));
        }
        let scale = frac_text.len() as u8;
        let int: i64 = if int_text.is_empty() {
            0
        } else {
            int_text
                .parse()
                .map_err(|_| format!("frame number '{text}' is out of range"))?
        };
        let frac: i64 = if frac_text.is_empty() {
            0
        } else {
            frac_text
                .parse()
                .map_err(|_| format!("frame number '{text}' is out of range"))?
        };
        let units = int
            .checked_mul(pow10(scale))
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(|| format!("frame number '{text}' is out of range"))?;
        let units = if negative { -units } else { units };
        Ok(Self::from_scaled(units, scale))
    }
}

impl FromStr for FrameValue {
    type Err = FramespanError;

    fn from_str(s: &str) -> FramespanResult<Self> {
        Self::parse_decimal(s).map_err(|reason| FramespanError::parse(reason, 0))
    }
}

impl Ord for FrameValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        let a = i128::from(self.units) * i128::from(pow10(scale - self.scale));
        let b = i128::from(other.units) * i128::from(pow10(scale - other.scale));
        a.cmp(&b)
    }
}

impl PartialOrd for FrameValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FrameValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let sign = if self.units < 0 { "-" } else { "" };
        let abs = self.units.unsigned_abs();
        let p = pow10(self.scale) as u64;
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / p,
            abs % p,
            width = self.scale as usize
        )
    }
}

impl serde::Serialize for FrameValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for FrameValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = FrameValue;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a frame number as a decimal string or integer")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<FrameValue, E> {
                FrameValue::parse_decimal(v).map_err(E::custom)
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<FrameValue, E> {
                Ok(FrameValue::from_int(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<FrameValue, E> {
                i64::try_from(v)
                    .map(FrameValue::from_int)
                    .map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// The resolved output of an expression: ordered, duplicate-free frames.
///
/// This is the contract surface handed to downstream consumers (argv
/// interpolation, display, reconciliation).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<FrameValue>", into = "Vec<FrameValue>")]
pub struct FrameSet {
    values: Vec<FrameValue>,
}

impl FrameSet {
    /// Build from arbitrary values, sorting ascending and deduplicating.
    pub fn from_values(mut values: Vec<FrameValue>) -> Self {
        values.sort();
        values.dedup();
        Self { values }
    }

    pub(crate) fn from_sorted(values: Vec<FrameValue>) -> Self {
        debug_assert!(values.is_sorted());
        Self { values }
    }

    /// The frames, ascending.
    pub fn values(&self) -> &[FrameValue] {
        &self.values
    }

    /// Iterate frames in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FrameValue> + '_ {
        self.values.iter().copied()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Membership test by binary search.
    pub fn contains(&self, frame: FrameValue) -> bool {
        self.values.binary_search(&frame).is_ok()
    }

    /// Lowest frame, if any.
    pub fn first(&self) -> Option<FrameValue> {
        self.values.first().copied()
    }

    /// Highest frame, if any.
    pub fn last(&self) -> Option<FrameValue> {
        self.values.last().copied()
    }

    /// Frames of `self` not present in `other`, ascending.
    pub fn difference(&self, other: &FrameSet) -> FrameSet {
        FrameSet::from_sorted(
            self.iter()
                .filter(|frame| !other.contains(*frame))
                .collect(),
        )
    }

    /// Render each frame as plain decimal text, ready for an argument list.
    pub fn to_arg_list(&self) -> Vec<String> {
        self.iter().map(|frame| frame.to_string()).collect()
    }

    /// Join the frames into one string with `sep`.
    pub fn join(&self, sep: &str) -> String {
        self.to_arg_list().join(sep)
    }

    /// Compress runs of consecutive whole frames back into range text:
    /// `[1,2,3,7,10,11]` becomes `"1-3, 7, 10-11"`. Subframes always render
    /// as singles.
    pub fn compact(&self) -> String {
        let mut parts = Vec::new();
        let mut i = 0;
        while i < self.values.len() {
            let mut j = i;
            while j + 1 < self.values.len() {
                match (self.values[j].as_i64(), self.values[j + 1].as_i64()) {
                    (Some(a), Some(b)) if b == a + 1 => j += 1,
                    _ => break,
                }
            }
            if j > i {
                parts.push(format!("{}-{}", self.values[i], self.values[j]));
            } else {
                parts.push(self.values[i].to_string());
            }
            i = j + 1;
        }
        parts.join(", ")
    }
}

impl From<Vec<FrameValue>> for FrameSet {
    fn from(values: Vec<FrameValue>) -> Self {
        Self::from_values(values)
    }
}

impl From<FrameSet> for Vec<FrameValue> {
    fn from(set: FrameSet) -> Self {
        set.values
    }
}

impl FromIterator<FrameValue> for FrameSet {
    fn from_iter<I: IntoIterator<Item = FrameValue>>(iter: I) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

/// The host scene's whole-frame range, a read-only input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneRange {
    /// First frame, inclusive.
    pub start: i64,
    /// Last frame, inclusive.
    pub end: i64,
    /// Frame step, at least 1.
    pub step: u32,
}

impl SceneRange {
    /// Create a validated range; reversed bounds are swapped, a zero step is
    /// rejected.
    pub fn new(start: i64, end: i64, step: u32) -> FramespanResult<Self> {
        if step == 0 {
            return Err(FramespanError::InvalidStep(FrameValue::ZERO));
        }
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Ok(Self { start, end, step })
    }

    /// Every frame of the range as a set.
    pub fn to_frame_set(self) -> FrameSet {
        FrameSet::from_sorted(
            (self.start..=self.end)
                .step_by(self.step as usize)
                .map(FrameValue::from_int)
                .collect(),
        )
    }

    /// The expression text the host would display for this range,
    /// `"1-250"` or `"1-250x2"`.
    pub fn to_expression(self) -> String {
        if self.step == 1 {
            format!("{}-{}", self.start, self.end)
        } else {
            format!("{}-{}x{}", self.start, self.end, self.step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(s: &str) -> FrameValue {
        s.parse().unwrap()
    }

    #[test]
    fn normalization_makes_equal_decimals_equal() {
        assert_eq!(fv("1.30"), fv("1.3"));
        assert_eq!(fv("2.0"), fv("2"));
        assert_ne!(fv("1.3"), fv("1.03"));
    }

    #[test]
    fn ordering_is_numeric() {
        let mut v = vec![fv("2"), fv("1.5"), fv("-3"), fv("1.45"), fv("10")];
        v.sort();
        let text: Vec<String> = v.iter().map(|f| f.to_string()).collect();
        assert_eq!(text, ["-3", "1.45", "1.5", "2", "10"]);
    }

    #[test]
    fn display_uses_minimum_digits() {
        assert_eq!(fv("1.250").to_string(), "1.25");
        assert_eq!(fv("7").to_string(), "7");
        assert_eq!(fv("-0.5").to_string(), "-0.5");
        assert_eq!(fv("3.05").to_string(), "3.05");
    }

    #[test]
    fn parse_rejects_junk_and_overprecision() {
        assert!(FrameValue::parse_decimal("abc").is_err());
        assert!(FrameValue::parse_decimal("").is_err());
        assert!(FrameValue::parse_decimal("1.2.3").is_err());
        assert!(FrameValue::parse_decimal("1.123456").is_err());
        assert!(FrameValue::parse_decimal("1.12345").is_ok());
        assert!(FrameValue::parse_decimal(".5").is_ok());
    }

    #[test]
    fn floor_ceil_handle_negatives() {
        assert_eq!(fv("1.25").floor(), 1);
        assert_eq!(fv("1.25").ceil(), 2);
        assert_eq!(fv("-1.25").floor(), -2);
        assert_eq!(fv("-1.25").ceil(), -1);
        assert_eq!(fv("4").floor(), 4);
        assert_eq!(fv("4").ceil(), 4);
    }

    #[test]
    fn fraction_text_keeps_leading_zeros() {
        assert_eq!(fv("1.05").fraction_text().as_deref(), Some("05"));
        assert_eq!(fv("1.5").fraction_text().as_deref(), Some("5"));
        assert_eq!(fv("1").fraction_text(), None);
    }

    #[test]
    fn frame_set_sorts_and_dedups() {
        let set = FrameSet::from_values(vec![fv("3"), fv("1"), fv("3.0"), fv("2")]);
        assert_eq!(set.to_arg_list(), ["1", "2", "3"]);
        assert!(set.contains(fv("2")));
        assert!(!set.contains(fv("2.5")));
    }

    #[test]
    fn compact_groups_consecutive_integers() {
        let set = FrameSet::from_values(
            ["1", "2", "3", "7", "10", "11", "12.5"]
                .iter()
                .map(|s| fv(s))
                .collect(),
        );
        assert_eq!(set.compact(), "1-3, 7, 10-11, 12.5");
    }

    #[test]
    fn scene_range_expands_and_prints() {
        let range = SceneRange::new(1, 5, 1).unwrap();
        assert_eq!(
            range.to_frame_set().to_arg_list(),
            ["1", "2", "3", "4", "5"]
        );
        assert_eq!(range.to_expression(), "1-5");
        assert_eq!(SceneRange::new(1, 10, 3).unwrap().to_expression(), "1-10x3");
        assert_eq!(
            SceneRange::new(1, 10, 3)
                .unwrap()
                .to_frame_set()
                .to_arg_list(),
            ["1", "4", "7", "10"]
        );
        assert!(SceneRange::new(1, 5, 0).is_err());
        assert_eq!(SceneRange::new(5, 1, 1).unwrap().start, 1);
    }

    #[test]
    fn serde_round_trips_exact_precision() {
        let json = serde_json::to_string(&fv("1.30")).unwrap();
        assert_eq!(json, "\"1.3\"");
        let back: FrameValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fv("1.3"));
        let from_int: FrameValue = serde_json::from_str("42").unwrap();
        assert_eq!(from_int, fv("42"));
    }
}
