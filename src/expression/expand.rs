//! Expansion of a single clause into its concrete frame values.

use crate::expression::parser::{Clause, ClauseBody};
use crate::foundation::core::FrameValue;
use crate::foundation::error::{FramespanError, FramespanResult};

/// Expand a clause into its ordered frame values.
///
/// Ranges are walked in scaled-integer space at the common precision of
/// start, end and step, so a ladder like `1-2x0.1` lands exactly on
/// `1.0, 1.1, …, 2.0` with no accumulated rounding. A zero or negative step
/// is rejected (it would never terminate); a degenerate range with
/// `start == end` yields the single value regardless of step.
pub fn expand(clause: &Clause) -> FramespanResult<Vec<FrameValue>> {
    match clause.body {
        ClauseBody::Single(value) => Ok(vec![value]),
        ClauseBody::Range { start, end, step } => {
            if step <= FrameValue::ZERO {
                return Err(FramespanError::InvalidStep(step));
            }
            if start == end {
                return Ok(vec![start]);
            }
            let precision = start
                .precision()
                .max(end.precision())
                .max(step.precision());
            let overflow = || FramespanError::RangeOverflow { start, end, step };
            let end_units = end.rescaled(precision).ok_or_else(overflow)?;
            let step_units = step.rescaled(precision).ok_or_else(overflow)?;
            let mut units = start.rescaled(precision).ok_or_else(overflow)?;
            let mut out = Vec::new();
            while units <= end_units {
                out.push(FrameValue::from_scaled(units, precision));
                // A step past i64::MAX is also past the end bound.
                match units.checked_add(step_units) {
                    Some(next) => units = next,
                    None => break,
                }
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse;

    fn expand_one(expr: &str) -> FramespanResult<Vec<FrameValue>> {
        let clauses = parse(expr).unwrap();
        assert_eq!(clauses.len(), 1);
        expand(&clauses[0])
    }

    fn text(values: &[FrameValue]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn whole_frame_range() {
        assert_eq!(
            text(&expand_one("1-5").unwrap()),
            ["1", "2", "3", "4", "5"]
        );
    }

    #[test]
    fn stepped_range_stops_at_end() {
        assert_eq!(text(&expand_one("1-10x2").unwrap()), ["1", "3", "5", "7", "9"]);
        assert_eq!(text(&expand_one("0-10x5").unwrap()), ["0", "5", "10"]);
    }

    #[test]
    fn subframe_ladder_is_exact() {
        let values = expand_one("1-2x0.1").unwrap();
        assert_eq!(values.len(), 11);
        assert_eq!(
            text(&values),
            ["1", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "1.8", "1.9", "2"]
        );
    }

    #[test]
    fn fractional_step_with_fractional_bounds() {
        assert_eq!(
            text(&expand_one("0.5-1.25x0.25").unwrap()),
            ["0.5", "0.75", "1", "1.25"]
        );
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(matches!(
            expand_one("1-10x0"),
            Err(FramespanError::InvalidStep(_))
        ));
        assert!(matches!(
            expand_one("1-10x-2"),
            Err(FramespanError::InvalidStep(_))
        ));
    }

    #[test]
    fn bounds_too_wide_for_the_step_precision_are_rejected() {
        // The fractional step forces a tenfold rescale of the end bound,
        // which no longer fits an i64.
        assert!(matches!(
            expand_one("0-9223372036854775807x0.5"),
            Err(FramespanError::RangeOverflow { .. })
        ));
    }

    #[test]
    fn range_ending_at_the_numeric_limit_terminates() {
        let values = expand_one("9223372036854775805-9223372036854775807x2").unwrap();
        assert_eq!(text(&values), ["9223372036854775805", "9223372036854775807"]);
    }

    #[test]
    fn degenerate_range_is_a_single_value() {
        assert_eq!(text(&expand_one("5-5x2").unwrap()), ["5"]);
        assert_eq!(text(&expand_one("5x2").unwrap()), ["5"]);
    }
}
