//! Threshold classification and the epoch union.

use bz_core::MeasureKind;
use bz_core::rules::{AREA_THRESHOLD_DIVISOR, POINT_COUNT_THRESHOLD};

/// Area rule: overlap reaches 10% of the zone's area (inclusive).
#[must_use]
pub fn area_flag(overlap: f64, zone_area: f64) -> bool {
    overlap >= zone_area / AREA_THRESHOLD_DIVISOR
}

/// Point rule: at least three contained points.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn count_flag(count: f64) -> bool {
    count >= POINT_COUNT_THRESHOLD as f64
}

/// Classify one zone against one layer; a missing measure is zero.
#[must_use]
pub fn classify(kind: MeasureKind, measure: Option<f64>, zone_area: f64) -> bool {
    let measure = measure.unwrap_or(0.0);
    match kind {
        MeasureKind::Area => area_flag(measure, zone_area),
        MeasureKind::PointCount => count_flag(measure),
    }
}

/// Epoch flag: logical OR of the layer flags.
#[must_use]
pub fn union(flags: impl IntoIterator<Item = bool>) -> bool {
    flags.into_iter().any(|flag| flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, 1000.0, true)]
    #[case(99.999, 1000.0, false)]
    #[case(110.0, 1000.0, true)]
    #[case(0.0, 1000.0, false)]
    #[case(43.725, 437.25, true)]
    #[case(0.3, 3.0, true)]
    #[case(0.07, 0.7, true)]
    #[case(0.299_999_999_999_99, 3.0, false)]
    #[case(1000.0, 1000.0, true)]
    fn area_rule_is_inclusive(#[case] overlap: f64, #[case] zone_area: f64, #[case] flag: bool) {
        assert_eq!(area_flag(overlap, zone_area), flag);
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(2.0, false)]
    #[case(3.0, true)]
    #[case(12.0, true)]
    fn count_rule(#[case] count: f64, #[case] flag: bool) {
        assert_eq!(count_flag(count), flag);
    }

    #[test]
    fn missing_measure_is_zero_filled() {
        assert!(!classify(MeasureKind::Area, None, 1000.0));
        assert!(!classify(MeasureKind::PointCount, None, 1000.0));
        assert!(classify(MeasureKind::Area, Some(100.0), 1000.0));
    }

    #[test]
    fn monotone_in_overlap() {
        let zone_area = 523.0;
        let mut flagged = false;
        for step in 0..=100 {
            let flag = area_flag(f64::from(step) * 5.23, zone_area);
            assert!(!flagged || flag, "flag dropped back to 0 at step {step}");
            flagged = flag;
        }
        assert!(flagged);
    }

    #[rstest]
    #[case(&[], false)]
    #[case(&[false, false, false], false)]
    #[case(&[false, true, false], true)]
    #[case(&[true, true], true)]
    fn union_is_or(#[case] flags: &[bool], #[case] expected: bool) {
        assert_eq!(union(flags.iter().copied()), expected);
    }
}
