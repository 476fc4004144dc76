//! Stacked sums and dual-axis ranges computed from chart series.
//!
//! Bars stack positive values upwards and negative values downwards, so the
//! primary axis must span the largest positive stack and the deepest negative
//! stack of any category. When a count line shares the chart on a secondary
//! axis, both axes are scaled so their zero lines coincide.

use crate::chart::{
    classify::RoleKind,
    config::{Axis, Series},
};

/// The extent of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

/// Ranges for a primary and secondary axis whose zero lines line up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualAxisAlignment {
    pub primary: AxisRange,
    pub secondary: AxisRange,
}

/// Sums the positive and negative values of every category across `series`,
/// skipping series whose role is in `exclude_roles`.
///
/// # Returns
/// The most negative negative-sum (capped at 0) and the largest positive-sum
/// (floored at 0). Null and non-numeric points do not contribute.
pub fn compute_stacked_range<'a>(
    series: impl IntoIterator<Item = &'a Series>,
    exclude_roles: &[RoleKind],
) -> AxisRange {
    let mut positive_sums: Vec<f64> = Vec::new();
    let mut negative_sums: Vec<f64> = Vec::new();

    for series in series
        .into_iter()
        .filter(|series| !exclude_roles.contains(&series.role().kind()))
    {
        for (index, value) in series.values().enumerate() {
            if index >= positive_sums.len() {
                positive_sums.resize(index + 1, 0.0);
                negative_sums.resize(index + 1, 0.0);
            }

            match value {
                Some(value) if value > 0.0 => positive_sums[index] += value,
                Some(value) if value < 0.0 => negative_sums[index] += value,
                _ => {}
            }
        }
    }

    AxisRange {
        min: negative_sums.into_iter().fold(0.0, f64::min),
        max: positive_sums.into_iter().fold(0.0, f64::max),
    }
}

/// The range of the secondary (count) axis: from 0 to the largest count.
pub fn compute_secondary_axis_range<'a>(
    count_series: impl IntoIterator<Item = &'a Series>,
) -> AxisRange {
    let max = count_series
        .into_iter()
        .flat_map(Series::values)
        .flatten()
        .fold(0.0, f64::max);

    AxisRange { min: 0.0, max }
}

/// Scales the secondary axis so that zero sits at the same height on both axes.
///
/// Alignment only applies when the primary range crosses zero and the
/// secondary axis has a positive maximum. Otherwise `None` is returned and the
/// axes keep the host's defaults.
pub fn align_dual_axis(primary: AxisRange, secondary: AxisRange) -> Option<DualAxisAlignment> {
    if primary.min < 0.0 && primary.max > 0.0 && secondary.max > 0.0 {
        Some(DualAxisAlignment {
            primary,
            secondary: AxisRange {
                min: primary.min * (secondary.max / primary.max),
                max: secondary.max,
            },
        })
    } else {
        None
    }
}

impl DualAxisAlignment {
    /// Writes the aligned ranges into the first two axes and turns off tick
    /// snapping so the exact bounds are honoured.
    ///
    /// Does nothing if fewer than two axes are given.
    pub fn apply(&self, axes: &mut [Axis]) {
        let [primary, secondary, ..] = axes else {
            tracing::debug!("skipping dual-axis alignment: fewer than two value axes");
            return;
        };

        for (axis, range) in [(primary, self.primary), (secondary, self.secondary)] {
            axis.min = Some(range.min);
            axis.max = Some(range.max);
            axis.start_on_tick = Some(false);
            axis.end_on_tick = Some(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::chart::config::{DataPoint, Series};

    use super::*;

    fn series_with(name: &str, data: &[Option<f64>]) -> Series {
        let mut series = Series::new(name);
        series.options.data = data.iter().copied().map(DataPoint::Value).collect();
        series
    }

    #[test]
    fn stacks_positive_and_negative_values_separately() {
        let series = [
            series_with("Direct Fees", &[Some(100.0), Some(-50.0), Some(20.0)]),
            series_with("OCCs", &[Some(30.0), Some(-25.0), Some(-5.0)]),
        ];

        let range = compute_stacked_range(&series, &[]);

        assert_eq!(range, AxisRange { min: -75.0, max: 130.0 });
    }

    #[test]
    fn null_points_are_absent_not_zero() {
        let series = [
            series_with("Direct Fees", &[None, Some(-10.0)]),
            series_with("OCCs", &[None, None]),
        ];

        let range = compute_stacked_range(&series, &[]);

        assert_eq!(range, AxisRange { min: -10.0, max: 0.0 });
    }

    #[test]
    fn excluded_roles_do_not_contribute() {
        let series = [
            series_with("Direct Fees", &[Some(10.0)]),
            series_with("Patient count", &[Some(900.0)]),
        ];

        let range = compute_stacked_range(&series, &[RoleKind::CountLine]);

        assert_eq!(range, AxisRange { min: 0.0, max: 10.0 });
    }

    #[test]
    fn empty_input_gives_zero_range() {
        let no_series: [Series; 0] = [];

        let range = compute_stacked_range(&no_series, &[]);

        assert_eq!(range, AxisRange { min: 0.0, max: 0.0 });
    }

    #[test]
    fn secondary_range_starts_at_zero() {
        let series = [series_with("Patient count", &[Some(12.0), None, Some(40.0)])];

        assert_eq!(
            compute_secondary_axis_range(&series),
            AxisRange { min: 0.0, max: 40.0 }
        );
    }

    #[test]
    fn secondary_range_is_zero_for_negative_counts() {
        let series = [series_with("Patient count", &[Some(-3.0)])];

        assert_eq!(
            compute_secondary_axis_range(&series),
            AxisRange { min: 0.0, max: 0.0 }
        );
    }

    #[test]
    fn aligns_secondary_minimum_with_primary_zero() {
        let alignment = align_dual_axis(
            AxisRange {
                min: -400_000.0,
                max: 300_000.0,
            },
            AxisRange {
                min: 0.0,
                max: 150.0,
            },
        )
        .expect("ranges should be aligned");

        assert_relative_eq!(alignment.secondary.min, -200.0, epsilon = 1e-9);
        assert_relative_eq!(alignment.secondary.max, 150.0);
        assert_relative_eq!(
            alignment.secondary.min / alignment.secondary.max,
            alignment.primary.min / alignment.primary.max,
            epsilon = 1e-12
        );
    }

    #[test]
    fn no_alignment_without_negative_primary_minimum() {
        let alignment = align_dual_axis(
            AxisRange { min: 0.0, max: 10.0 },
            AxisRange { min: 0.0, max: 5.0 },
        );

        assert_eq!(alignment, None);
    }

    #[test]
    fn no_alignment_without_positive_secondary_maximum() {
        let alignment = align_dual_axis(
            AxisRange { min: -5.0, max: 10.0 },
            AxisRange { min: 0.0, max: 0.0 },
        );

        assert_eq!(alignment, None);
    }

    #[test]
    fn apply_sets_bounds_and_disables_tick_snapping() {
        let alignment = DualAxisAlignment {
            primary: AxisRange { min: -4.0, max: 3.0 },
            secondary: AxisRange { min: -2.0, max: 1.5 },
        };
        let mut axes = vec![Axis::default(), Axis::default()];

        alignment.apply(&mut axes);

        assert_eq!(axes[0].min, Some(-4.0));
        assert_eq!(axes[1].max, Some(1.5));
        assert!(
            axes.iter()
                .all(|axis| axis.start_on_tick == Some(false) && axis.end_on_tick == Some(false))
        );
    }

    #[test]
    fn apply_ignores_a_single_axis() {
        let alignment = DualAxisAlignment {
            primary: AxisRange { min: -4.0, max: 3.0 },
            secondary: AxisRange { min: -2.0, max: 1.5 },
        };
        let mut axes = vec![Axis::default()];

        alignment.apply(&mut axes);

        assert_eq!(axes[0], Axis::default());
    }

    fn column() -> impl Strategy<Value = Vec<Option<f64>>> {
        prop::collection::vec(prop::option::of(-1e6..1e6f64), 0..8)
    }

    proptest! {
        #[test]
        fn stacked_range_brackets_zero(columns in prop::collection::vec(column(), 0..6)) {
            let series: Vec<_> = columns
                .iter()
                .map(|data| series_with("Direct Fees", data))
                .collect();

            let range = compute_stacked_range(&series, &[]);

            prop_assert!(range.min <= 0.0);
            prop_assert!(range.max >= 0.0);
        }

        #[test]
        fn stacked_range_matches_extreme_category_sums(
            columns in prop::collection::vec(column(), 1..6)
        ) {
            let series: Vec<_> = columns
                .iter()
                .map(|data| series_with("Direct Fees", data))
                .collect();
            let categories = columns.iter().map(Vec::len).max().unwrap_or(0);

            let mut want_min = 0.0_f64;
            let mut want_max = 0.0_f64;
            for index in 0..categories {
                let values: Vec<f64> = columns
                    .iter()
                    .filter_map(|data| data.get(index).copied().flatten())
                    .collect();
                let positive: f64 = values.iter().filter(|value| **value > 0.0).sum();
                let negative: f64 = values.iter().filter(|value| **value < 0.0).sum();
                want_max = want_max.max(positive);
                want_min = want_min.min(negative);
            }

            let range = compute_stacked_range(&series, &[]);

            prop_assert!((range.min - want_min).abs() < 1e-6);
            prop_assert!((range.max - want_max).abs() < 1e-6);
        }
    }
}
