//! Semantic roles for chart series.
//!
//! The host names its series by convention: a trailing ` - A` or ` - F` marks
//! the actual or forecast variant of a cost category, and any name containing
//! "count" or "enrollment" is a patient count plotted as a line on the
//! secondary axis. [classify] turns those conventions into a [Classification]
//! once, when a series is constructed, so later stages match on the role
//! instead of re-parsing names.

use serde::{Deserialize, Serialize};

/// Suffix marking the actual-spend variant of a series.
pub const ACTUAL_MARKER: &str = " - A";
/// Suffix marking the forecast variant of a series.
pub const FORECAST_MARKER: &str = " - F";
/// Name of the thin bar series that marks the forecast on vendor charts.
pub const FORECAST_MARKER_SERIES: &str = "Forecast Marker";

/// What a series represents on a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesRole {
    /// A monetary cost category drawn as a (stacked) bar or column.
    CostBar {
        /// The category name without any actual/forecast marker.
        base_name: String,
    },
    /// A patient count or enrollment line on the secondary axis.
    CountLine,
    /// The per-category forecast marker bar.
    ForecastMarker,
    /// Helper series such as legend-only entries or hidden data carriers.
    Auxiliary,
}

/// The discriminant of [SeriesRole], used to include or exclude whole roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    CostBar,
    CountLine,
    ForecastMarker,
    Auxiliary,
}

impl SeriesRole {
    /// The role without its payload.
    pub fn kind(&self) -> RoleKind {
        match self {
            SeriesRole::CostBar { .. } => RoleKind::CostBar,
            SeriesRole::CountLine => RoleKind::CountLine,
            SeriesRole::ForecastMarker => RoleKind::ForecastMarker,
            SeriesRole::Auxiliary => RoleKind::Auxiliary,
        }
    }
}

/// Whether a series holds actual or forecast values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Actual,
    Forecast,
    None,
}

/// The result of classifying a series name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: SeriesRole,
    /// The series name with a trailing actual/forecast marker removed.
    pub base_name: String,
    pub variant: Variant,
}

impl Classification {
    /// A classification with an explicitly chosen role, for series this crate
    /// synthesises itself.
    pub fn with_role(name: &str, role: SeriesRole) -> Self {
        let (base_name, variant) = split_variant(name);

        Self {
            role,
            base_name: base_name.to_owned(),
            variant,
        }
    }
}

/// Classify a series by its name.
///
/// A name is a count line iff its lowercase form contains `count` or
/// `enrollment`. The forecast marker series is recognised by its exact base
/// name. Everything else is a cost bar keyed by its base name.
pub fn classify(name: &str) -> Classification {
    let (base_name, variant) = split_variant(name);
    let lowercase = name.to_lowercase();

    let role = if lowercase.contains("count") || lowercase.contains("enrollment") {
        SeriesRole::CountLine
    } else if base_name == FORECAST_MARKER_SERIES {
        SeriesRole::ForecastMarker
    } else {
        SeriesRole::CostBar {
            base_name: base_name.to_owned(),
        }
    };

    Classification {
        role,
        base_name: base_name.to_owned(),
        variant,
    }
}

fn split_variant(name: &str) -> (&str, Variant) {
    if let Some(base_name) = name.strip_suffix(ACTUAL_MARKER) {
        (base_name, Variant::Actual)
    } else if let Some(base_name) = name.strip_suffix(FORECAST_MARKER) {
        (base_name, Variant::Forecast)
    } else {
        (name, Variant::None)
    }
}

/// A fixed display order for series names.
///
/// Names not in the table rank after every listed name. Sorting is stable, so
/// unlisted names keep their input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortTable(Vec<String>);

impl SortTable {
    pub fn new(names: &[&str]) -> Self {
        Self(names.iter().map(|name| (*name).to_owned()).collect())
    }

    /// The position of `name` in the table, or the table length when absent.
    pub fn rank(&self, name: &str) -> usize {
        self.0
            .iter()
            .position(|entry| entry == name)
            .unwrap_or(self.0.len())
    }

    /// Stable sort of `items` by the rank of the name `key` extracts.
    pub fn sort_by_rank<T>(&self, items: &mut [T], key: impl Fn(&T) -> &str) {
        items.sort_by_key(|item| self.rank(key(item)));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_actual_and_forecast_markers() {
        let actual = classify("Direct fees - A");
        assert_eq!(actual.base_name, "Direct fees");
        assert_eq!(actual.variant, Variant::Actual);
        assert_eq!(
            actual.role,
            SeriesRole::CostBar {
                base_name: "Direct fees".to_owned()
            }
        );

        let forecast = classify("OCC - F");
        assert_eq!(forecast.base_name, "OCC");
        assert_eq!(forecast.variant, Variant::Forecast);
    }

    #[test]
    fn marker_must_be_trailing() {
        let classification = classify("Direct fees - A (adjusted)");

        assert_eq!(classification.base_name, "Direct fees - A (adjusted)");
        assert_eq!(classification.variant, Variant::None);
    }

    #[test]
    fn count_and_enrollment_names_are_count_lines() {
        for name in ["Patient count", "Enrollment", "ENROLLMENT - F", "site Count"] {
            assert_eq!(classify(name).role, SeriesRole::CountLine, "{name}");
        }
    }

    #[test]
    fn recognises_forecast_marker() {
        assert_eq!(
            classify(FORECAST_MARKER_SERIES).role,
            SeriesRole::ForecastMarker
        );
    }

    #[test]
    fn explicit_role_keeps_variant() {
        let classification = Classification::with_role("Contracted - F", SeriesRole::Auxiliary);

        assert_eq!(classification.role, SeriesRole::Auxiliary);
        assert_eq!(classification.base_name, "Contracted");
        assert_eq!(classification.variant, Variant::Forecast);
    }

    #[test]
    fn unlisted_names_rank_last() {
        let table = SortTable::new(&["Direct Fees", "Pass-throughs"]);

        assert_eq!(table.rank("Direct Fees"), 0);
        assert_eq!(table.rank("Pass-throughs"), 1);
        assert_eq!(table.rank("Unknown"), 2);
    }

    #[test]
    fn sorts_stably_by_table() {
        let table = SortTable::new(&["Direct Fees", "Pass-throughs", "Investigator fees", "OCCs"]);
        let mut names = vec!["OCCs", "Direct Fees", "Unknown"];

        table.sort_by_rank(&mut names, |name| *name);

        assert_eq!(names, vec!["Direct Fees", "OCCs", "Unknown"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let table = SortTable::new(&["Direct Fees"]);
        let mut names = vec!["Zeta", "Direct Fees", "Alpha", "Mu"];

        table.sort_by_rank(&mut names, |name| *name);

        assert_eq!(names, vec!["Direct Fees", "Zeta", "Alpha", "Mu"]);
    }
}
