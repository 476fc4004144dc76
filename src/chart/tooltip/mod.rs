//! Shared HTML tooltips for hovered chart categories.
//!
//! The host calls back with a [TooltipContext] on every hover change. The
//! [TooltipFormatter] attached to the chart configuration decides which
//! variant renders the markup. Formatting is side-effect free apart from the
//! error log written when a formatter fails.

mod bar_line;
mod contract_progress;
mod shared_kpi;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Month;

use crate::chart::{
    budget_vs_forecast::BudgetVsForecastTooltip,
    classify::{Classification, SeriesRole, classify},
    config::{ChartConfiguration, Color, SeriesType},
};

pub use bar_line::BarLineTooltip;
pub use contract_progress::ContractProgressTooltip;

/// Returned instead of markup when a formatter fails.
pub const TOOLTIP_FALLBACK: &str = "Error creating tooltip.";

/// Colour used for a point whose series has no colour of its own.
const DEFAULT_SERIES_COLOR: &str = "#666666";

/// The hovered category and the points of every series at that category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TooltipContext {
    #[serde(default)]
    pub x: Option<CategoryLabel>,
    #[serde(default)]
    pub points: Vec<TooltipPoint>,
}

/// A category label or a timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CategoryLabel {
    Text(String),
    Timestamp(f64),
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryLabel::Text(text) => write!(f, "{text}"),
            CategoryLabel::Timestamp(timestamp) => write!(f, "{timestamp}"),
        }
    }
}

/// One hovered point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TooltipPoint {
    pub series: PointSeries,
    #[serde(default, alias = "value")]
    pub y: Option<f64>,
    /// The category index of the point.
    #[serde(default)]
    pub index: Option<usize>,
}

/// The series a hovered point belongs to, classified when it is received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PointSeriesOptions")]
pub struct PointSeries {
    classification: Classification,
    pub name: String,
    pub color: Option<Color>,
    pub kind: Option<SeriesType>,
}

#[derive(Deserialize)]
struct PointSeriesOptions {
    #[serde(default)]
    name: String,
    #[serde(default)]
    color: Option<Color>,
    #[serde(rename = "type", default)]
    kind: Option<SeriesType>,
}

impl From<PointSeriesOptions> for PointSeries {
    fn from(options: PointSeriesOptions) -> Self {
        Self {
            classification: classify(&options.name),
            name: options.name,
            color: options.color,
            kind: options.kind,
        }
    }
}

impl PointSeries {
    pub fn new(name: &str, color: Option<&str>, kind: Option<SeriesType>) -> Self {
        Self::from(PointSeriesOptions {
            name: name.to_owned(),
            color: color.map(Color::from),
            kind,
        })
    }

    pub fn role(&self) -> &SeriesRole {
        &self.classification.role
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    fn color_or_default(&self) -> &str {
        self.color
            .as_ref()
            .and_then(Color::as_css)
            .unwrap_or(DEFAULT_SERIES_COLOR)
    }
}

/// Errors raised while building tooltip markup.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TooltipError {
    /// The hovered points do not say which category they belong to.
    #[error("the hovered point has no category index")]
    MissingPointIndex,

    /// A series has fewer points than the hovered category index.
    #[error("series \"{series}\" has no point at index {index}")]
    PointOutOfRange {
        /// The series that was looked up.
        series: String,
        /// The hovered category index.
        index: usize,
    },

    /// The chart carries a formatter this crate does not provide.
    #[error("unsupported tooltip formatter {0}")]
    UnsupportedFormatter(String),
}

/// Which tooltip variant a chart uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TooltipFormatter {
    /// One row per point and a total when more than one point is hovered.
    SharedKpi,
    /// Sorted cost bars with a total and an enrollment line row.
    BarLine(BarLineTooltip),
    /// Cost columns with a total and a patient count row.
    ContractProgress(ContractProgressTooltip),
    /// Per-vendor contract progress computed from named series.
    BudgetVsForecast(BudgetVsForecastTooltip),
    /// A formatter set by the host, kept so the configuration round-trips.
    #[serde(untagged)]
    Host(serde_json::Value),
}

impl TooltipFormatter {
    /// Build the tooltip markup for `context`.
    ///
    /// `config` is the chart the tooltip belongs to, for variants that look up
    /// series by name at hover time.
    ///
    /// # Errors
    /// Returns a [TooltipError] if the context is inconsistent with the chart.
    pub fn format(
        &self,
        context: &TooltipContext,
        config: &ChartConfiguration,
    ) -> Result<String, TooltipError> {
        match self {
            TooltipFormatter::SharedKpi => Ok(shared_kpi::format(context)),
            TooltipFormatter::BarLine(tooltip) => Ok(tooltip.format(context)),
            TooltipFormatter::ContractProgress(tooltip) => Ok(tooltip.format(context)),
            TooltipFormatter::BudgetVsForecast(tooltip) => tooltip.format(context, config),
            TooltipFormatter::Host(formatter) => {
                Err(TooltipError::UnsupportedFormatter(formatter.to_string()))
            }
        }
    }
}

impl ChartConfiguration {
    /// Render the tooltip for a hover event using the attached formatter.
    ///
    /// Charts without a formatter use the shared KPI layout. A failing
    /// formatter is logged and replaced by [TOOLTIP_FALLBACK] so the host
    /// always has something to show.
    pub fn format_tooltip(&self, context: &TooltipContext) -> String {
        let formatter = self
            .tooltip
            .as_ref()
            .and_then(|tooltip| tooltip.formatter.as_ref())
            .unwrap_or(&TooltipFormatter::SharedKpi);

        match formatter.format(context, self) {
            Ok(markup) => markup,
            Err(error) => {
                tracing::error!("Error in tooltip formatter: {error}");
                TOOLTIP_FALLBACK.to_owned()
            }
        }
    }
}

/// The header text for a category, with `MM/YYYY` rewritten as `Mon YYYY`.
///
/// Anything that does not match `MM/YYYY` exactly is returned unchanged.
/// Month numbers outside 1-12 roll over into the neighbouring years.
pub(crate) fn format_header_date(label: &str) -> String {
    let bytes = label.as_bytes();
    let is_month_year = bytes.len() == 7
        && bytes[2] == b'/'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit);

    if !is_month_year {
        return label.to_owned();
    }

    let (Ok(month), Ok(year)) = (label[..2].parse::<i32>(), label[3..].parse::<i32>()) else {
        return label.to_owned();
    };

    let zero_based_month = month - 1;
    let year = year + zero_based_month.div_euclid(12);
    let month = (zero_based_month.rem_euclid(12) + 1) as u8;

    match Month::try_from(month) {
        Ok(month) => format!("{} {year}", month_abbreviation(month)),
        Err(_) => label.to_owned(),
    }
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// The header text of a context, or an empty string when there is no label.
pub(crate) fn header_label(context: &TooltipContext) -> String {
    context
        .x
        .as_ref()
        .map(|label| format_header_date(&label.to_string()))
        .unwrap_or_default()
}
