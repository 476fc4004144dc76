//! Render-time transforms, one per chart kind.
//!
//! Every chart except budget vs forecast goes through the same pipeline and
//! differs only in its [ChartProfile]: the per-chart legend order, column
//! styling, axis floors and tooltip. A transform takes the host's
//! configuration by value and returns the configuration to render.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chart::{
    aggregation::{align_dual_axis, compute_secondary_axis_range, compute_stacked_range},
    budget_vs_forecast::{self, BudgetPalette},
    classify::{RoleKind, SortTable},
    config::{
        Axis, ChartConfiguration, ChartOptions, PlotLine, PlotLineLabel, PlotOptions,
        SeriesPlotOptions, SeriesType, TextStyle, Tooltip,
    },
    tooltip::{BarLineTooltip, ContractProgressTooltip, TooltipFormatter},
};

/// Cost categories of the LTD spend chart, in display order.
const LTD_SPEND_CATEGORIES: [&str; 4] = ["Direct Fees", "Pass-throughs", "Investigator fees", "OCCs"];
/// Cost categories of the actual vs forecast chart, in display order.
const ACTUAL_FORECAST_CATEGORIES: [&str; 4] = ["Direct fees", "Pass-throughs", "Investigator", "OCC"];

const TOTAL_BUDGET_SERIES: &str = "Total budget";

/// The charts on the dashboard that are transformed before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    /// Stacked LTD spend columns with a patient count line.
    LtdSpend,
    /// Actual and forecast spend columns with an enrollment line.
    ActualVsForecast,
    /// Cumulative spend against the total budget.
    CumulativeSpend,
    /// Budget vs forecast per cost category.
    BudgetByCategory,
    /// Reconciled vs remaining budget per vendor.
    VendorProgress,
    /// Spend per quarter.
    QuarterlyExpenses,
    /// Contract progress per vendor.
    BudgetVsForecast,
}

impl ChartKind {
    /// Transform the host's configuration for this kind of chart.
    pub fn transform(self, config: ChartConfiguration) -> ChartConfiguration {
        tracing::debug!("transforming {self:?} chart with {} series", config.series.len());

        match self {
            ChartKind::BudgetVsForecast => {
                budget_vs_forecast::transform(config, &BudgetPalette::default())
            }
            kind => transform(config, &kind.profile()),
        }
    }

    /// The constants that drive the shared transform pipeline for this chart.
    ///
    /// Budget vs forecast builds its own series, so its profile only names its
    /// tooltip.
    pub fn profile(self) -> ChartProfile {
        match self {
            ChartKind::LtdSpend => ChartProfile {
                legend_order: Some(SortTable::new(&[
                    "Patient count",
                    "Direct Fees",
                    "Pass-throughs",
                    "Investigator fees",
                    "OCCs",
                ])),
                column_style: Some(column_style()),
                axis_floors: Some(AxisFloors::default()),
                count_line: Some(CountLineStyle {
                    kind: None,
                    z_index: 5,
                }),
                align_dual_axis: true,
                tooltip: TooltipFormatter::ContractProgress(ContractProgressTooltip::new(
                    SortTable::new(&LTD_SPEND_CATEGORIES),
                )),
                tooltip_style: Some(TooltipStyle {
                    border_color: "#C0C0C0".to_owned(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ChartKind::ActualVsForecast => ChartProfile {
                legend_order: Some(SortTable::new(&[
                    "Enrollment",
                    "Direct fees - A",
                    "Pass-throughs - A",
                    "Investigator - A",
                    "OCC - A",
                    "Direct fees - F",
                    "Pass-throughs - F",
                    "Investigator - F",
                    "OCC - F",
                ])),
                column_style: Some(column_style()),
                axis_floors: Some(AxisFloors::default()),
                count_line: Some(CountLineStyle {
                    kind: Some(SeriesType::Line),
                    z_index: 5,
                }),
                align_dual_axis: true,
                tooltip: TooltipFormatter::BarLine(BarLineTooltip::new(
                    SortTable::new(&LTD_SPEND_CATEGORIES),
                    SortTable::new(&ACTUAL_FORECAST_CATEGORIES),
                )),
                ..Default::default()
            },
            ChartKind::CumulativeSpend => ChartProfile {
                budget_line: Some(BudgetLine::default()),
                ..Default::default()
            },
            ChartKind::VendorProgress => ChartProfile {
                legend_order: Some(SortTable::new(&["LTD reconciled", "Remaining Budget"])),
                ..Default::default()
            },
            ChartKind::BudgetByCategory | ChartKind::QuarterlyExpenses => ChartProfile::default(),
            ChartKind::BudgetVsForecast => ChartProfile {
                tooltip: TooltipFormatter::BudgetVsForecast(Default::default()),
                ..Default::default()
            },
        }
    }
}

/// Per-chart constants for [transform].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartProfile {
    /// Legend order by full series name. Unlisted series go last.
    pub legend_order: Option<SortTable>,
    /// Column plot options merged over the host's and turns on tick alignment.
    pub column_style: Option<SeriesPlotOptions>,
    /// Minimums forced on the value axes when the chart has two of them.
    pub axis_floors: Option<AxisFloors>,
    /// Overrides for count and enrollment line series.
    pub count_line: Option<CountLineStyle>,
    /// Line the zero of the count axis up with the zero of the cost axis.
    pub align_dual_axis: bool,
    /// Annotate the first value of a budget series as a plot line.
    pub budget_line: Option<BudgetLine>,
    pub tooltip: TooltipFormatter,
    pub tooltip_style: Option<TooltipStyle>,
}

impl Default for ChartProfile {
    fn default() -> Self {
        Self {
            legend_order: None,
            column_style: None,
            axis_floors: None,
            count_line: None,
            align_dual_axis: false,
            budget_line: None,
            tooltip: TooltipFormatter::SharedKpi,
            tooltip_style: None,
        }
    }
}

/// Minimums for the primary (cost) and secondary (count) value axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisFloors {
    pub primary: f64,
    pub secondary: f64,
}

impl Default for AxisFloors {
    fn default() -> Self {
        Self {
            primary: -400_000.0,
            secondary: -1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountLineStyle {
    /// Draw the series as this type, or keep the host's type.
    pub kind: Option<SeriesType>,
    pub z_index: i32,
}

/// The plot line drawn at the total budget.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetLine {
    /// The series whose first numeric value is the budget.
    pub series_name: String,
    pub label: String,
    pub color: String,
    pub label_color: String,
}

impl Default for BudgetLine {
    fn default() -> Self {
        Self {
            series_name: TOTAL_BUDGET_SERIES.to_owned(),
            label: TOTAL_BUDGET_SERIES.to_owned(),
            color: "#F39C12".to_owned(),
            label_color: "#A9A9A9".to_owned(),
        }
    }
}

/// Tooltip box styling applied on top of the host's tooltip options.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipStyle {
    pub background_color: String,
    pub border_width: f64,
    pub border_color: String,
    pub shadow: bool,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            background_color: "rgba(255, 255, 255, 1)".to_owned(),
            border_width: 1.0,
            border_color: "#E0E0E0".to_owned(),
            shadow: true,
        }
    }
}

fn column_style() -> SeriesPlotOptions {
    SeriesPlotOptions {
        border_radius: Some(json!(1.0)),
        crisp: Some(false),
        group_padding: Some(0.4),
        ..Default::default()
    }
}

/// Apply `profile` to `config`.
///
/// Series are never dropped: they may be retyped, reordered in the legend or
/// drawn above other series. Axis bounds are only written when the chart has
/// both a cost and a count axis.
pub fn transform(mut config: ChartConfiguration, profile: &ChartProfile) -> ChartConfiguration {
    style_series(&mut config, profile);

    if let Some(column_style) = &profile.column_style {
        let chart = config.chart.get_or_insert_with(ChartOptions::default);
        chart.align_ticks = Some(true);

        let plot_options = config.plot_options.get_or_insert_with(PlotOptions::default);
        plot_options
            .column
            .get_or_insert_with(SeriesPlotOptions::default)
            .merge(column_style);
    }

    if config.y_axis.len() >= 2 {
        if let Some(floors) = profile.axis_floors {
            config.y_axis[0].min = Some(floors.primary);
            config.y_axis[1].min = Some(floors.secondary);
        }

        if profile.align_dual_axis {
            align_axes(&mut config);
        }
    }

    if let Some(budget_line) = &profile.budget_line {
        add_budget_line(&mut config, budget_line);
    }

    attach_tooltip(&mut config, profile);

    config
}

fn style_series(config: &mut ChartConfiguration, profile: &ChartProfile) {
    for series in &mut config.series {
        if let Some(legend_order) = &profile.legend_order {
            series.options.legend_index = Some(legend_order.rank(series.name()));
        }

        if let Some(count_line) = &profile.count_line
            && series.role().kind() == RoleKind::CountLine
        {
            if let Some(kind) = &count_line.kind {
                series.options.kind = Some(kind.clone());
            }
            series.options.z_index = Some(count_line.z_index);
        }
    }
}

fn align_axes(config: &mut ChartConfiguration) {
    let primary = compute_stacked_range(&config.series, &[RoleKind::CountLine]);
    let secondary = compute_secondary_axis_range(
        config
            .series
            .iter()
            .filter(|series| series.role().kind() == RoleKind::CountLine),
    );

    match align_dual_axis(primary, secondary) {
        Some(alignment) => {
            tracing::debug!("aligning dual axes: {alignment:?}");
            alignment.apply(&mut config.y_axis);
        }
        None => tracing::debug!(
            "keeping default axis ranges for primary {primary:?} and secondary {secondary:?}"
        ),
    }
}

fn add_budget_line(config: &mut ChartConfiguration, budget_line: &BudgetLine) {
    let Some(budget) = config
        .find_series(&budget_line.series_name)
        .and_then(|series| series.values().flatten().next())
    else {
        tracing::debug!("no \"{}\" value to draw", budget_line.series_name);
        return;
    };

    if config.y_axis.is_empty() {
        config.y_axis.push(Axis::default());
    }

    config.y_axis[0].plot_lines.push(PlotLine {
        color: Some(budget_line.color.as_str().into()),
        width: Some(2.0),
        value: Some(budget),
        z_index: Some(5),
        label: Some(PlotLineLabel {
            text: Some(budget_line.label.clone()),
            align: Some("left".to_owned()),
            x: Some(10.0),
            style: Some(TextStyle {
                color: Some(budget_line.label_color.as_str().into()),
                font_weight: Some(json!("bold")),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    });
}

fn attach_tooltip(config: &mut ChartConfiguration, profile: &ChartProfile) {
    let tooltip = config.tooltip.get_or_insert_with(Tooltip::default);
    tooltip.shared = Some(true);
    tooltip.use_html = Some(true);
    tooltip.formatter = Some(profile.tooltip.clone());

    if let Some(style) = &profile.tooltip_style {
        tooltip.background_color = Some(style.background_color.as_str().into());
        tooltip.border_width = Some(style.border_width);
        tooltip.border_color = Some(style.border_color.as_str().into());
        tooltip.shadow = Some(Value::Bool(style.shadow));
    }
}
