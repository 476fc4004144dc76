//! Chart configuration transforms and tooltips for the embedded widgets.
//!
//! The embedding host hands each chart's configuration to
//! [ChartKind::transform] before drawing it and calls
//! [ChartConfiguration::format_tooltip] on every hover.

mod aggregation;
mod budget_vs_forecast;
mod classify;
mod config;
mod handlers;
mod tooltip;
mod transform;

pub use aggregation::{
    AxisRange, DualAxisAlignment, align_dual_axis, compute_secondary_axis_range,
    compute_stacked_range,
};
pub use budget_vs_forecast::{BudgetPalette, BudgetVsForecastTooltip};
pub use classify::{Classification, RoleKind, SeriesRole, SortTable, Variant, classify};
pub use config::{Axis, ChartConfiguration, Color, DataPoint, Series, SeriesOptions, SeriesType};
pub use handlers::{render_chart_endpoint, tooltip_endpoint};
pub use tooltip::{
    BarLineTooltip, CategoryLabel, ContractProgressTooltip, TOOLTIP_FALLBACK, TooltipContext,
    TooltipError, TooltipFormatter, TooltipPoint,
};
pub use transform::{ChartKind, ChartProfile, transform};
