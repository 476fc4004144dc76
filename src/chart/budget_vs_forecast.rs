//! Per-vendor contract progress drawn as overlapping horizontal bars.
//!
//! The host supplies three series per vendor: `LTD reconciled`, `Remaining
//! budget` and `Forecasted`. The transform replaces them with the bars the
//! chart actually draws: a translucent contracted bar (LTD + remaining), a
//! narrower LTD expense bar on top of it and a thin forecast marker coloured
//! by whether the forecast exceeds the contract. The tooltip reads the
//! transformed series back by name at hover time.

use maud::html;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    chart::{
        classify::{FORECAST_MARKER_SERIES, SeriesRole},
        config::{
            Axis, AxisLabels, AxisTitle, AxisType, ChartConfiguration, ChartOptions, DataPoint,
            LabelFormatter, Legend, LegendSymbol, PlotOptions, PointRecord, Series,
            SeriesPlotOptions, SeriesType, Tooltip,
        },
        tooltip::{TooltipContext, TooltipError, TooltipFormatter},
    },
    html::{format_count, format_currency_rounded},
};

/// Input series holding recognised spend per vendor.
pub const LTD_RECONCILED_SERIES: &str = "LTD reconciled";
/// Input series holding the budget still to be spent per vendor.
pub const REMAINING_BUDGET_SERIES: &str = "Remaining budget";
/// Input and output series holding the forecast spend per vendor.
pub const FORECASTED_SERIES: &str = "Forecasted";
/// Output series holding LTD expense per vendor.
pub const LTD_EXPENSE_SERIES: &str = "LTD Expense";
/// Output series holding the contracted value per vendor.
pub const CONTRACTED_DATA_SERIES: &str = "Contracted_data";

const UNDER_CONTRACT_SERIES: &str = "Under contract";
const OVER_CONTRACT_SERIES: &str = "Over contract";
const CONTRACTED_LEGEND_SERIES: &str = "Contracted";

/// Shown instead of the tooltip when a series it reads is not on the chart.
pub const MISSING_SERIES_MESSAGE: &str = "A required data series is missing.";

const ROW_LABEL_STYLE: &str = "padding: 6px 2px; font-weight: 400;";
const ROW_VALUE_STYLE: &str = "text-align: right; padding: 6px 2px; font-weight: 700;";
const SWATCH_STYLE: &str = "width: 12px; height: 12px; border-radius: 2px; display: inline-block; margin-right: 8px; vertical-align: middle;";
const SPACER_STYLE: &str = "width: 10px; display: inline-block; margin-right: 8px; margin-left: 4px;";

/// The colours used by the budget vs forecast chart and its tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPalette {
    pub ltd_expense: String,
    pub contracted: String,
    pub contracted_legend: String,
    pub over_contract: String,
    pub under_contract: String,
}

impl Default for BudgetPalette {
    fn default() -> Self {
        Self {
            ltd_expense: "rgb(29, 188, 168)".to_owned(),
            contracted: "rgba(29, 188, 168, 0.3)".to_owned(),
            contracted_legend: "rgb(160, 219, 211)".to_owned(),
            over_contract: "#D32F2F".to_owned(),
            under_contract: "#4CAF50".to_owned(),
        }
    }
}

impl BudgetPalette {
    /// Red when the forecast meets or exceeds the contract, green otherwise.
    fn over_under_color(&self, over_under: f64) -> &str {
        if over_under >= 0.0 {
            &self.over_contract
        } else {
            &self.under_contract
        }
    }
}

/// Replace the host's vendor series with the contract progress bars.
///
/// Missing input series contribute zeros. The category axis is kept, and
/// every other chart option this chart depends on is overwritten.
pub fn transform(mut config: ChartConfiguration, palette: &BudgetPalette) -> ChartConfiguration {
    let categories = config
        .x_axis
        .first()
        .map(|axis| axis.categories.clone())
        .unwrap_or_default();

    let ltd_expense = values_or_zero(&config, LTD_RECONCILED_SERIES);
    let remaining_budget = values_or_zero(&config, REMAINING_BUDGET_SERIES);
    let forecasted = values_or_zero(&config, FORECASTED_SERIES);
    let contracted: Vec<f64> = ltd_expense
        .iter()
        .enumerate()
        .map(|(index, ltd)| ltd + remaining_budget.get(index).copied().unwrap_or(0.0))
        .collect();

    tracing::debug!(
        "building budget vs forecast bars for {} categories",
        categories.len()
    );

    let forecast_marker_data = forecasted
        .iter()
        .enumerate()
        .map(|(index, forecast)| {
            // A vendor with no contracted value gets the under-contract colour.
            let color = match contracted.get(index) {
                Some(contracted) => palette.over_under_color(forecast - contracted),
                None => palette.under_contract.as_str(),
            };

            DataPoint::Record(PointRecord {
                y: Some(*forecast),
                color: Some(color.into()),
                ..Default::default()
            })
        })
        .collect();

    let mut forecast = bar(FORECASTED_SERIES, SeriesRole::Auxiliary);
    forecast.options.data = to_points(&forecasted);
    forecast.options.visible = Some(false);
    forecast.options.show_in_legend = Some(false);

    let under_contract = legend_entry(
        UNDER_CONTRACT_SERIES,
        &palette.under_contract,
        LegendSymbol::Line,
    );
    let over_contract = legend_entry(
        OVER_CONTRACT_SERIES,
        &palette.over_contract,
        LegendSymbol::Line,
    );
    let contracted_legend = legend_entry(
        CONTRACTED_LEGEND_SERIES,
        &palette.contracted_legend,
        LegendSymbol::Square,
    );

    let mut contracted_data = bar(CONTRACTED_DATA_SERIES, SeriesRole::Auxiliary);
    contracted_data.options.data = to_points(&contracted);
    contracted_data.options.color = Some(palette.contracted.as_str().into());
    contracted_data.options.border_color = Some(palette.ltd_expense.as_str().into());
    contracted_data.options.border_width = Some(1.0);
    contracted_data.options.point_width = Some(40.0);
    contracted_data.options.z_index = Some(0);
    contracted_data.options.show_in_legend = Some(false);
    contracted_data
        .options
        .extra
        .insert("states".to_owned(), json!({"hover": {"enabled": false}}));

    let mut ltd = bar(
        LTD_EXPENSE_SERIES,
        SeriesRole::CostBar {
            base_name: LTD_EXPENSE_SERIES.to_owned(),
        },
    );
    ltd.options.data = to_points(&ltd_expense);
    ltd.options.color = Some(palette.ltd_expense.as_str().into());
    ltd.options.point_width = Some(20.0);
    ltd.options.z_index = Some(1);
    ltd.options.show_in_legend = Some(true);
    ltd.options.legend_symbol = Some(LegendSymbol::Square);

    let mut forecast_marker = bar(FORECAST_MARKER_SERIES, SeriesRole::ForecastMarker);
    forecast_marker.options.data = forecast_marker_data;
    forecast_marker.options.point_width = Some(3.0);
    forecast_marker.options.grouping = Some(false);
    forecast_marker.options.z_index = Some(5);
    forecast_marker.options.show_in_legend = Some(false);

    config.series = vec![
        forecast,
        under_contract,
        over_contract,
        contracted_legend,
        contracted_data,
        ltd,
        forecast_marker,
    ];

    config.chart = Some(ChartOptions {
        kind: Some(SeriesType::Bar),
        ..Default::default()
    });
    config.plot_options = Some(PlotOptions {
        bar: Some(SeriesPlotOptions {
            grouping: Some(false),
            border_width: Some(1.0),
            border_radius: Some(json!(2.0)),
            data_labels: Some(json!({"enabled": false})),
            ..Default::default()
        }),
        ..Default::default()
    });

    config.x_axis = vec![Axis {
        categories,
        title: Some(untitled()),
        grid_line_width: Some(0.0),
        reversed: Some(true),
        labels: Some(AxisLabels {
            align: Some("right".to_owned()),
            x: Some(-10.0),
            formatter: Some(LabelFormatter::CategoryName),
            ..Default::default()
        }),
        ..Default::default()
    }];
    config.y_axis = vec![Axis {
        title: Some(untitled()),
        scale: Some(AxisType::Logarithmic),
        min: Some(1.0),
        reversed: Some(true),
        labels: Some(AxisLabels {
            formatter: Some(LabelFormatter::AbbreviatedCurrency),
            ..Default::default()
        }),
        ..Default::default()
    }];

    config.legend = Some(Legend {
        enabled: Some(true),
        vertical_align: Some("top".to_owned()),
        align: Some("left".to_owned()),
        x: Some(0.0),
        y: Some(-10.0),
        reversed: Some(true),
        symbol_radius: Some(0.0),
        symbol_height: Some(12.0),
        symbol_width: Some(12.0),
        ..Default::default()
    });

    config.tooltip = Some(Tooltip {
        enabled: Some(true),
        shared: Some(true),
        use_html: Some(true),
        background_color: Some("rgba(255, 255, 255, 1)".into()),
        border_width: Some(1.0),
        border_color: Some("#E0E0E0".into()),
        shadow: Some(json!(true)),
        formatter: Some(TooltipFormatter::BudgetVsForecast(BudgetVsForecastTooltip {
            palette: palette.clone(),
        })),
        ..Default::default()
    });

    config
}

/// The values of the named series with null points read as zero, or an empty
/// list when the series is absent.
fn values_or_zero(config: &ChartConfiguration, name: &str) -> Vec<f64> {
    match config.find_series(name) {
        Some(series) => series.values().map(|value| value.unwrap_or(0.0)).collect(),
        None => {
            tracing::debug!("series \"{name}\" not found, using no values");
            Vec::new()
        }
    }
}

fn to_points(values: &[f64]) -> Vec<DataPoint> {
    values.iter().copied().map(DataPoint::from).collect()
}

fn bar(name: &str, role: SeriesRole) -> Series {
    let mut series = Series::with_role(name, role);
    series.options.kind = Some(SeriesType::Bar);
    series
}

/// A series with no data that only adds an entry to the legend.
fn legend_entry(name: &str, color: &str, symbol: LegendSymbol) -> Series {
    let mut series = bar(name, SeriesRole::Auxiliary);
    series.options.color = Some(color.into());
    series.options.show_in_legend = Some(true);
    series.options.legend_symbol = Some(symbol);
    series
}

fn untitled() -> AxisTitle {
    AxisTitle {
        text: Some(String::new()),
        ..Default::default()
    }
}

/// LTD expense, contracted value, percent complete and the forecast over or
/// under the contract for the hovered vendor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsForecastTooltip {
    #[serde(default)]
    pub palette: BudgetPalette,
}

impl BudgetVsForecastTooltip {
    /// # Errors
    /// Returns [TooltipError::MissingPointIndex] if the first hovered point
    /// has no index and [TooltipError::PointOutOfRange] if a series has no
    /// point at that index.
    pub fn format(
        &self,
        context: &TooltipContext,
        config: &ChartConfiguration,
    ) -> Result<String, TooltipError> {
        let index = context
            .points
            .first()
            .and_then(|point| point.index)
            .ok_or(TooltipError::MissingPointIndex)?;

        let category = config.category(index).unwrap_or_default();

        let (Some(ltd_series), Some(contracted_series), Some(forecasted_series)) = (
            config.find_series(LTD_EXPENSE_SERIES),
            config.find_series(CONTRACTED_DATA_SERIES),
            config.find_series(FORECASTED_SERIES),
        ) else {
            return Ok(MISSING_SERIES_MESSAGE.to_owned());
        };

        let ltd_expense = value_at(ltd_series, index)?;
        let contracted = value_at(contracted_series, index)?;
        let forecasted = value_at(forecasted_series, index)?;

        let percent_complete = percent_of(ltd_expense, contracted);
        let over_under = forecasted - contracted;
        let over_under_percent = percent_of(over_under, contracted);
        let over_under_color = self.palette.over_under_color(over_under);
        let sign = if over_under >= 0.0 { "+" } else { "" };

        let markup = html!(
            div style="padding: 10px; min-width: 250px; font-family: 'lato', sans-serif; font-size: 13px;" {
                div style="font-size: 14px; margin-bottom: 10px; font-weight: 700;" { (category) }
                table style="width: 100%;" {
                    tr {
                        td style=(ROW_LABEL_STYLE) {
                            span style={ "background-color: " (self.palette.ltd_expense) "; " (SWATCH_STYLE) } {}
                            "LTD expense"
                        }
                        td style=(ROW_VALUE_STYLE) { (format_currency_rounded(ltd_expense)) }
                    }
                    tr {
                        td style=(ROW_LABEL_STYLE) {
                            span style={ "background-color: " (self.palette.contracted_legend) "; " (SWATCH_STYLE) } {}
                            "Contracted"
                        }
                        td style=(ROW_VALUE_STYLE) { (format_currency_rounded(contracted)) }
                    }
                    tr {
                        td style=(ROW_LABEL_STYLE) { span style=(SPACER_STYLE) {} "% complete" }
                        td style=(ROW_VALUE_STYLE) { (format_count(percent_complete)) "%" }
                    }
                    tr { td colspan="2" style="border-top: 1px solid #EEE; padding-top: 8px;" {} }
                    tr {
                        td style=(ROW_LABEL_STYLE) {
                            span style={
                                "background-color: " (over_under_color)
                                "; width: 3px; height: 12px; border-radius: 2px; display: inline-block; margin-right: 8px; vertical-align: middle; margin-left: 4px;"
                            } {}
                            "Forecasted"
                        }
                        td style=(ROW_VALUE_STYLE) { (format_currency_rounded(forecasted)) }
                    }
                    tr {
                        td style=(ROW_LABEL_STYLE) { span style=(SPACER_STYLE) {} "Over/under" }
                        td style={ (ROW_VALUE_STYLE) " color: " (over_under_color) ";" } {
                            (sign) (format_currency_rounded(over_under.abs()))
                            span style={
                                "display: inline-block; background-color: " (over_under_color) "20; color: "
                                (over_under_color) "; padding: 2px 5px; border-radius: 4px; margin-left: 8px;"
                            } {
                                (sign) (format_count(over_under_percent.abs())) "%"
                            }
                        }
                    }
                }
            }
        );

        Ok(markup.into_string())
    }
}

/// The value of `series` at `index`, with null points read as zero.
fn value_at(series: &Series, index: usize) -> Result<f64, TooltipError> {
    series
        .options
        .data
        .get(index)
        .map(|point| point.value().unwrap_or(0.0))
        .ok_or_else(|| TooltipError::PointOutOfRange {
            series: series.name().to_owned(),
            index,
        })
}

/// `part` as a percentage of `whole`, or 0 when `whole` is 0.
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}
