//! The tooltip for stacked cost bars drawn with an enrollment line.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    chart::{
        classify::{RoleKind, SortTable, Variant},
        tooltip::{TooltipContext, TooltipPoint, header_label},
    },
    html::{EM_DASH, format_count, format_currency_rounded},
};

const MARKER_STYLE: &str = "font-size: 1.5em; vertical-align: middle;";
const LINE_MARKER_STYLE: &str = "font-size: 1.5em; vertical-align: middle; padding-top: 5px;";

/// Sorted cost bars, their total and an enrollment row.
///
/// Charts that split each cost category into actual (` - A`) and forecast
/// (` - F`) series use `actual_forecast_sort_order`, all other charts use
/// `sort_order`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarLineTooltip {
    #[serde(default)]
    pub sort_order: SortTable,
    #[serde(default)]
    pub actual_forecast_sort_order: SortTable,
}

struct LineRow<'a> {
    label: &'a str,
    value: String,
    italic: bool,
}

impl BarLineTooltip {
    pub fn new(sort_order: SortTable, actual_forecast_sort_order: SortTable) -> Self {
        Self {
            sort_order,
            actual_forecast_sort_order,
        }
    }

    pub(super) fn format(&self, context: &TooltipContext) -> String {
        let is_actual_forecast = context
            .points
            .iter()
            .any(|point| point.series.classification().variant != Variant::None);
        let is_forecast = context
            .points
            .iter()
            .any(|point| point.series.classification().variant == Variant::Forecast);

        let mut header = header_label(context);
        if is_forecast {
            header.push_str(" (forecast)");
        }

        let sort_order = if is_actual_forecast {
            &self.actual_forecast_sort_order
        } else {
            &self.sort_order
        };

        let mut bar_points: Vec<&TooltipPoint> = context
            .points
            .iter()
            .filter(|point| point.series.role().kind() != RoleKind::CountLine)
            .collect();
        sort_order.sort_by_rank(&mut bar_points, |point| {
            point.series.classification().base_name.as_str()
        });

        let bar_rows: Vec<(&TooltipPoint, f64)> = bar_points
            .into_iter()
            .filter_map(|point| match point.y {
                Some(value) if value != 0.0 => Some((point, value)),
                _ => None,
            })
            .collect();
        let total: f64 = bar_rows.iter().map(|(_, value)| value).sum();

        let line_point = context
            .points
            .iter()
            .find(|point| point.series.role().kind() == RoleKind::CountLine);
        let line_rows = line_point
            .map(|point| line_rows(point, is_actual_forecast, is_forecast))
            .unwrap_or_default();

        html!(
            b { (header) }
            table {
                @for (point, value) in &bar_rows {
                    tr {
                        td style={ "color: " (point.series.color_or_default()) "; " (MARKER_STYLE) } { "●" }
                        td style="padding: 0 10px 0 5px;" { (point.series.classification().base_name) }
                        td style="text-align: right;" { (format_currency_rounded(*value)) }
                    }
                }

                tr style="border-top: 1px solid #ccc; font-weight: bold;" {
                    td {}
                    td style="padding: 5px 10px 0 5px;" { "Total" }
                    td style="text-align: right; padding-top: 5px;" { (format_currency_rounded(total)) }
                }

                @if let Some(point) = line_point {
                    @for row in &line_rows {
                        (line_row(point.series.color_or_default(), row))
                    }
                }
            }
        )
        .into_string()
    }
}

/// On actual/forecast charts the enrollment line is labelled by period: a
/// forecast period shows an empty actual row above the forecast value. Other
/// charts label the row with the series name.
fn line_rows(point: &TooltipPoint, is_actual_forecast: bool, is_forecast: bool) -> Vec<LineRow<'_>> {
    let value = point.y.map(format_count).unwrap_or_else(|| EM_DASH.to_owned());

    match (is_actual_forecast, is_forecast) {
        (true, true) => vec![
            LineRow {
                label: "Actual enrollment",
                value: EM_DASH.to_owned(),
                italic: false,
            },
            LineRow {
                label: "Forecasted enrollment",
                value,
                italic: true,
            },
        ],
        (true, false) => vec![LineRow {
            label: "Actual enrollment",
            value,
            italic: false,
        }],
        (false, _) => vec![LineRow {
            label: &point.series.name,
            value,
            italic: false,
        }],
    }
}

fn line_row(color: &str, row: &LineRow) -> Markup {
    let marker_style = if row.italic {
        format!("color: {color}; {LINE_MARKER_STYLE} font-style: italic;")
    } else {
        format!("color: {color}; {LINE_MARKER_STYLE}")
    };

    html!(
        tr {
            td style=(marker_style) { "▬" }
            td style="padding: 5px 10px 0 5px; font-weight: bold;" { (row.label) }
            td style="text-align: right; font-weight: bold; padding-top: 5px;" { (row.value) }
        }
    )
}
