//! The tooltip for LTD spend: cost columns, their total and the patient count.

use maud::html;
use serde::{Deserialize, Serialize};

use crate::{
    chart::{
        classify::SortTable,
        config::SeriesType,
        tooltip::{TooltipContext, TooltipPoint, header_label},
    },
    html::{EM_DASH, format_count, format_currency_rounded},
};

const DEFAULT_LINE_SERIES_NAME: &str = "Patient count";
const CELL_STYLE: &str = "padding: 4px 2px;";
const VALUE_CELL_STYLE: &str = "text-align: right; padding: 4px 2px; font-weight: bold;";
const TOTAL_CELL_STYLE: &str = "border-top: 1px solid #E0E0E0; padding-top: 8px; padding-bottom: 8px;";

/// Column points sorted by cost category, a total and an enrollment row for
/// the line series named `line_series_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractProgressTooltip {
    #[serde(default)]
    pub sort_order: SortTable,
    #[serde(default = "default_line_series_name")]
    pub line_series_name: String,
}

fn default_line_series_name() -> String {
    DEFAULT_LINE_SERIES_NAME.to_owned()
}

impl Default for ContractProgressTooltip {
    fn default() -> Self {
        Self {
            sort_order: SortTable::default(),
            line_series_name: default_line_series_name(),
        }
    }
}

impl ContractProgressTooltip {
    pub fn new(sort_order: SortTable) -> Self {
        Self {
            sort_order,
            ..Default::default()
        }
    }

    pub(super) fn format(&self, context: &TooltipContext) -> String {
        let header = header_label(context);

        let mut cost_points: Vec<&TooltipPoint> = context
            .points
            .iter()
            .filter(|point| point.series.kind == Some(SeriesType::Column))
            .collect();
        self.sort_order
            .sort_by_rank(&mut cost_points, |point| point.series.name.as_str());

        let cost_rows: Vec<(&TooltipPoint, f64)> = cost_points
            .iter()
            .filter_map(|point| match point.y {
                Some(value) if value != 0.0 => Some((*point, value)),
                _ => None,
            })
            .collect();
        let total: f64 = cost_rows.iter().map(|(_, value)| value).sum();

        let line_point = context.points.iter().find(|point| {
            point.series.name == self.line_series_name
                && point.series.kind != Some(SeriesType::Column)
        });

        html!(
            div style="padding: 5px 10px; min-width: 200px; font-family: sans-serif;" {
                div style="font-size: 14px; margin-bottom: 10px;" { b { (header) } }
                table style="width: 100%;" {
                    @for (point, value) in &cost_rows {
                        tr {
                            td style=(CELL_STYLE) {
                                span style={
                                    "background-color: " (point.series.color_or_default())
                                    "; width: 8px; height: 8px; display: inline-block; margin-right: 6px; vertical-align: middle;"
                                } {}
                                (point.series.name)
                            }
                            td style=(VALUE_CELL_STYLE) { (format_currency_rounded(*value)) }
                        }
                    }

                    @if !cost_points.is_empty() {
                        tr {
                            td style=(TOTAL_CELL_STYLE) { b { "Total" } }
                            td style={ (TOTAL_CELL_STYLE) " text-align: right;" } {
                                b { (format_currency_rounded(total)) }
                            }
                        }
                    }

                    @if let Some(point) = line_point {
                        tr {
                            td style=(CELL_STYLE) {
                                span style={
                                    "color: " (point.series.color_or_default())
                                    "; font-weight: bold; font-size: 18px; vertical-align: middle; line-height: 10px;"
                                } { (EM_DASH) }
                                " Actual enrollment"
                            }
                            td style=(VALUE_CELL_STYLE) {
                                @match point.y {
                                    Some(count) => { (format_count(count)) }
                                    None => { (EM_DASH) }
                                }
                            }
                        }
                    }
                }
            }
        )
        .into_string()
    }
}
