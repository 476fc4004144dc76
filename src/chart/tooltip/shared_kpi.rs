//! The generic shared tooltip used by KPI-style charts.

use maud::html;

use crate::{
    chart::tooltip::TooltipContext,
    html::{EM_DASH, format_currency_rounded},
};

const MARKER_STYLE: &str = "font-size: 1.5em; vertical-align: middle;";

/// One row per point in input order, plus a total when several points are
/// hovered.
pub(super) fn format(context: &TooltipContext) -> String {
    let header = context
        .x
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let total: f64 = context.points.iter().filter_map(|point| point.y).sum();

    html!(
        b { (header) }
        table {
            @for point in &context.points {
                tr {
                    td style={ "color: " (point.series.color_or_default()) "; " (MARKER_STYLE) } { "●" }
                    td style="padding: 0 10px 0 5px;" { (point.series.name) }
                    td style="text-align: right;" {
                        @match point.y {
                            Some(value) => { (format_currency_rounded(value)) }
                            None => { (EM_DASH) }
                        }
                    }
                }
            }

            @if context.points.len() > 1 {
                tr style="border-top: 1px solid #ccc; font-weight: bold;" {
                    td {}
                    td style="padding: 5px 10px 0 5px;" { "Total" }
                    td style="text-align: right; padding-top: 5px;" { (format_currency_rounded(total)) }
                }
            }
        }
    )
    .into_string()
}
