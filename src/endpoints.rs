//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/charts/{widget_id}/render', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to toggle layout editing.
pub const EDIT_MODE: &str = "/api/dashboard/edit_mode";
/// The route to open (POST) or close (DELETE) the widget library.
pub const WIDGET_LIBRARY: &str = "/api/dashboard/library";
/// The route to add a widget to the dashboard.
pub const WIDGETS: &str = "/api/dashboard/widgets";
/// The route to remove a widget from the dashboard.
pub const WIDGET: &str = "/api/dashboard/widgets/{instance_id}";
/// The route the grid reports the layout of every widget to.
pub const LAYOUT: &str = "/api/dashboard/layout";
/// The route the grid reports a finished resize to.
pub const LAYOUT_RESIZE: &str = "/api/dashboard/layout/resize";
/// The route to open (POST) or close (DELETE) the widget context menu.
pub const CONTEXT_MENU: &str = "/api/dashboard/context_menu";
/// The render hook for a widget's chart configuration.
pub const CHART_RENDER_API: &str = "/api/charts/{widget_id}/render";
/// The tooltip hook for hovered charts.
pub const CHART_TOOLTIP_API: &str = "/api/charts/tooltip";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/widgets/{instance_id}', '{instance_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// `endpoint_path` unchanged.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
