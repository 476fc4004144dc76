//! HTML views for the dashboard shell.

use maud::{Markup, PreEscaped, html};

use crate::{
    config::EmbedSettings,
    dashboard::{
        catalog::{CatalogEntry, WIDGET_CATALOG, find_widget},
        layout::WidgetInstance,
        store::{ContextMenu, DashboardStore},
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, HeadElement, base,
    },
};

/// The element every dashboard partial replaces.
const DASHBOARD_TARGET: &str = "#dashboard";

/// The grid library that lays out and drags the widgets. It reads each
/// item's position from its `gs-*` attributes.
pub(super) const GRIDSTACK_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/gridstack@12.3.3/dist/gridstack-all.js";
pub(super) const GRIDSTACK_STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/npm/gridstack@12.3.3/dist/gridstack.min.css";

/// The full dashboard page.
pub(super) fn dashboard_view(store: &DashboardStore, embed: &EmbedSettings) -> Markup {
    let content = dashboard_content(store);

    let scripts = [
        HeadElement::StylesheetLink(GRIDSTACK_STYLESHEET_URL.to_owned()),
        HeadElement::ScriptLink(GRIDSTACK_SCRIPT_URL.to_owned()),
        embed_settings_script(embed),
        HeadElement::ScriptLink("/static/dashboard.js".to_owned()),
    ];

    base("Dashboard", &scripts, &content)
}

/// Expose the embedding settings to the page script.
fn embed_settings_script(embed: &EmbedSettings) -> HeadElement {
    let settings = serde_json::json!({
        "url": embed.url,
        "token": embed.token,
        "tooltipUrl": endpoints::CHART_TOOLTIP_API,
    });
    // Keep the settings from closing the script element early.
    let settings = settings.to_string().replace("</", "<\\/");

    HeadElement::ScriptSource(PreEscaped(format!(
        "window.dashboardEmbed = {settings};"
    )))
}

/// The dashboard header, grid and any open overlays.
pub(super) fn dashboard_content(store: &DashboardStore) -> Markup {
    let edit_mode = store.edit_mode();

    html!(
        div
            id="dashboard"
            class="flex flex-col min-h-screen text-gray-900 dark:text-white"
        {
            header class="flex items-center justify-between px-6 py-4 bg-white dark:bg-gray-800 shadow-sm"
            {
                h1 class="text-xl font-bold" { "Spend Dashboard" }

                div class="flex gap-2"
                {
                    button
                        type="button"
                        hx-post=(endpoints::EDIT_MODE)
                        hx-target=(DASHBOARD_TARGET)
                        hx-swap="outerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        @if edit_mode { "Lock Layout" } @else { "Edit Layout" }
                    }

                    button
                        type="button"
                        hx-post=(endpoints::WIDGET_LIBRARY)
                        hx-target=(DASHBOARD_TARGET)
                        hx-swap="outerHTML"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "+ Add Widget"
                    }
                }
            }

            div
                id="dashboard-grid"
                class="grid-stack p-4"
                data-editable=(edit_mode)
                data-layout-url=(endpoints::LAYOUT)
                data-resize-url=(endpoints::LAYOUT_RESIZE)
            {
                @for widget in store.widgets() {
                    (widget_view(widget, edit_mode))
                }
            }

            @if store.library_open() {
                (widget_library())
            }

            @if let Some((instance_id, x, y)) = visible_menu(store.context_menu()) {
                (context_menu(instance_id, x, y))
            }
        }
    )
}

fn visible_menu(menu: &ContextMenu) -> Option<(&str, i32, i32)> {
    match (&menu.instance_id, menu.visible) {
        (Some(instance_id), true) => Some((instance_id, menu.x, menu.y)),
        _ => None,
    }
}

fn widget_view(widget: &WidgetInstance, edit_mode: bool) -> Markup {
    let layout = &widget.layout;
    // Quoted so the id is a string literal inside the hx-vals expression.
    let quoted_id = serde_json::Value::from(widget.instance_id.as_str()).to_string();
    let context_menu_values = edit_mode.then(|| {
        format!("js:{{instance_id: {quoted_id}, x: event.clientX, y: event.clientY}}")
    });
    let context_menu_endpoint = edit_mode.then_some(endpoints::CONTEXT_MENU);

    html!(
        div
            class="grid-stack-item"
            data-instance-id=(widget.instance_id)
            gs-id=(layout.i)
            gs-x=(layout.x)
            gs-y=(layout.y)
            gs-w=(layout.w)
            gs-h=(layout.h)
            hx-post=[context_menu_endpoint]
            hx-trigger=[edit_mode.then_some("contextmenu")]
            hx-vals=[context_menu_values]
            hx-target=[edit_mode.then_some(DASHBOARD_TARGET)]
            hx-swap=[edit_mode.then_some("outerHTML")]
        {
            div class="grid-stack-item-content h-full rounded bg-white dark:bg-gray-800 shadow"
            {
                @match find_widget(&widget.id) {
                    Some(entry) => { (widget_body(entry)) }
                    None => {
                        p class="p-4 text-red-600" { "Unknown widget \"" (widget.id) "\"" }
                    }
                }
            }
        }
    )
}

fn widget_body(entry: &CatalogEntry) -> Markup {
    let render_url = entry
        .chart
        .map(|_| format_endpoint(endpoints::CHART_RENDER_API, entry.id));

    html!(
        @if !entry.hides_header() {
            h2 class="px-4 pt-3 text-sm font-semibold" { (entry.title) }
        }

        @match entry.embed {
            Some(target) => {
                div
                    class="embedded-widget h-full"
                    data-widget-id=(entry.id)
                    data-widget-oid=(target.widget_oid)
                    data-dashboard-oid=(target.dashboard_oid)
                    data-hide-header=(entry.hides_header())
                    data-render-url=[render_url]
                {}
            }
            None => {
                div
                    class="custom-widget flex flex-col justify-center h-full p-4"
                    data-widget-id=(entry.id)
                {
                    span class="text-sm text-gray-500 dark:text-gray-400" { (entry.title) }
                }
            }
        }
    )
}

fn widget_library() -> Markup {
    html!(
        div
            id="widget-library"
            role="dialog"
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50"
        {
            div class="w-full max-w-lg p-6 rounded bg-white dark:bg-gray-800"
            {
                div class="flex items-center justify-between mb-4"
                {
                    h2 class="text-lg font-semibold" { "Add Widget" }

                    button
                        type="button"
                        hx-delete=(endpoints::WIDGET_LIBRARY)
                        hx-target=(DASHBOARD_TARGET)
                        hx-swap="outerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Close"
                    }
                }

                ul class="grid grid-cols-2 gap-2"
                {
                    @for entry in &WIDGET_CATALOG {
                        li
                        {
                            form
                                hx-post=(endpoints::WIDGETS)
                                hx-target=(DASHBOARD_TARGET)
                                hx-swap="outerHTML"
                            {
                                input type="hidden" name="widget_id" value=(entry.id);

                                button type="submit" class=(BUTTON_SECONDARY_STYLE) { (entry.title) }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn context_menu(instance_id: &str, x: i32, y: i32) -> Markup {
    html!(
        div
            id="context-menu"
            class="fixed z-50 py-2 rounded bg-white dark:bg-gray-800 shadow-lg"
            style=(format!("top: {y}px; left: {x}px;"))
        {
            button
                type="button"
                hx-delete=(format_endpoint(endpoints::WIDGET, instance_id))
                hx-target=(DASHBOARD_TARGET)
                hx-swap="outerHTML"
                class=(BUTTON_DELETE_STYLE)
            {
                "Remove Widget"
            }

            button
                type="button"
                hx-delete=(endpoints::CONTEXT_MENU)
                hx-target=(DASHBOARD_TARGET)
                hx-swap="outerHTML"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Cancel"
            }
        }
    )
}
