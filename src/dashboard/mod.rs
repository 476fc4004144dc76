//! Dashboard module
//!
//! The dashboard shell: a grid of widgets from a fixed catalog that can be
//! added, removed, moved and resized. The layout is saved after every change
//! and restored on start up.

mod catalog;
mod handlers;
mod layout;
mod storage;
mod store;
mod view;

pub use catalog::{CatalogEntry, find_widget};
pub use handlers::{
    DashboardState, add_widget_endpoint, close_context_menu_endpoint, close_library_endpoint,
    get_dashboard_page, open_context_menu_endpoint, open_library_endpoint,
    remove_widget_endpoint, resize_widget_endpoint, toggle_edit_mode_endpoint,
    update_layout_endpoint,
};
pub use layout::{GridItem, WidgetInstance, default_layout};
pub use storage::{create_local_storage_table, load_widgets, save_widgets};
pub use store::{DashboardAction, DashboardStore};
