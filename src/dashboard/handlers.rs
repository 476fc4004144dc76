//! Dashboard HTTP handlers.
//!
//! Every handler that changes the dashboard goes through the shared
//! [DashboardStore] and answers with the re-rendered dashboard partial, except
//! the grid callbacks, which the grid has already drawn.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Form, Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRequest;
use maud::Markup;
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    config::EmbedSettings,
    dashboard::{
        layout::GridItem,
        storage::save_widgets,
        store::{DashboardAction, DashboardStore},
        view::{dashboard_content, dashboard_view},
    },
};

/// The state needed by the dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The dashboard shell state shared by every request.
    pub store: Arc<Mutex<DashboardStore>>,
    /// The database connection holding the saved layout.
    pub db_connection: Arc<Mutex<Connection>>,
    pub embed: EmbedSettings,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            db_connection: state.db_connection.clone(),
            embed: state.embed.clone(),
        }
    }
}

/// Form data for adding a widget from the library.
#[derive(Debug, Deserialize)]
pub struct AddWidgetForm {
    /// The catalog key of the widget to add.
    pub widget_id: String,
}

/// Form data sent when a widget is right-clicked.
#[derive(Debug, Deserialize)]
pub struct ContextMenuForm {
    pub instance_id: String,
    /// Client coordinates of the click.
    pub x: f64,
    pub y: f64,
}

/// Display the dashboard, or only its content for htmx requests.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Result<Response, Error> {
    let store = lock_store(&state)?;

    if is_htmx_request {
        Ok(dashboard_content(&store).into_response())
    } else {
        Ok(dashboard_view(&store, &state.embed).into_response())
    }
}

pub async fn toggle_edit_mode_endpoint(
    State(state): State<DashboardState>,
) -> Result<Markup, Error> {
    dispatch(&state, [DashboardAction::ToggleEditMode])
}

pub async fn open_library_endpoint(State(state): State<DashboardState>) -> Result<Markup, Error> {
    dispatch(&state, [DashboardAction::OpenLibrary])
}

pub async fn close_library_endpoint(State(state): State<DashboardState>) -> Result<Markup, Error> {
    dispatch(&state, [DashboardAction::CloseLibrary])
}

/// Add a catalog widget to the bottom of the dashboard and close the library.
pub async fn add_widget_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<AddWidgetForm>,
) -> Result<Markup, Error> {
    let timestamp_millis = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;

    dispatch(
        &state,
        [DashboardAction::AddWidget {
            widget_id: form.widget_id,
            timestamp_millis,
        }],
    )
}

/// Remove a widget and close the context menu that requested it.
pub async fn remove_widget_endpoint(
    State(state): State<DashboardState>,
    Path(instance_id): Path<String>,
) -> Result<Markup, Error> {
    dispatch(
        &state,
        [
            DashboardAction::RemoveWidget { instance_id },
            DashboardAction::CloseMenu,
        ],
    )
}

/// Record the layout of every widget after the grid changes.
pub async fn update_layout_endpoint(
    State(state): State<DashboardState>,
    Json(layout): Json<Vec<GridItem>>,
) -> Result<StatusCode, Error> {
    dispatch(&state, [DashboardAction::UpdateLayout(layout)])?;

    Ok(StatusCode::NO_CONTENT)
}

/// Record the size of a widget after a resize finishes.
pub async fn resize_widget_endpoint(
    State(state): State<DashboardState>,
    Json(item): Json<GridItem>,
) -> Result<StatusCode, Error> {
    dispatch(&state, [DashboardAction::ResizeWidget(item)])?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn open_context_menu_endpoint(
    State(state): State<DashboardState>,
    Form(form): Form<ContextMenuForm>,
) -> Result<Markup, Error> {
    dispatch(
        &state,
        [DashboardAction::OpenMenu {
            instance_id: form.instance_id,
            x: form.x.round() as i32,
            y: form.y.round() as i32,
        }],
    )
}

pub async fn close_context_menu_endpoint(
    State(state): State<DashboardState>,
) -> Result<Markup, Error> {
    dispatch(&state, [DashboardAction::CloseMenu])
}

fn lock_store(state: &DashboardState) -> Result<MutexGuard<'_, DashboardStore>, Error> {
    state
        .store
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire dashboard store lock: {error}"))
        .map_err(|_| Error::DashboardLockError)
}

/// Apply `actions` in order and render the resulting dashboard content.
///
/// The widget list is saved in the background when any action changed it.
fn dispatch(
    state: &DashboardState,
    actions: impl IntoIterator<Item = DashboardAction>,
) -> Result<Markup, Error> {
    let mut store = lock_store(state)?;

    let mut widgets_changed = false;
    for action in actions {
        widgets_changed |= store.apply(action)?;
    }

    let content = dashboard_content(&store);
    drop(store);

    if widgets_changed {
        spawn_save(state);
    }

    Ok(content)
}

/// Save the current widget list without waiting for the write.
///
/// The database lock is taken before the store is read, so the last save to
/// run always writes the latest widget list.
fn spawn_save(state: &DashboardState) {
    let store = state.store.clone();
    let db_connection = state.db_connection.clone();

    tokio::task::spawn_blocking(move || {
        let connection = match db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return;
            }
        };

        let widgets = match store.lock() {
            Ok(store) => store.widgets().to_vec(),
            Err(error) => {
                tracing::error!("could not acquire dashboard store lock: {error}");
                return;
            }
        };

        if let Err(error) = save_widgets(&widgets, &connection) {
            tracing::error!("could not save dashboard widgets: {error}");
        }
    });
}
