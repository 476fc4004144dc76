//! A clinical trial spend dashboard.
//!
//! The dashboard arranges widgets from an external embedding service on an
//! editable grid. Before the embedding host draws a chart it sends the chart
//! configuration to this server, which reorders the legend, aligns the value
//! axes and attaches the HTML tooltip for that chart. The layout of the grid
//! is saved to a SQLite database.

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod chart;
mod config;
mod dashboard;
mod db;
mod endpoints;
mod error_page;
mod html;
mod logging;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use chart::{ChartConfiguration, ChartKind, TooltipContext};
pub use config::EmbedSettings;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, LogRedactions, logging_middleware};
pub use routing::{build_router, configuration_error_router};

use crate::error_page::{
    configuration_error_response, internal_server_error_response, not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The widget ID is not in the widget catalog.
    #[error("\"{0}\" is not a widget in the catalog")]
    UnknownWidget(String),

    /// The instance ID does not refer to a widget on the dashboard.
    ///
    /// The client should refresh the dashboard, the widget may have already
    /// been removed.
    #[error("there is no widget \"{0}\" on the dashboard")]
    UnknownWidgetInstance(String),

    /// The embedding service settings are missing or blank.
    ///
    /// The string lists the names of the missing settings.
    #[error("missing embedding settings: {0}")]
    MissingEmbedSettings(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the lock on the shared dashboard state.
    #[error("could not acquire the dashboard lock")]
    DashboardLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", error);
        Error::SqlError(error)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::UnknownWidget(_) | Error::UnknownWidgetInstance(_) => not_found_response(),
            Error::MissingEmbedSettings(missing) => {
                configuration_error_response(&format!("Missing: {missing}"))
            }
            Error::DashboardLockError => internal_server_error_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                internal_server_error_response()
            }
        }
    }
}
