//! Full page responses for errors.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::{configuration_error_view, error_view};

/// The 404 page, for unknown routes, widgets and widget instances.
pub fn not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Not Found",
                "404",
                "Something's missing.",
                "That widget or page does not exist. It may have been removed from the dashboard.",
            )
            .into_string(),
        ),
    )
        .into_response()
}

pub async fn get_404_not_found() -> Response {
    not_found_response()
}

/// The 500 page with a generic explanation.
pub fn internal_server_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(
            error_view(
                "Internal Server Error",
                "500",
                "Sorry, something went wrong.",
                "Try again later or check the server logs",
            )
            .into_string(),
        ),
    )
        .into_response()
}

/// The page served in place of the dashboard when the embedding settings
/// are missing.
pub fn configuration_error_response(detail: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(configuration_error_view(detail).into_string()),
    )
        .into_response()
}
