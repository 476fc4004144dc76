//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    chart::{render_chart_endpoint, tooltip_endpoint},
    dashboard::{
        add_widget_endpoint, close_context_menu_endpoint, close_library_endpoint,
        get_dashboard_page, open_context_menu_endpoint, open_library_endpoint,
        remove_widget_endpoint, resize_widget_endpoint, toggle_edit_mode_endpoint,
        update_layout_endpoint,
    },
    endpoints,
    error_page::{configuration_error_response, get_404_not_found},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EDIT_MODE, post(toggle_edit_mode_endpoint))
        .route(
            endpoints::WIDGET_LIBRARY,
            post(open_library_endpoint).delete(close_library_endpoint),
        )
        .route(endpoints::WIDGETS, post(add_widget_endpoint))
        .route(endpoints::WIDGET, delete(remove_widget_endpoint))
        .route(endpoints::LAYOUT, put(update_layout_endpoint))
        .route(endpoints::LAYOUT_RESIZE, put(resize_widget_endpoint))
        .route(
            endpoints::CONTEXT_MENU,
            post(open_context_menu_endpoint).delete(close_context_menu_endpoint),
        );

    let chart_routes = Router::new()
        .route(endpoints::CHART_RENDER_API, post(render_chart_endpoint))
        .route(endpoints::CHART_TOOLTIP_API, post(tooltip_endpoint));

    dashboard_routes
        .merge(chart_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Return a router that answers every request with the configuration error
/// page.
///
/// Used instead of [build_router] when the embedding settings are missing so
/// that no part of the dashboard is shown.
pub fn configuration_error_router(detail: String) -> Router {
    Router::new().fallback(move || {
        let detail = detail.clone();
        async move { configuration_error_response(&detail) }
    })
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{AppState, config::EmbedSettings, endpoints, routing::get_index_page};

    use super::{build_router, configuration_error_router};

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            EmbedSettings {
                url: "https://embed.example.com".to_owned(),
                token: "token".to_owned(),
            },
        )
        .unwrap();

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn serves_dashboard_and_chart_routes() {
        let server = get_test_server();

        server.get(endpoints::DASHBOARD_VIEW).await.assert_status_ok();
        server
            .post("/api/charts/chart5/render")
            .json(&json!({"series": [{"name": "Remaining Budget", "data": [1]}]}))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let server = get_test_server();

        server
            .get("/transactions")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configuration_error_replaces_every_route() {
        let server = TestServer::try_new(configuration_error_router("Missing: EMBED_URL".to_owned()))
            .expect("Could not create test server.");

        for path in [endpoints::ROOT, endpoints::DASHBOARD_VIEW, "/api/charts/tooltip"] {
            let response = server.get(path).await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            assert!(response.text().contains("Application Configuration Error"));
            assert!(response.text().contains("Missing: EMBED_URL"));
        }
    }
}
