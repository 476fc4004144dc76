//! HTTP endpoints the embedding host calls before drawing a chart and on
//! hover.

use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    Error,
    chart::{
        config::ChartConfiguration,
        tooltip::{TOOLTIP_FALLBACK, TooltipContext},
    },
    dashboard::find_widget,
};

/// The chart and hover state sent by the host when a tooltip is needed.
#[derive(Debug, Deserialize)]
pub struct TooltipRequest {
    /// The transformed configuration of the hovered chart.
    pub config: ChartConfiguration,
    pub context: TooltipContext,
}

/// Transform the host's configuration for the catalog widget `widget_id`.
///
/// Widgets without a chart transform get their configuration back unchanged.
pub async fn render_chart_endpoint(
    Path(widget_id): Path<String>,
    Json(config): Json<ChartConfiguration>,
) -> Result<Response, Error> {
    let widget = find_widget(&widget_id).ok_or_else(|| {
        tracing::warn!("render requested for unknown widget \"{widget_id}\"");
        Error::UnknownWidget(widget_id.clone())
    })?;

    let config = match widget.chart {
        Some(kind) => kind.transform(config),
        None => config,
    };

    Ok(Json(config).into_response())
}

/// Render the tooltip markup for a hover event.
///
/// A request body that cannot be read gets [TOOLTIP_FALLBACK] so the host
/// always has something to show.
pub async fn tooltip_endpoint(
    request: Result<Json<TooltipRequest>, JsonRejection>,
) -> Html<String> {
    match request {
        Ok(Json(request)) => Html(request.config.format_tooltip(&request.context)),
        Err(rejection) => {
            tracing::error!("Could not read tooltip request: {rejection}");
            Html(TOOLTIP_FALLBACK.to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::post,
    };
    use axum_test::TestServer;
    use scraper::{Html, Selector};
    use serde_json::{Value, json};

    use crate::endpoints;

    use super::{render_chart_endpoint, tooltip_endpoint};

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::CHART_RENDER_API, post(render_chart_endpoint))
            .route(endpoints::CHART_TOOLTIP_API, post(tooltip_endpoint));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn render_transforms_known_charts() {
        let server = get_test_server();

        let response = server
            .post("/api/charts/chart2/render")
            .json(&json!({
                "series": [
                    {"name": "Direct fees - A", "data": [100, -50]},
                    {"name": "Enrollment", "data": [10, null]}
                ],
                "xAxis": [{"categories": ["01/2024", "02/2024"]}]
            }))
            .await;

        response.assert_status_ok();
        let config: Value = response.json();
        assert_eq!(config["series"][1]["type"], json!("line"));
        assert_eq!(config["series"][1]["zIndex"], json!(5));
        assert_eq!(config["tooltip"]["formatter"]["kind"], json!("barLine"));
        assert_eq!(config["tooltip"]["useHTML"], json!(true));
    }

    #[tokio::test]
    async fn render_returns_other_widgets_unchanged() {
        let server = get_test_server();
        let body = json!({
            "series": [{"name": "LTD reconciled", "data": [1.5]}],
            "credits": {"enabled": false}
        });

        let response = server.post("/api/charts/kpi1/render").json(&body).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), body);
    }

    #[tokio::test]
    async fn render_accepts_unusual_host_options() {
        let server = get_test_server();

        let response = server
            .post("/api/charts/chart1/render")
            .json(&json!({
                "series": [
                    {"name": "Direct Fees", "type": "waterfall", "data": [100, -50]},
                    {"name": "Patient count", "type": "line", "yAxis": 1, "data": [5, 10]}
                ],
                "xAxis": [{"categories": ["01/2024", "02/2024"]}],
                "yAxis": [{"title": {"text": null}}, {"title": {"text": "Patients"}}]
            }))
            .await;

        response.assert_status_ok();
        let config: Value = response.json();
        assert_eq!(config["series"][0]["type"], json!("waterfall"));
        assert_eq!(config["series"][1]["zIndex"], json!(5));
        assert_eq!(config["yAxis"][1]["title"]["text"], json!("Patients"));
        assert_eq!(config["tooltip"]["formatter"]["kind"], json!("contractProgress"));
    }

    #[tokio::test]
    async fn render_rejects_unknown_widgets() {
        let server = get_test_server();

        server
            .post("/api/charts/chart99/render")
            .json(&json!({"series": []}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn tooltip_renders_html_for_the_attached_formatter() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CHART_TOOLTIP_API)
            .json(&json!({
                "config": {"tooltip": {"formatter": {"kind": "sharedKpi"}}},
                "context": {
                    "x": "Q1 2024",
                    "points": [
                        {"series": {"name": "Direct Fees", "color": "#111"}, "y": 1000},
                        {"series": {"name": "OCCs", "color": "#222"}, "y": 234.4}
                    ]
                }
            }))
            .await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let selector = Selector::parse("tr:last-child td:last-child").unwrap();
        let total = html.select(&selector).next().unwrap().text().collect::<String>();
        assert_eq!(total, "$1,234");
    }

    #[tokio::test]
    async fn failing_tooltip_returns_fallback_text() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CHART_TOOLTIP_API)
            .json(&json!({
                "config": {"tooltip": {"formatter": {"kind": "budgetVsForecast"}}},
                "context": {"x": "Vendor A", "points": [{"series": {"name": "LTD Expense"}, "y": 1}]}
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "Error creating tooltip.");
    }

    #[tokio::test]
    async fn unreadable_tooltip_request_returns_fallback_text() {
        let server = get_test_server();

        let response = server
            .post(endpoints::CHART_TOOLTIP_API)
            .json(&json!({
                "config": {"series": "not a list"},
                "context": {"x": "Q1", "points": []}
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), "Error creating tooltip.");
    }
}
