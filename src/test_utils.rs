//! Helpers shared by the HTTP and view tests.

use axum::{body::Body, response::Response};
use scraper::{Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// The number of elements matching `selector`.
#[track_caller]
pub(crate) fn select_count(html: &Html, selector: &str) -> usize {
    html.select(&Selector::parse(selector).unwrap()).count()
}

/// The value of `attribute` on the first element matching `selector`.
#[track_caller]
pub(crate) fn attribute_of(html: &Html, selector: &str, attribute: &str) -> String {
    html.select(&Selector::parse(selector).unwrap())
        .next()
        .unwrap_or_else(|| panic!("no element matches {selector}"))
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{selector} has no {attribute} attribute"))
        .to_owned()
}
