//! Middleware for logging requests and responses.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{StatusCode, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Bodies longer than this many bytes are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Written in place of a secret in logged bodies.
const REDACTED: &str = "********";

/// Secrets that must never be written to the logs, such as the embedding
/// token that the dashboard page hands to its script.
#[derive(Debug, Clone, Default)]
pub struct LogRedactions {
    secrets: Arc<Vec<String>>,
}

impl LogRedactions {
    /// Blank secrets are ignored.
    pub fn new(secrets: impl IntoIterator<Item = String>) -> Self {
        Self {
            secrets: Arc::new(
                secrets
                    .into_iter()
                    .filter(|secret| !secret.trim().is_empty())
                    .collect(),
            ),
        }
    }

    fn redact(&self, text: &str) -> String {
        self.secrets.iter().fold(text.to_owned(), |text, secret| {
            text.replace(secret.as_str(), REDACTED)
        })
    }
}

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Every secret in `redactions` is masked in the logged bodies; the bodies
/// passed on are unchanged.
pub async fn logging_middleware(
    State(redactions): State<LogRedactions>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log_request(&parts, &redactions.redact(&body_text));

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &redactions.redact(&body_text));

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// The longest prefix of `body` that fits in [LOG_BODY_LENGTH_LIMIT] bytes
/// without splitting a character.
fn truncate_body(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {parts:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {parts:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {parts:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {parts:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    use axum::{Router, middleware, routing::post};
    use axum_test::TestServer;

    use super::{LOG_BODY_LENGTH_LIMIT, LogRedactions, logging_middleware, truncate_body};

    /// A log writer that keeps everything written to it.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn echo_server(redactions: LogRedactions) -> TestServer {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn_with_state(redactions, logging_middleware));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn redacts_every_occurrence_of_each_secret() {
        let redactions = LogRedactions::new(["s3cret".to_owned(), " ".to_owned()]);

        assert_eq!(
            redactions.redact("{\"token\":\"s3cret\"} s3cret"),
            "{\"token\":\"********\"} ********"
        );
        assert_eq!(LogRedactions::default().redact("s3cret"), "s3cret");
    }

    #[tokio::test]
    async fn secrets_never_reach_the_logs() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .finish();
        let _default = tracing::subscriber::set_default(subscriber);
        let server = echo_server(LogRedactions::new(["embed-token-123".to_owned()]));
        let body = format!(
            "window.dashboardEmbed = {{\"token\":\"embed-token-123\"}};{}",
            "x".repeat(LOG_BODY_LENGTH_LIMIT)
        );

        let response = server.post("/echo").text(&body).await;

        response.assert_status_ok();
        assert_eq!(response.text(), body);
        let logs = logs.text();
        assert!(logs.contains("Full response body"));
        assert!(logs.contains("********"));
        assert!(!logs.contains("embed-token-123"));
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(truncate_body("{\"series\": []}"), "{\"series\": []}");
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        // Each em-dash is three bytes, so the limit falls inside a character.
        let body = "—".repeat(30);

        let truncated = truncate_body(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert_eq!(truncated, "—".repeat(21));
    }

    #[tokio::test]
    async fn bodies_pass_through_unchanged() {
        let server = echo_server(LogRedactions::default());
        let body = "● Actual enrollment — ".repeat(10);

        let response = server.post("/echo").text(&body).await;

        response.assert_status_ok();
        assert_eq!(response.text(), body);
    }
}
