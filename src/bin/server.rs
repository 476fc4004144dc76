use std::{
    fs::OpenOptions,
    net::SocketAddr,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spend_dashboard::{
    AppState, EmbedSettings, LogRedactions, build_router, configuration_error_router,
    graceful_shutdown, logging_middleware,
};

/// The web server for the spend dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database that holds the saved dashboard layout.
    #[arg(long)]
    db_path: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The base URL of the embedding service.
    #[arg(long, env = "EMBED_URL")]
    embed_url: Option<String>,

    /// The access token for the embedding service.
    #[arg(long, env = "EMBED_TOKEN", hide_env_values = true)]
    embed_token: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let (router, redactions) = match EmbedSettings::new(args.embed_url, args.embed_token) {
        Ok(embed) => {
            let redactions = LogRedactions::new([embed.token.clone()]);
            let conn = Connection::open(&args.db_path).unwrap_or_else(|error| {
                panic!("Could not open database file {}: {error}", args.db_path)
            });
            let state = AppState::new(conn, embed).expect("Could not initialize app state.");

            (build_router(state), redactions)
        }
        Err(error) => {
            tracing::error!("{error}. The dashboard will not be available.");
            (
                configuration_error_router(error.to_string()),
                LogRedactions::default(),
            )
        }
    };

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(router.layer(middleware::from_fn_with_state(
        redactions,
        logging_middleware,
    )));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
