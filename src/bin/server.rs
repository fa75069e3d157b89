use std::{fs::OpenOptions, net::SocketAddr, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spend_tracker::{
    AppState, build_router, graceful_shutdown, logging_middleware, prune_expired_sessions,
};

/// The web server for spend_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The address to serve the app from.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 4000)]
    port: u16,

    /// The secret used to encrypt the session cookie.
    #[arg(long, env = "SESSION_SECRET")]
    session_secret: String,

    /// How many days a log in lasts.
    #[arg(long, env = "SESSION_DAYS", default_value_t = 7)]
    session_days: i64,

    /// Only send the session cookie over HTTPS.
    #[arg(long, env = "SECURE_COOKIES", default_value_t = false)]
    secure_cookies: bool,

    /// File path for the debug log.
    #[arg(long, env = "LOG_FILE", default_value = "debug.log")]
    log_file: String,
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    setup_logging(&args.log_file);

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(error) => {
            tracing::error!("Invalid host {:?}: {error}", args.host);
            exit(1);
        }
    };

    let conn = Connection::open(&args.db_path).expect("Could not open database.");

    let app_state = AppState::new(conn, &args.session_secret)
        .expect("Could not initialize database.")
        .with_session_duration(Duration::days(args.session_days))
        .with_secure_cookies(args.secure_cookies);

    match app_state
        .db_connection
        .lock()
        .map_err(|_| spend_tracker::Error::DatabaseLockError)
        .and_then(|connection| prune_expired_sessions(&connection))
    {
        Ok(count) => tracing::info!("Removed {count} expired sessions."),
        Err(error) => tracing::warn!("Could not remove expired sessions: {error}"),
    }

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly.");
}

fn setup_logging(log_file_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(
                    EnvFilter::builder()
                        .with_default_directive(filter::LevelFilter::DEBUG.into())
                        .from_env_lossy(),
                ),
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
        // Errors are logged where they are handled.
        .on_failure(());

    router.layer(tracing_layer)
}
