use std::{
    fs::OpenOptions,
    io,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use expense_tracker::{
    SQLiteAppState, build_router, graceful_shutdown, initialize_db, logging_middleware,
    open_connection, seed_demo_data,
};

/// The REST API server for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "EXPENSES_DB_PATH")]
    db_path: PathBuf,

    /// The IP address to listen on.
    #[arg(long, env = "EXPENSES_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "EXPENSES_PORT", default_value_t = 3000)]
    port: u16,

    /// File path for the debug log.
    #[arg(long, env = "EXPENSES_LOG_PATH", default_value = "debug.log")]
    log_path: PathBuf,

    /// Add demo users and expenses to an empty database.
    #[arg(long)]
    seed_demo_data: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!(
            "Could not open log file {}: {error}",
            args.log_path.display()
        );
        return ExitCode::FAILURE;
    }

    let connection = match open_connection(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!(
                "Could not open database file {}: {error}",
                args.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = initialize_db(&connection) {
        tracing::error!("Could not migrate the database: {error}");
        tracing::warn!("Continuing with the existing schema, some requests may fail.");
    }

    if args.seed_demo_data {
        if let Err(error) = seed_demo_data(&connection) {
            tracing::warn!("Could not seed demo data: {error}");
        }
    }

    let state = SQLiteAppState::new(Arc::new(Mutex::new(connection)));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::new(args.host, args.port);
    tracing::info!("HTTP server listening on {addr}");

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging(log_path: &Path) -> io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
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
        // By default, `TraceLayer` will log 5xx responses but internal errors
        // are already logged where they occur.
        .on_failure(());

    router.layer(tracing_layer)
}
