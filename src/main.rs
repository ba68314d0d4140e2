use std::fs::{self, File, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pptx_layout_scribe::server::{build_app_router, AppState, ServerConfig};

const DEFAULT_LOG_FILE: &str = "logs/pptx_layout_scribe.log";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // Console output plus a plain-text copy in LOG_FILE (empty disables the file).
    let log_path = std::env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.into());
    let log_file = (!log_path.is_empty())
        .then(|| open_log_file(Path::new(&log_path)).expect("Failed to open LOG_FILE"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pptx_layout_scribe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(log_file.map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
        }))
        .init();

    tracing::info!(log_file = %log_path, "pptx-layout-scribe starting up");

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        max_content_length = config.max_content_length,
        upload_folder = %config.upload_folder.display(),
        "Loaded server configuration"
    );

    fs::create_dir_all(&config.upload_folder).expect("Failed to create upload folder");

    let addr = SocketAddr::new(config.host.parse().expect("Invalid HOST"), config.port);
    let app = build_app_router(AppState::new(config));

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app).await.expect("Server error");
}

/// Opens `path` for appending, creating its directory first.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
