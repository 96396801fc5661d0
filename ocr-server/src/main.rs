use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocr_server::ocr::OcrProvider;
use ocr_server::{create_router, AppState, Config};

#[derive(Parser)]
#[command(name = "ocr-server")]
#[command(about = "Upload an image, get its text back")]
struct Args {
    /// Address to bind (overrides OCR_SERVER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides OCR_SERVER_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ocr_server=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    std::fs::create_dir_all(&config.storage.archive_dir).with_context(|| {
        format!(
            "creating archive directory {}",
            config.storage.archive_dir.display()
        )
    })?;
    std::fs::create_dir_all(&config.storage.scratch_dir).with_context(|| {
        format!(
            "creating scratch directory {}",
            config.storage.scratch_dir.display()
        )
    })?;

    tracing::info!("Initializing OCR provider...");
    let ocr = OcrProvider::new(&config.ocr);
    if !ocr.is_available() {
        tracing::warn!("OCR unavailable - uploads will be archived but return no text");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        archive_dir = %config.storage.archive_dir.display(),
        scratch_dir = %config.storage.scratch_dir.display(),
        "Storage ready"
    );

    let app = create_router(AppState::new(config, ocr));

    tracing::info!("OCR server starting on http://{}", addr);
    tracing::info!("  Status page: http://{}/", addr);
    tracing::info!("  Demo:        http://{}/demo", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
