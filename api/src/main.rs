// ./api/src/main.rs
use api::{AppState, build_router, config::ServerConfig};
use tokio::net::TcpListener;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Application entry point
#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies
    let dotenv = dotenvy::dotenv();

    // --- Logger Initialization ---
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
    info!("Logger initialized successfully.");
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment from file");
    }

    let config = ServerConfig::from_env();

    // --- State & Router ---
    let app = build_router(AppState::in_memory());
    info!("Seeded in-memory stores and configured API routes.");

    // --- Server Startup ---
    let addr = config.socket_addr();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
    info!("Server stopped");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            // Without a signal handler, run until the process is killed
            std::future::pending::<()>().await;
        }
    }
}
