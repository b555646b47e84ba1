// src/main.rs

use dotenvy::dotenv;
use exam_forge::config::Config;
use exam_forge::routes;
use exam_forge::state::AppState;
use std::net::SocketAddr;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for warning in &config.load_warnings {
        tracing::warn!("{}", warning);
    }

    if !config.source_material_dir.exists() {
        tracing::info!(
            "Creating source material folder {}",
            config.source_material_dir.display()
        );
        tokio::fs::create_dir_all(&config.source_material_dir).await?;
    }

    let state = AppState::from_config(config.clone());
    match &state.llm {
        Ok(_) => tracing::info!(
            "Gemini API configured successfully (Model: {}).",
            config.gemini_model
        ),
        Err(e) => tracing::error!("Error configuring Gemini API: {}", e),
    }

    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
