//! Voice Relay Server Entry Point

use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use voice_relay_config::{load_dotenv, load_settings, settings_or_default, Settings};
use voice_relay_server::{create_router, init_metrics, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing is not initialized yet, so early problems go to stderr
    let env_file = match load_dotenv() {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Warning: Failed to load .env file: {}", e);
            None
        }
    };

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var("VOICE_RELAY_ENV").ok();
    // A missing file means defaults; anything else stops startup
    let config = settings_or_default(load_settings(env.as_deref())).map_err(|e| {
        eprintln!("Error: Failed to load config: {}", e);
        e
    })?;

    init_tracing(&config);

    tracing::info!("Starting Voice Relay Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        env_file = ?env_file,
        "Configuration loaded"
    );

    match init_metrics(&config.observability, &config.server.host) {
        Ok(true) => {}
        Ok(false) => tracing::debug!("Metrics exporter disabled"),
        Err(e) => tracing::warn!(error = %e, "Metrics exporter not started"),
    }

    let state = AppState::new(config.clone())?;
    tracing::info!(
        api_key_configured = config.voice.api_key().is_some(),
        platform = state.platform.display_name(),
        default_voice_id = %config.voice.default_voice_id,
        "Initialized application state"
    );
    if config.voice.api_key().is_none() {
        tracing::warn!("No ElevenLabs API key configured, using system speech only");
    }

    let sweeper = if config.server.rate_limit.enabled {
        Some(
            state
                .rate_limiter
                .spawn_sweeper(Duration::from_secs(config.server.rate_limit.sweep_interval_secs)),
        )
    } else {
        tracing::warn!("Rate limiting is disabled");
        None
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("POST to http://{}/notify", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("voice_relay={},tower_http=info", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
