//! Application startup and lifecycle management.
//!
//! Builds the provider and relay once, wires them into the axum router and
//! serves until a shutdown signal arrives.

use crate::config::LayoutConfig;
use crate::handlers::{
    generate_layout, health_check, method_not_allowed, metrics_endpoint, not_found,
    readiness_check,
};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::{init_metrics, LayoutRelay, PromptTemplate};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{permissive_cors, request_id_middleware, trace_layer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub relay: LayoutRelay,
}

/// Build the HTTP router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/layout",
            post(generate_layout).fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .fallback(not_found)
        .with_state(state)
        .layer(permissive_cors())
        .layer(trace_layer())
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the Gemini provider described by `config`.
    pub async fn build(config: LayoutConfig) -> Result<Self, AppError> {
        let gemini_config = GeminiConfig::from(&config.gemini);
        let provider = GeminiTextProvider::new(gemini_config).map_err(|e| {
            tracing::error!("Failed to create Gemini client: {}", e);
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

        tracing::info!(
            model = %config.gemini.model,
            timeout_secs = config.gemini.timeout_secs,
            "Initialized Gemini text provider"
        );

        Self::build_with_provider(config, Arc::new(provider)).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: LayoutConfig,
        provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        init_metrics().map_err(|e| {
            tracing::error!("Failed to initialize metrics: {}", e);
            AppError::InternalError(anyhow::anyhow!(e))
        })?;

        let template = PromptTemplate::from(&config.prompt);
        tracing::info!(word_limit = template.word_limit(), "Prompt template ready");

        let state = AppState {
            relay: LayoutRelay::new(provider, template),
        };

        // Port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Layout service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped by Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
