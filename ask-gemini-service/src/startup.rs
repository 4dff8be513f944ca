//! Application startup and lifecycle management.

use crate::config::AskGeminiConfig;
use crate::handlers::{
    ask::{ask_gemini, method_not_allowed, preflight},
    health::health_check,
};
use crate::services::providers::gemini::{GeminiChatProvider, GeminiConfig};
use crate::services::ChatProvider;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    cors::cors_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key was configured.
    pub chat_provider: Option<Arc<dyn ChatProvider>>,
}

impl AppState {
    pub fn new(chat_provider: Option<Arc<dyn ChatProvider>>) -> Self {
        Self { chat_provider }
    }

    /// Build the Gemini provider from configuration, if a key is present.
    pub fn from_config(config: &AskGeminiConfig) -> Result<Self, AppError> {
        let Some(api_key) = config.gemini.api_key.clone() else {
            tracing::warn!("GEMINI_API_KEY is not set; ask requests will fail until it is provided");
            return Ok(Self::new(None));
        };

        let provider: Arc<dyn ChatProvider> = Arc::new(GeminiChatProvider::new(GeminiConfig {
            api_key,
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
            timeout: config.gemini.timeout,
        })
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?);

        tracing::info!(
            model = %config.gemini.model,
            "Initialized Gemini chat provider"
        );

        Ok(Self::new(Some(provider)))
    }
}

/// Largest request body accepted (10 MiB, the hosted function runtime's cap).
/// Replaces axum's 2 MiB default.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the HTTP router.
///
/// `/health` is the only named route; every other path reaches the ask
/// handler. CORS headers are applied outermost so they cover every response.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(health_check)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .fallback(ask_gemini)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(cors_headers_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: AskGeminiConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(config, state).await
    }

    /// Bind the listener around an already assembled state.
    pub async fn build_with_state(config: AskGeminiConfig, state: AppState) -> Result<Self, AppError> {
        // port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("ask-gemini-service: HTTP on port {}", port);

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

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
