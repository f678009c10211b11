//! Application startup and lifecycle management.

use crate::config::HealthCoachConfig;
use crate::handlers::{calculate, health_check, index, metrics::metrics, readiness_check};
use crate::services::{
    EmailProvider, MockEmailProvider, MockTextProvider, Notifier, OpenAiTextProvider,
    SmtpEmailProvider, TextProvider,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const DEV_MOCK_ANALYSIS: &str =
    "Your health analysis is on its way! 💪 Configure OPENAI_API_KEY to receive a real one.";

/// Shared application state. Providers are built once at startup and only read
/// by request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: HealthCoachConfig,
    pub generator: Arc<dyn TextProvider>,
    pub notifier: Notifier,
}

impl AppState {
    pub fn new(
        config: HealthCoachConfig,
        generator: Arc<dyn TextProvider>,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Self {
        Self {
            config,
            generator,
            notifier: Notifier::new(email_provider),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/calculate", post(calculate))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Outside prod an unusable OpenAI configuration falls back to the mock
/// generator; in prod it is a startup error.
fn text_provider(config: &HealthCoachConfig) -> Result<Arc<dyn TextProvider>, AppError> {
    match OpenAiTextProvider::new(config.openai.clone()) {
        Ok(provider) => {
            tracing::info!(model = %config.openai.model, "OpenAI text provider initialized");
            Ok(Arc::new(provider))
        }
        Err(e) if config.is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "Failed to initialize OpenAI provider: {}",
            e
        ))),
        Err(e) => {
            tracing::warn!("Failed to initialize OpenAI provider: {}. Using mock.", e);
            Ok(Arc::new(MockTextProvider::new(DEV_MOCK_ANALYSIS)))
        }
    }
}

fn email_provider(config: &HealthCoachConfig) -> Result<Arc<dyn EmailProvider>, AppError> {
    if !config.smtp.enabled {
        if config.is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "SMTP provider cannot be disabled in production"
            )));
        }
        tracing::info!("SMTP provider disabled, using mock email provider");
        return Ok(Arc::new(MockEmailProvider::new()));
    }

    match SmtpEmailProvider::new(&config.smtp) {
        Ok(provider) => {
            tracing::info!(host = %config.smtp.host, port = config.smtp.port, "SMTP email provider initialized");
            Ok(Arc::new(provider))
        }
        Err(e) if config.is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "Failed to initialize SMTP provider: {}",
            e
        ))),
        Err(e) => {
            tracing::warn!("Failed to initialize SMTP provider: {}. Using mock.", e);
            Ok(Arc::new(MockEmailProvider::new()))
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with providers derived from the configuration.
    pub async fn build(config: HealthCoachConfig) -> Result<Self, AppError> {
        let generator = text_provider(&config)?;
        let email_provider = email_provider(&config)?;
        Self::build_with_providers(config, generator, email_provider).await
    }

    /// Build the application around explicit providers.
    pub async fn build_with_providers(
        config: HealthCoachConfig,
        generator: Arc<dyn TextProvider>,
        email_provider: Arc<dyn EmailProvider>,
    ) -> Result<Self, AppError> {
        // Port 0 picks a random port (tests)
        let address = config.common.bind_address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", address, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Health coach service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState::new(config, generator, email_provider),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT/SIGTERM. In-flight requests are allowed to finish.
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
