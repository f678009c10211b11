#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use health_coach_service::config::{HealthCoachConfig, OpenAiConfig, SmtpConfig};
use health_coach_service::services::{MockEmailProvider, MockTextProvider};
use health_coach_service::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config() -> HealthCoachConfig {
    HealthCoachConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        is_prod: false,
        openai: OpenAiConfig {
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
        },
        smtp: SmtpConfig {
            host: "smtp.test.local".to_string(),
            port: 587,
            user: "coach@example.com".to_string(),
            password: "test".to_string(),
            from_name: None,
            enabled: false, // Use mock
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub generator: Arc<MockTextProvider>,
    pub mailer: Arc<MockEmailProvider>,
}

impl TestApp {
    pub fn new(generator: MockTextProvider, mailer: MockEmailProvider) -> Self {
        let generator = Arc::new(generator);
        let mailer = Arc::new(mailer);
        let state = AppState::new(test_config(), generator.clone(), mailer.clone());

        TestApp {
            router: build_router(state),
            generator,
            mailer,
        }
    }

    /// App whose generator answers every prompt with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self::new(MockTextProvider::new(reply), MockEmailProvider::new())
    }

    pub async fn post_calculate(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }
}
