use axum::{extract::State, Json};
use std::time::Instant;

use super::extract::ApiJson;
use crate::models::{AnalysisRequest, AnalysisResult, MessageResponse};
use crate::services::{
    build_prompt, record_analysis_outcome, record_generation, validate_email,
};
use crate::startup::AppState;
use service_core::error::AppError;

pub const SUCCESS_MESSAGE: &str = "Email sent successfully!";

/// `POST /calculate`: validate the email, generate the analysis, mail it.
///
/// The response is 200 once generation succeeds, whatever happens to the
/// email afterwards.
#[tracing::instrument(skip(state, request))]
pub async fn calculate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalysisRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    tracing::info!(
        email = ?request.email,
        kind = ?request.kind,
        "Received analysis request"
    );

    let email = validate_email(request.email.as_deref()).map_err(|e| {
        record_analysis_outcome("rejected");
        tracing::info!(reason = %e, "Analysis request rejected");
        e
    })?;

    let prompt = build_prompt(&request.inputs);

    let started = Instant::now();
    let generated = state.generator.generate(&prompt).await;
    let provider = state.generator.name();

    let analysis = match generated {
        Ok(text) => {
            record_generation(provider, "success", started.elapsed());
            AnalysisResult::new(text)
        }
        Err(e) => {
            record_generation(provider, e.kind(), started.elapsed());
            record_analysis_outcome("generation_failed");
            tracing::error!(provider, error = %e, "Analysis generation failed");
            return Err(e.into());
        }
    };

    state.notifier.notify(email, &analysis.text).await;

    record_analysis_outcome("completed");
    Ok(Json(MessageResponse::new(SUCCESS_MESSAGE)))
}
