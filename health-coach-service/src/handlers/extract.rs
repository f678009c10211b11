use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::models::MessageResponse;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body!";

/// `Json` extractor whose rejection uses the API's `{ "message": ... }` shape
/// instead of axum's plain-text body.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Rejected request body");
            (
                StatusCode::BAD_REQUEST,
                Json(MessageResponse::new(INVALID_BODY_MESSAGE)),
            )
                .into_response()
        })?;

        Ok(ApiJson(value))
    }
}
