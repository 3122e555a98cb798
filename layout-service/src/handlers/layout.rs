use crate::models::{LayoutResponse, PromptRequest};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

/// `POST /api/layout`: turn a prompt into a paragraph.
///
/// Body rejections are answered before the relay runs, so a malformed request
/// never reaches the generation API.
pub async fn generate_layout(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Json<LayoutResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected layout request body");
        AppError::from(rejection)
    })?;

    let paragraph = state.relay.generate(&request.prompt).await?;

    Ok(Json(LayoutResponse { paragraph }))
}
