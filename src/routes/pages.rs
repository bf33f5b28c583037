//! Page Routes
//!
//! The image pipeline endpoints:
//! - POST /api/analyze-cover — OCR a book cover, return its text as the title
//! - POST /api/process-page — OCR → illustration prompt → render → detect → question
//! - POST /api/regenerate-image — render an edited prompt → detect
//!
//! Each pipeline runs its stages in strict sequence and short-circuits on
//! the first failure; no partial results are returned.

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::diffusion::RenderRequest;
use crate::error::{AppError, Result};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-cover", post(analyze_cover))
        .route("/process-page", post(process_page))
        .route("/regenerate-image", post(regenerate_image))
}

/// Pull the uploaded image out of a multipart request.
async fn read_upload(multipart: &mut Multipart) -> Result<Bytes> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::InvalidInput(format!("malformed multipart payload: {err}")))?
    {
        if field.name() == Some("file") {
            return field
                .bytes()
                .await
                .map_err(|err| AppError::InvalidInput(format!("failed to read uploaded file: {err}")));
        }
    }
    Err(AppError::InvalidInput(
        "multipart payload is missing a `file` field".to_string(),
    ))
}

/// POST /api/analyze-cover
async fn analyze_cover(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let image = read_upload(&mut multipart).await?;
    let title = state.ocr().extract_text(&image).await?;
    Ok(Json(json!({ "title": title })))
}

/// POST /api/process-page
///
/// The full pipeline for one photographed page.
async fn process_page(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let image = read_upload(&mut multipart).await?;

    let ocr_text = state.ocr().extract_text(&image).await?;
    tracing::debug!(chars = ocr_text.len(), "page text extracted");

    let sd_prompt = state.llm().build_render_prompt(&ocr_text).await?;
    tracing::debug!(prompt = %sd_prompt, "illustration prompt built");

    let rendered = state
        .renderer()
        .generate(&RenderRequest::new(sd_prompt.clone()))
        .await?;

    let objects = state.vision().detect_from_path(&rendered.path).await?;
    tracing::debug!(count = objects.len(), "objects detected");

    let ai_question = state.llm().build_reading_question(&ocr_text).await?;

    Ok(Json(json!({
        "ocrText": ocr_text,
        "sd_prompt": sd_prompt,
        "imageUrl": rendered.url,
        "objects": objects,
        "aiQuestion": ai_question,
    })))
}

/// POST /api/regenerate-image
async fn regenerate_image(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>> {
    let prompt = match payload.get("prompt") {
        Some(Value::String(prompt)) if !prompt.is_empty() => prompt.clone(),
        _ => {
            return Err(AppError::InvalidInput(
                "prompt 필드는 문자열로 반드시 포함되어야 합니다.".to_string(),
            ))
        }
    };

    let rendered = state.renderer().generate(&RenderRequest::new(prompt)).await?;
    let objects = state.vision().detect_from_path(&rendered.path).await?;

    Ok(Json(json!({
        "imageUrl": rendered.url,
        "objects": objects,
    })))
}
