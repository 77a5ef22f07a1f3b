use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::{AppState, database, error::Result};

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Ready once the catalog database answers; also reports the image limits
/// the admin console should enforce before uploading.
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse> {
    database::check_health(&state.db).await?;

    let images = state.images.config();

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "database": "connected",
            "images": {
                "maxUploadBytes": images.max_upload_bytes,
                "maxDimension": images.max_dimension,
                "contentType": crate::services::image_service::JPEG_CONTENT_TYPE,
            }
        })),
    ))
}
