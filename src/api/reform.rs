use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};

use crate::error::ApiError;
use crate::models::{ReformSettings, SettingsOverrides};
use crate::server::AppState;
use crate::services::ReformSummary;

/// Reform an uploaded image
///
/// The request body is the encoded image (PNG, JPEG, BMP or GIF). Query
/// parameters (`depth`, `dither`, `width`, `height`, `prefix`, `style`)
/// override the configured defaults for this request.
pub async fn handle_reform(
    State(state): State<AppState>,
    query: Result<Query<SettingsOverrides>, QueryRejection>,
    body: Bytes,
) -> Result<Json<ReformSummary>, ApiError> {
    let Query(overrides) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let settings = ReformSettings::resolve(&state.config, &overrides)?;

    tracing::info!(
        bytes = body.len(),
        depth = %settings.depth,
        prefix = %settings.prefix,
        "Reform requested"
    );

    let output = state.reformer.run(body.to_vec(), settings).await?;
    Ok(Json(output.summary()))
}
