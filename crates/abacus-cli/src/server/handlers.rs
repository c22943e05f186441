use std::sync::Arc;

use abacus_classifiers::data_handling::Dataset;
use abacus_classifiers::{ExperimentResult, ExperimentRunner};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;

const UPLOAD_FIELD: &str = "dataset";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run an experiment on the CSV uploaded in the `dataset` field.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExperimentResult>, ApiError> {
    let Ok(mut multipart) = multipart else {
        return Err(ApiError::BadRequest("No file part".to_string()));
    };

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        // Plain form fields carry no filename and do not count as a file part.
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field.bytes().await?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(ApiError::BadRequest("No file part".to_string()));
    };
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No selected file".to_string()));
    }
    if !file_name.to_lowercase().ends_with(".csv") {
        return Err(ApiError::BadRequest(
            "Invalid file type. Please upload a CSV.".to_string(),
        ));
    }

    log::info!("Received dataset '{}' ({} bytes)", file_name, data.len());

    let config = state.config.model.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let dataset = Dataset::from_bytes(&data)?;
        ExperimentRunner::new(config).run(&dataset)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("experiment worker failed: {}", e)))?;

    Ok(Json(outcome?))
}
