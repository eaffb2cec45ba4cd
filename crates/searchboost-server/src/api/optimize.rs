//! Draft and publish endpoints.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use searchboost_core::{OptimizationSettings, RawResourceContent, ResourceRef, ResourceType};
use searchboost_workflow::{DraftOutcome, PublishOutcome};

use super::{map_workflow_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DraftRequest {
    resource_type: ResourceType,
    resource_id: u64,
    /// When omitted, the current title/body is fetched from the store.
    #[serde(default)]
    content: Option<RawResourceContent>,
    #[serde(default)]
    settings: Option<OptimizationSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PublishRequest {
    resource_type: ResourceType,
    resource_id: u64,
}

pub(super) async fn save_draft(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<ApiResponse<DraftOutcome>>, ApiError> {
    let resource = ResourceRef::new(req.resource_type, req.resource_id);
    let outcome = state
        .workflow
        .save_draft(resource, req.content, req.settings.unwrap_or_default())
        .await
        .map_err(|e| map_workflow_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn publish(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<ApiResponse<PublishOutcome>>, ApiError> {
    let resource = ResourceRef::new(req.resource_type, req.resource_id);
    let outcome = state
        .workflow
        .publish(resource)
        .await
        .map_err(|e| map_workflow_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}
