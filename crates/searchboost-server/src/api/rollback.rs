//! Manual rollback endpoint.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use searchboost_core::{ResourceRef, ResourceType};
use searchboost_workflow::RollbackOutcome;

use super::{map_workflow_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Default, Deserialize)]
pub(super) struct RollbackRequest {
    /// Only `"original"` is restorable; version history is kept for reference.
    #[serde(default)]
    version: Option<String>,
}

pub(super) async fn rollback(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((resource_type, resource_id)): Path<(String, u64)>,
    body: Option<Json<RollbackRequest>>,
) -> Result<Json<ApiResponse<RollbackOutcome>>, ApiError> {
    let kind: ResourceType = resource_type.parse().map_err(|e: String| {
        ApiError::new(req_id.0.clone(), "validation_error", e)
    })?;

    let requested = body.and_then(|Json(req)| req.version);
    if let Some(version) = requested {
        if version != "original" {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                format!("only version \"original\" can be restored, got \"{version}\""),
            ));
        }
    }

    let outcome = state
        .workflow
        .rollback(ResourceRef::new(kind, resource_id))
        .await
        .map_err(|e| map_workflow_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: outcome,
        meta: ResponseMeta::new(req_id.0),
    }))
}
