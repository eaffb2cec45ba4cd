//! Draft/lifecycle status endpoint.

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use searchboost_core::{ResourceRef, ResourceType};
use searchboost_workflow::StatusReport;

use super::{map_workflow_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

pub(super) async fn get_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((resource_type, resource_id)): Path<(String, u64)>,
) -> Result<Json<ApiResponse<StatusReport>>, ApiError> {
    let kind: ResourceType = resource_type.parse().map_err(|e: String| {
        ApiError::new(req_id.0.clone(), "validation_error", e)
    })?;

    let report = state
        .workflow
        .status(ResourceRef::new(kind, resource_id))
        .await
        .map_err(|e| map_workflow_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}
