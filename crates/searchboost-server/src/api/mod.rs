mod draft;
mod optimize;
mod rollback;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use searchboost_core::StoreError;
use searchboost_workflow::{Workflow, WorkflowError};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<Workflow>,
    pub shop_domain: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    shop: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_workflow_error(request_id: String, error: &WorkflowError) -> ApiError {
    match error {
        WorkflowError::NotFound(msg) => ApiError::new(request_id, "not_found", msg.clone()),
        WorkflowError::Store(StoreError::NotFound(_)) => {
            ApiError::new(request_id, "not_found", error.to_string())
        }
        WorkflowError::BackupFailed(_) | WorkflowError::Store(_) => {
            tracing::error!(error = %error, "content store operation failed");
            ApiError::new(request_id, "bad_gateway", "content store operation failed")
        }
        WorkflowError::Corrupt { .. } => {
            tracing::error!(error = %error, "stored record unreadable");
            ApiError::new(request_id, "internal_error", "stored record unreadable")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/optimize/draft", post(optimize::save_draft))
        .route("/api/v1/optimize/publish", post(optimize::publish))
        .route(
            "/api/v1/rollback/{resource_type}/{resource_id}",
            post(rollback::rollback),
        )
        .route(
            "/api/v1/draft/{resource_type}/{resource_id}",
            get(draft::get_status),
        )
        // Auth sits outside the limiter so unauthenticated requests cannot
        // drain anyone's window budget.
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            shop: state.shop_domain,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use searchboost_core::memory::{MemoryAuditLog, MemoryStore};
    use searchboost_core::{RawResourceContent, ResourceRef, ResourceType};
    use searchboost_optimizer::Optimizer;

    fn test_state() -> AppState {
        let store = MemoryStore::new();
        store.seed_resource(
            ResourceRef::new(ResourceType::Product, 42),
            RawResourceContent {
                title: "Cast Iron Teapot".to_owned(),
                description: "Cast iron teapot with enamel interior. Holds 900ml.".to_owned(),
                ..RawResourceContent::default()
            },
        );
        let workflow = Workflow::new(
            Arc::new(store),
            Arc::new(MemoryAuditLog::new()),
            Optimizer::mock(),
            "demo.myshopify.com",
        );
        AppState {
            workflow: Arc::new(workflow),
            shop_domain: "demo.myshopify.com".to_owned(),
        }
    }

    fn test_app(auth: AuthState) -> Router {
        build_app(test_state(), auth, default_rate_limit_state())
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    #[tokio::test]
    async fn health_is_public_and_echoes_request_id() {
        let app = test_app(AuthState::with_keys(HashSet::from(["secret".to_owned()])));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-abc")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-request-id").map(|v| v.to_str().ok()),
            Some(Some("req-abc"))
        );
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-abc");
    }

    #[tokio::test]
    async fn draft_then_status_round_trips_over_http() {
        let app = test_app(AuthState::disabled());

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/optimize/draft",
                serde_json::json!({"resourceType": "product", "resourceId": 42}),
            ))
            .await
            .expect("draft response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "draft_saved");
        assert_eq!(json["data"]["result"]["optimizedTitle"], "Cast Iron Teapot");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/draft/product/42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("status response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["hasDraft"], true);
        assert_eq!(json["data"]["hasLive"], false);
        assert_eq!(json["data"]["optimized"], false);
    }

    #[tokio::test]
    async fn publish_without_draft_is_404() {
        let app = test_app(AuthState::disabled());
        let response = app
            .oneshot(json_post(
                "/api/v1/optimize/publish",
                serde_json::json!({"resourceType": "product", "resourceId": 42}),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "no draft content found to publish");
    }

    #[tokio::test]
    async fn rollback_rejects_unknown_versions() {
        let app = test_app(AuthState::disabled());
        let response = app
            .oneshot(json_post(
                "/api/v1/rollback/product/42",
                serde_json::json!({"version": "v3"}),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn unknown_resource_type_is_400() {
        let app = test_app(AuthState::disabled());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/draft/collection/1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token() {
        let auth = AuthState::with_keys(HashSet::from(["secret".to_owned()]));

        let response = test_app(auth.clone())
            .oneshot(json_post(
                "/api/v1/optimize/draft",
                serde_json::json!({"resourceType": "product", "resourceId": 42}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
        assert!(json["meta"]["request_id"].is_string());

        let mut request = json_post(
            "/api/v1/optimize/draft",
            serde_json::json!({"resourceType": "product", "resourceId": 42}),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Bearer secret"),
        );
        let response = test_app(auth)
            .oneshot(request)
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    fn status_get(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/v1/draft/product/42");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn rejected_requests_do_not_consume_rate_limit_budget() {
        let auth = AuthState::with_keys(HashSet::from(["secret".to_owned()]));
        let app = build_app(
            test_state(),
            auth,
            RateLimitState::new(1, Duration::from_secs(60)),
        );

        // No token: rejected before the limiter ever sees the request.
        let response = app
            .clone()
            .oneshot(status_get(None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // The single-request budget must still be available.
        let response = app
            .clone()
            .oneshot(status_get(Some("secret")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(status_get(Some("secret")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "rate_limited");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[tokio::test]
    async fn rate_limit_windows_are_per_token() {
        let auth = AuthState::with_keys(HashSet::from(["alice".to_owned(), "bob".to_owned()]));
        let app = build_app(
            test_state(),
            auth,
            RateLimitState::new(1, Duration::from_secs(60)),
        );

        let response = app
            .clone()
            .oneshot(status_get(Some("alice")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(status_get(Some("alice")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = app
            .oneshot(status_get(Some("bob")))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_lifecycle_over_http() {
        let app = test_app(AuthState::disabled());

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/optimize/draft",
                serde_json::json!({"resourceType": "product", "resourceId": 42}),
            ))
            .await
            .expect("draft");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/optimize/publish",
                serde_json::json!({"resourceType": "product", "resourceId": 42}),
            ))
            .await
            .expect("publish");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_post(
                "/api/v1/rollback/product/42",
                serde_json::json!({"version": "original"}),
            ))
            .await
            .expect("rollback");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["restored"]["title"], "Cast Iron Teapot");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/draft/product/42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("status");
        let json = body_json(response).await;
        assert_eq!(json["data"]["hasDraft"], false);
        assert_eq!(json["data"]["hasLive"], false);
    }
}
