use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use ownreg_protocol::{ApiResponse, ErrorCode, HealthResponse, DELETED_MESSAGE};
use ownreg_service::{ServiceError, ServiceResult};
use ownreg_types::{Owner, OwnerDraft, OwnerId, OwnerPatch, OwnerProjection};

use crate::state::AppState;

/// A failure rendered as a `{ success: false, message, code }` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiResponse<()>,
}

impl ApiError {
    fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiResponse::failure(code, message),
        }
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Owner not found")
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Transient,
            "Server Error",
        )
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { .. } => {
                Self::new(StatusCode::BAD_REQUEST, ErrorCode::Validation, err.to_string())
            }
            ServiceError::Conflict { .. } => {
                Self::new(StatusCode::BAD_REQUEST, ErrorCode::Conflict, err.to_string())
            }
            ServiceError::NotFound(_) => Self::not_found(),
            ServiceError::Transient(detail) => {
                tracing::error!(%detail, "request failed");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self::new(status, ErrorCode::BadRequest, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Ids that do not parse cannot name a record.
fn parse_id(raw: &str) -> Result<OwnerId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}

/// Run a service call on the blocking pool.
///
/// Service calls take the write section and, with the file backend, write
/// and sync the document; neither belongs on an async worker.
async fn blocking<T, F>(call: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "service task failed");
            Err(ApiError::internal())
        }
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `GET /api/owners`
pub async fn list_owners(State(state): State<AppState>) -> ApiResult<Vec<OwnerProjection>> {
    let reader = state.reader.clone();
    let owners = blocking(move || reader.list()).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(owners))))
}

/// `POST /api/owners`
pub async fn create_owner(
    State(state): State<AppState>,
    payload: Result<Json<OwnerDraft>, JsonRejection>,
) -> ApiResult<Owner> {
    let Json(draft) = payload?;
    let service = state.service.clone();
    let owner = blocking(move || service.create(draft)).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(owner))))
}

/// `PATCH /api/owners/:id`
pub async fn update_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OwnerPatch>, JsonRejection>,
) -> ApiResult<Owner> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let service = state.service.clone();
    let owner = blocking(move || service.update(&id, patch)).await?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(owner))))
}

/// `DELETE /api/owners/:id`
pub async fn delete_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    let service = state.service.clone();
    blocking(move || service.delete(&id)).await?;
    Ok((StatusCode::OK, Json(ApiResponse::done(DELETED_MESSAGE))))
}
