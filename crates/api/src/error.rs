use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use adapter_core::AdapterError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("适配器错误: {0}")]
    Adapter(#[from] AdapterError),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("资源不存在: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            ApiError::Adapter(err) => {
                let status = match err {
                    AdapterError::SchedulerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    AdapterError::SchedulerInternal(_)
                    | AdapterError::RunCommand(_)
                    | AdapterError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    AdapterError::QosNotFound
                    | AdapterError::UserNotFound(_)
                    | AdapterError::AccountNotFound(_)
                    | AdapterError::AssociationNotFound(_) => StatusCode::NOT_FOUND,
                };
                (
                    status,
                    err.code(),
                    err.to_string(),
                    err.detail().map(|s| s.to_string()),
                )
            }
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("请求参数错误: {msg}"),
                None,
            ),
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("资源不存在: {msg}"),
                None,
            ),
        };

        // detail字段原样携带后端的reason文本
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "detail": detail,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_maps_to_503() {
        let error = ApiError::Adapter(AdapterError::SchedulerUnavailable("conn refused".into()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let error = ApiError::Adapter(AdapterError::SchedulerInternal("boom".into()));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_runcommand_maps_to_500() {
        let error = ApiError::Adapter(AdapterError::RunCommand("exit 1".into()));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_kinds_map_to_404() {
        for err in [
            AdapterError::QosNotFound,
            AdapterError::UserNotFound("u".into()),
            AdapterError::AccountNotFound("a".into()),
            AdapterError::AssociationNotFound("a/u".into()),
        ] {
            let response = ApiError::Adapter(err).into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("缺少user_id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
