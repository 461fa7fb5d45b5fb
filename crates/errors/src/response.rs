//! axum 响应转换

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::AppError;

/// Problem Details 的 Content-Type
pub const PROBLEM_JSON: &str = "application/problem+json";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProblemDetails;

    #[tokio::test]
    async fn test_error_into_response() {
        let response = AppError::database("relation does not exist").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_JSON
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let problem: ProblemDetails = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem.status, 500);
        assert_eq!(problem.title, "Database Error");
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let response = AppError::validation("quantity must be an integer").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
