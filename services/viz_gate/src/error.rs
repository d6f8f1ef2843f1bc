//! HTTP boundary error: every recoverable failure is a 400 with a plain-text
//! message body.

use crate::service::ServiceError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::warn;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn bad_request(code: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: msg.into(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = match &err {
            ServiceError::Spec { .. } => "invalid_spec",
            ServiceError::InlineData(_) => "invalid_data",
            ServiceError::ReadData { .. } => "unreadable_data",
            ServiceError::ReadSpec { .. } => "unreadable_spec",
            ServiceError::MatchData(_) => "unreadable_match_data",
            ServiceError::Match(_) => "match_failed",
            ServiceError::MissingParam(_) => "missing_parameter",
        };
        warn!(code, error = ?err, "request rejected");
        AppError::bad_request(code, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_engine::Action;

    #[test]
    fn every_service_error_is_a_bad_request() {
        let spec_err = Action::parse("x(").unwrap_err();
        let errs = vec![
            ServiceError::Spec {
                spec: "x(".into(),
                source: spec_err,
            },
            ServiceError::MissingParam("src"),
        ];
        for e in errs {
            let app: AppError = e.into();
            assert_eq!(app.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn response_is_plain_text() {
        let resp = AppError::bad_request("missing_parameter", "missing required parameter: src")
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn display_includes_status_and_code() {
        let e = AppError::bad_request("invalid_spec", "Could not execute spec: x(: boom");
        assert_eq!(e.to_string(), "[400] invalid_spec: Could not execute spec: x(: boom");
    }
}
