use crate::services::classroom_client::ProviderError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

pub const COURSE_HINT: &str =
    "Pass numeric ID or full Classroom URL (with courseid=... or /c/<token>).";

#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    MissingBody(String),
    UnresolvableCourse(String),
    CourseNotFound(String),
    NotFound(String),
    Conflict(String),
    ProviderError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::MissingBody(_) => write!(f, "Request body is required"),
            AppError::UnresolvableCourse(input) => {
                write!(f, "Unable to resolve courseId from input: {}", input)
            }
            AppError::CourseNotFound(msg) => write!(f, "Course not found: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ProviderError(msg) => write!(f, "Classroom API error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Conflict(msg) => AppError::Conflict(msg),
            ProviderError::NotFound(msg) => AppError::NotFound(msg),
            other => AppError::ProviderError(other.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_)
            | AppError::MissingBody(_)
            | AppError::UnresolvableCourse(_) => StatusCode::BAD_REQUEST,
            AppError::CourseNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ProviderError(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InvalidRequest(msg) => serde_json::json!({ "error": msg }),
            AppError::MissingBody(input) => serde_json::json!({
                "error": "Request body is required",
                "input": input,
                "hint": "Send { \"teacherEmails\": [...], \"studentEmails\": [...] }"
            }),
            AppError::UnresolvableCourse(input) => serde_json::json!({
                "error": "Unable to resolve courseId from input.",
                "input": input,
                "hint": COURSE_HINT
            }),
            AppError::CourseNotFound(details) => serde_json::json!({
                "error": "Course not found. Pass numeric courseId or a valid Classroom URL (not enrollment code).",
                "details": details
            }),
            AppError::NotFound(details) => serde_json::json!({
                "error": "Not found",
                "details": details
            }),
            AppError::Conflict(details) => serde_json::json!({
                "error": "Already exists",
                "details": details
            }),
            AppError::ProviderError(details) => serde_json::json!({
                "error": "Classroom API request failed",
                "details": details
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
