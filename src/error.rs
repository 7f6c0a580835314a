use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category carried by a Cinerino error in its `reason` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    AlreadyInUse,
    RateLimitExceeded,
    NotImplemented,
    ServiceUnavailable,
    Argument,
    ArgumentNull,
    InternalServerError,
    /// Generic or unrecognized reason
    #[serde(other)]
    Cinerino,
}

impl ErrorKind {
    /// HTTP status a failure of this kind is reported with
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyInUse => StatusCode::CONFLICT,
            ErrorKind::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::NotImplemented => StatusCode::BAD_GATEWAY,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Argument
            | ErrorKind::ArgumentNull
            | ErrorKind::InternalServerError
            | ErrorKind::Cinerino => StatusCode::BAD_REQUEST,
        }
    }
}

/// A single error as reported by the Cinerino API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct CinerinoError {
    #[serde(default = "default_error_name")]
    pub name: String,
    #[serde(default = "default_error_reason")]
    pub reason: ErrorKind,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "argumentName", default, skip_serializing_if = "Option::is_none")]
    pub argument_name: Option<String>,
}

fn default_error_name() -> String { "CinerinoError".to_string() }
fn default_error_reason() -> ErrorKind { ErrorKind::Cinerino }

impl CinerinoError {
    pub fn new(reason: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            name: default_error_name(),
            reason,
            message: message.into(),
            argument_name: None,
        }
    }

    /// Invalid request argument, reported against `argument_name`
    pub fn argument(argument_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            argument_name: Some(argument_name.into()),
            ..Self::new(ErrorKind::Argument, message)
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.reason.status_code()
    }
}

/// Uniform error returned to API callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub errors: Vec<CinerinoError>,
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(code: StatusCode, errors: Vec<CinerinoError>) -> Self {
        let message = join_messages(&errors);

        Self {
            errors,
            code: code.as_u16(),
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Everything a request handler can fail with
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cinerino(#[from] CinerinoError),

    #[error("{}", join_messages(.0))]
    CinerinoErrors(Vec<CinerinoError>),

    #[error("{0}")]
    Internal(String),
}

impl From<Vec<CinerinoError>> for AppError {
    fn from(errors: Vec<CinerinoError>) -> Self {
        AppError::CinerinoErrors(errors)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

fn join_messages(errors: &[CinerinoError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
