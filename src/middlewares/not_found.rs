use actix_web::{http::StatusCode, HttpRequest, HttpResponse};

use crate::error::{ApiError, AppError};

/// Error for a request no route matched
pub fn not_found() -> AppError {
    ApiError::new(StatusCode::NOT_FOUND, vec![]).into()
}

/// Default service answering unmatched routes
pub async fn not_found_handler(req: HttpRequest) -> Result<HttpResponse, AppError> {
    tracing::debug!("No route for {} {}", req.method(), req.path());
    Err(not_found())
}
