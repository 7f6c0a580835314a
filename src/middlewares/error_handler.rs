use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::error::{ApiError, AppError, CinerinoError, ErrorKind};
use crate::models::ErrorResponse;

/// Where an error response gets written
pub trait ResponseChannel {
    /// Whether a response has already been committed on this channel
    fn headers_sent(&self) -> bool;

    fn send(&mut self, status: StatusCode, body: ErrorResponse);
}

/// What the error handler did with an error
#[derive(Debug)]
pub enum Outcome {
    /// An error response was written
    Responded,
    /// A response was already committed; the error is handed on untouched
    Forwarded(AppError),
}

/// Translate any handler failure into the uniform API error
pub fn to_api_error(err: AppError) -> ApiError {
    match err {
        AppError::Api(api_error) => api_error,
        AppError::CinerinoErrors(errors) => {
            // Several errors can come back at once; the first one decides the status
            let status = errors
                .first()
                .map_or(StatusCode::BAD_REQUEST, CinerinoError::status_code);
            ApiError::new(status, errors)
        }
        AppError::Cinerino(error) => ApiError::new(error.status_code(), vec![error]),
        AppError::Internal(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            vec![CinerinoError::new(ErrorKind::InternalServerError, message)],
        ),
    }
}

/// Write `err` to `channel` unless a response is already on its way
pub fn handle_error<C: ResponseChannel>(err: AppError, channel: &mut C) -> Outcome {
    tracing::debug!("handling err... {:?}", err);

    if channel.headers_sent() {
        return Outcome::Forwarded(err);
    }

    let api_error = to_api_error(err);
    let status = api_error.status();

    if status.is_server_error() {
        tracing::error!(code = api_error.code, "{}", api_error.message);
    }

    channel.send(status, ErrorResponse { error: api_error });

    Outcome::Responded
}

/// One-shot channel backed by an actix response
#[derive(Default)]
pub struct ResponseSlot {
    response: Option<HttpResponse>,
}

impl ResponseSlot {
    pub fn into_response(self) -> HttpResponse {
        self.response
            .unwrap_or_else(|| HttpResponse::InternalServerError().finish())
    }
}

impl ResponseChannel for ResponseSlot {
    fn headers_sent(&self) -> bool {
        self.response.is_some()
    }

    fn send(&mut self, status: StatusCode, body: ErrorResponse) {
        self.response = Some(HttpResponse::build(status).json(body));
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        to_api_error(self.clone()).status()
    }

    fn error_response(&self) -> HttpResponse {
        let mut slot = ResponseSlot::default();

        if let Outcome::Forwarded(err) = handle_error(self.clone(), &mut slot) {
            tracing::warn!("Error after response was committed: {}", err);
        }

        slot.into_response()
    }
}

/// Handle malformed query strings
pub fn handle_query_payload_error(
    err: actix_web::error::QueryPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    AppError::from(CinerinoError::argument("query", format!("Invalid query: {}", err))).into()
}
