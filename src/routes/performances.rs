use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::error::{AppError, CinerinoError};
use crate::models::{HealthResponse, SearchConditions4Pos};
use crate::services::{search_events, EventService};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventService>,
    /// Client id sent upstream as the requesting store
    pub client_id: String,
}

/// Configure performance routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/performances", web::get().to(search_performances));
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search performances endpoint
///
/// GET /performances?page=1&limit=100&day=20240101
/// GET /performances?performanceId={id}
async fn search_performances(
    state: web::Data<AppState>,
    query: web::Query<SearchConditions4Pos>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();

    if let Err(errors) = params.validate() {
        tracing::info!("Validation failed for performance search: {:?}", errors);
        return Err(validation_errors(&errors));
    }

    tracing::info!(
        "Searching performances: page={:?}, limit={:?}, day={:?}, performanceId={:?}",
        params.page,
        params.limit,
        params.day,
        params.performance_id
    );

    let events = search_events(&params, &state.client_id, state.events.as_ref()).await?;

    tracing::info!("Returning {} performances", events.len());

    Ok(HttpResponse::Ok().json(events))
}

/// One argument error per invalid field, in field name order
fn validation_errors(errors: &validator::ValidationErrors) -> AppError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .map(|(field, _)| CinerinoError::argument(field.to_string(), format!("invalid {}", field)))
        .collect::<Vec<_>>()
        .into()
}
