//! Cinerino POS API - POS-facing adapter in front of the Cinerino commerce API
//!
//! Screening events and their ticket offers are fetched from Cinerino and
//! reshaped for POS terminals; every failure is answered with a uniform
//! JSON error body.

pub mod config;
pub mod error;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod services;

use actix_web::web;

// Re-export commonly used types
pub use error::{ApiError, AppError, CinerinoError, ErrorKind};
pub use models::{Event4Pos, SearchConditions4Pos, TicketType};
pub use services::{search_events, CinerinoClient, EventService};

/// Register routes, query error handling and the not-found fallback
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(middlewares::handle_query_payload_error))
        .configure(routes::configure_routes)
        .default_service(web::to(middlewares::not_found_handler));
}
