// Route exports
pub mod performances;

use actix_web::web;

pub use performances::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(performances::configure);
}
