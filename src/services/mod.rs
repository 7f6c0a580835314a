// Service exports
pub mod cinerino;
pub mod event;

pub use cinerino::{CinerinoClient, CinerinoCredentials};
pub use event::{EventService, SearchResult, search_events, event_to_event4pos};
