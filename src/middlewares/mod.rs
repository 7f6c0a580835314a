// Error translation for HTTP responses
pub mod error_handler;
pub mod not_found;

pub use error_handler::{handle_error, handle_query_payload_error, to_api_error, Outcome, ResponseChannel, ResponseSlot};
pub use not_found::{not_found, not_found_handler};
