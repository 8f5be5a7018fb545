pub mod auth;

pub use auth::{require_api_key, API_KEY_HEADER};
