//! Slimify API Library
//!
//! HTTP handlers, application state and setup for the compression server.

mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
mod telemetry;

pub use api_doc::{openapi_spec, ApiDoc};
pub use error::{ErrorResponse, HttpAppError, ProxyError};
pub use state::AppState;
