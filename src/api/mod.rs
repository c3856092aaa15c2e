//! HTTP API module for the evaluation engine.
//!
//! This module provides the REST endpoints for submitting evaluations,
//! reading consolidated results, and tracking completion status.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{SubmissionEntry, SubmissionRequest};
pub use response::{ApiError, SubmissionResponse};
pub use state::AppState;
