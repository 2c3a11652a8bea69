//! jobsearch-engine: conversation engine for the job search assistant
//!
//! This crate provides the headless core of the client, including:
//! - The conversation controller (transcript, draft, request state)
//! - The HTTP client for the external prediction service
//! - Configuration loading and saving
//! - Session persistence and transcript export

pub mod config;
pub mod conversation;
pub mod predict;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use conversation::{
    Conversation, Message, Reply, RequestState, Role, Submission, SubmitError,
};
pub use predict::{
    fetch_reply, PredictClient, PredictError, PredictService, CONNECT_FALLBACK,
    UNKNOWN_ERROR_FALLBACK,
};
pub use session::{Session, SessionError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
