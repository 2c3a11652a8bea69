//! Reusable TUI widgets.

pub mod input;
pub mod transcript;

pub use input::{QueryInput, QueryInputState};
pub use transcript::TranscriptPane;
