//! Conversation state for the job search assistant.
//!
//! This module provides the types for a chat transcript and the
//! [`Conversation`] controller that turns submitted text into transcript
//! entries and applies exactly one reply per request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Text the user submitted.
    User,
    /// A successful reply from the prediction service.
    Agent,
    /// A failure surfaced to the user in place of a reply.
    Error,
}

/// A single message in a conversation.
///
/// Messages are immutable once created; the transcript is append-only and
/// insertion order is display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Message content.
    pub text: String,
    /// Timestamp of the message.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new agent message.
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new error message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            role: Role::Error,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Whether a prediction request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// No request in flight; submissions are accepted.
    #[default]
    Idle,
    /// Exactly one request is in flight; submissions are rejected.
    Pending,
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// Settlement value for one outstanding request.
///
/// Every accepted submission produces exactly one `Reply`, by any path:
/// a successful prediction, an application-level error from the service,
/// or a transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The service answered; text of the answer.
    Agent(String),
    /// The request failed; text to surface to the user.
    Error(String),
}

impl Reply {
    /// Convert the reply into its transcript message.
    pub fn into_message(self) -> Message {
        match self {
            Self::Agent(text) => Message::agent(text),
            Self::Error(text) => Message::error(text),
        }
    }

    /// Whether this reply represents a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The reply text.
    pub fn text(&self) -> &str {
        match self {
            Self::Agent(text) | Self::Error(text) => text,
        }
    }
}

/// Outcome of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The submission was accepted; the caller must invoke the prediction
    /// service with `query` and settle the conversation with the result.
    Accepted {
        /// The text to send to the prediction service.
        query: String,
    },
    /// The text was blank after trimming; nothing changed.
    Ignored,
}

/// Errors that can occur when submitting.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A request is already outstanding. The input surface is expected to
    /// prevent this by disabling submission while pending; the controller
    /// rejects it again rather than queuing.
    #[error("a prediction request is already pending")]
    RequestPending,
}

/// Controller owning transcript, draft, and in-flight-request state.
///
/// State machine: `Idle -> Pending` on an accepted [`submit`], and
/// `Pending -> Idle` unconditionally once the outstanding request settles
/// via [`settle`]. There is no retry, timeout, or cancellation; a request
/// runs to completion or failure and both paths are terminal.
///
/// [`submit`]: Conversation::submit
/// [`settle`]: Conversation::settle
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    draft: String,
    request_state: RequestState,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// The transcript, in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The current uncommitted input text.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The current request state.
    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    /// Whether a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.request_state == RequestState::Pending
    }

    /// Set the draft text unconditionally. Always permitted, including
    /// while a request is pending.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Submit text for prediction.
    ///
    /// Blank text (after trimming) is silently ignored. A submission while
    /// a request is pending is rejected. An accepted submission appends a
    /// user message, clears the draft, and transitions to
    /// [`RequestState::Pending`]; the caller then invokes the prediction
    /// service and must call [`Conversation::settle`] with the outcome.
    pub fn submit(&mut self, raw_text: &str) -> Result<Submission, SubmitError> {
        if raw_text.trim().is_empty() {
            return Ok(Submission::Ignored);
        }
        if self.is_pending() {
            return Err(SubmitError::RequestPending);
        }

        self.messages.push(Message::user(raw_text));
        self.draft.clear();
        self.request_state = RequestState::Pending;

        Ok(Submission::Accepted {
            query: raw_text.to_string(),
        })
    }

    /// Settle the outstanding request with a reply.
    ///
    /// Appends exactly one agent-or-error message and returns to
    /// [`RequestState::Idle`]. Settling with no request outstanding is a
    /// driver bug; it is logged and ignored rather than appending an
    /// unmatched reply.
    pub fn settle(&mut self, reply: Reply) {
        if !self.is_pending() {
            tracing::warn!("settle called with no pending request; reply dropped");
            return;
        }
        self.messages.push(reply.into_message());
        self.request_state = RequestState::Idle;
    }
}
