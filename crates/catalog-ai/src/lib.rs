//! Form understanding for the catalog console.
//!
//! Extracts text from an uploaded form PDF, sends it to an
//! OpenAI-compatible chat completion endpoint, and parses the structured
//! [`FormSummary`] that comes back.

pub mod client;
pub mod error;
pub mod pdf;
pub mod prompt;
pub mod summary;

pub use client::{ChatClient, ChatMessage, HttpChatClient};
pub use error::{AiError, Result};
pub use summary::{CoverageSummary, FormSummary, parse_summary, summarize};
