//! Error types for form summarization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// The record has no uploaded PDF to read.
    #[error("No form uploaded")]
    NoForm,

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF contains no extractable text")]
    EmptyText,

    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("chat completion request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("chat completion returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("chat completion returned no choices")]
    EmptyResponse,

    #[error("malformed summary: {0}")]
    MalformedSummary(String),
}

impl AiError {
    pub fn is_no_form(&self) -> bool {
        matches!(self, Self::NoForm)
    }
}

pub type Result<T> = std::result::Result<T, AiError>;
