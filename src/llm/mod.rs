//! LLM-assisted semantic classification: partition a sheet's entries, build
//! a classification request, send it to an external text-classification
//! service, and parse the response back into structured entries.

pub mod client;
pub mod parser;
pub mod partition;
pub mod prompt;

pub use client::*;
pub use parser::*;
pub use partition::*;
pub use prompt::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("cannot reach classification service at {0}")]
    Connection(String),

    #[error("classification service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed classification response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
