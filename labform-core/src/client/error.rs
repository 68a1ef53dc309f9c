use thiserror::Error;

/// Errors from submitting or fetching records.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Backend not configured. Add backend.server_url and backend.api_key to config.")]
    NotConfigured,

    #[error("Nothing to submit: every section is empty")]
    Incomplete,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Record not found: {0}")]
    NotFound(String),
}
