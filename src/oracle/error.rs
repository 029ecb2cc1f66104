use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("oracle call timed out")]
    Timeout,

    #[error("oracle returned an empty completion")]
    EmptyResponse,

    #[error("oracle credentials not configured")]
    MissingCredentials,
}
