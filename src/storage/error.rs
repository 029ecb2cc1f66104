use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("blob store returned status {status} for {container}/{name}")]
    Api {
        status: u16,
        container: String,
        name: String,
    },

    #[error("blob {container}/{name} not found")]
    NotFound { container: String, name: String },

    #[error("blob store authentication not configured")]
    Auth,
}
