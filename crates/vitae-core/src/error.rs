use thiserror::Error;

#[derive(Debug, Error)]
pub enum VitaeError {
    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("TOKEN environment variable is not set")]
    MissingToken,

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("graphql error: {0}")]
    GraphQl(String),

    #[error("unexpected api response shape: {0}")]
    ResponseShape(String),

    #[error("document conflict on '{path}': remote content changed since fetch")]
    DocumentConflict { path: String },

    #[error("invalid statistics record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VitaeError>;
