use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Home directory could not be determined")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, ProtoError>;
