use crate::eval::EvalError;
use crate::namespace::ScriptError;
use thiserror::Error;
use vscode_bridge_proto::ProtoError;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] serde_json::Error),

    #[error("Invalid message: payload is not valid UTF-8 ({0})")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("Unknown command")]
    UnknownCommand(String),

    #[error("missing argument '{name}' for {command}")]
    MissingArgument {
        command: &'static str,
        name: &'static str,
    },

    #[error("'{segment}' not found in '{path}'.")]
    NotFound { segment: String, path: String },

    #[error("Object '{0}' not found.")]
    ObjectNotFound(String),

    #[error("eval is disabled; restart the bridge with --allow-eval")]
    EvalDisabled,

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Registry error: {0}")]
    Registry(#[from] ProtoError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
