use modscope_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),
    #[error("Invalid project layout: {0}")]
    Layout(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, ModscopeError>;
