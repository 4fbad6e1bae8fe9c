#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid artifact location: {0}")]
    InvalidLocation(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
