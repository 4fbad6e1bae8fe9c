use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JavaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid class file: {0}")]
    ClassFile(String),

    #[error("Runtime image error: {0}")]
    Image(String),

    #[error("Parser error: {0}")]
    Parser(String),
}

pub type Result<T> = std::result::Result<T, JavaError>;

impl From<JavaError> for io::Error {
    fn from(err: JavaError) -> Self {
        match err {
            JavaError::Io(e) => e,
            JavaError::Zip(zip::result::ZipError::FileNotFound) => {
                io::Error::new(io::ErrorKind::NotFound, "archive entry not found")
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}
