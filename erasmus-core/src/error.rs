use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl Error {
    /// Stable code for log fields and error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::Corruption(_) => "CORRUPTION",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::CompressionError(_) => "COMPRESSION_ERROR",
            Error::DecodeError(_) => "DECODE_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let io = Error::from(io::Error::new(io::ErrorKind::Other, "disk"));
        assert_eq!(io.code(), "IO_ERROR");
        assert_eq!(Error::Corruption("table".into()).code(), "CORRUPTION");
        assert_eq!(Error::DecodeError("bad".into()).code(), "DECODE_ERROR");
    }

    #[test]
    fn test_json_errors_convert() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.code(), "JSON_ERROR");
        assert!(err.to_string().starts_with("JSON error"));
    }
}
