pub type FlipbookResult<T> = Result<T, FlipbookError>;

#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("pixel length mismatch in frame {frame}: expected {expected} bytes, got {actual}")]
    PixelLengthMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
