use thiserror::Error;

#[derive(Debug, Error)]
pub enum TsplibError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub type TsplibResult<T> = std::result::Result<T, TsplibError>;

impl TsplibError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}
