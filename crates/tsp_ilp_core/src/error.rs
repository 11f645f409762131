use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Instance(#[from] tsplib::TsplibError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("model proven infeasible: {0}")]
    Infeasible(String),
    #[error("objective unbounded: {0}")]
    Unbounded(String),
    #[error("solver failure: {0}")]
    Solver(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
