use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid input: {message}")]
    Input { message: String },

    #[error("Stats service error for cell {cell}: {message}")]
    Remote { cell: usize, message: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl GridError {
    pub fn input(message: impl Into<String>) -> Self {
        GridError::Input {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for input/config errors caught before any remote
    /// call, 1 for remote and transport failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            GridError::Input { .. } | GridError::InvalidConfigValue { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
