/// Convenience result type used across the workbench.
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;

/// Top-level error taxonomy used by workbench APIs.
#[derive(thiserror::Error, Debug)]
pub enum WorkbenchError {
    /// Invalid operator-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A trait frame could not be exported as an image.
    #[error("export error: {0}")]
    Export(String),

    /// Durable client storage could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),

    /// Any other failure reported by the host document.
    #[error("host error: {0}")]
    Host(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WorkbenchError {
    /// Build a [`WorkbenchError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WorkbenchError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`WorkbenchError::Storage`] value.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`WorkbenchError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`WorkbenchError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for WorkbenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
