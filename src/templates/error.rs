use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Template '{0}' already exists, pass overwrite to replace it")]
    AlreadyExists(String),

    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Invalid template: {0}")]
    InvalidConfig(String),
}
