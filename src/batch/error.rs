use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Compositor error: {0}")]
    CompositorError(#[from] crate::compositor::CompositorError),

    #[error("Input path does not exist: {}", .0.display())]
    InputMissing(PathBuf),
}
