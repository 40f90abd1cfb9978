use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}
