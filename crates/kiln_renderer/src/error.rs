use thiserror::Error;

/// Fatal scene configuration errors raised while building acceleration
/// structures.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Cannot build a BVH over an empty primitive list")]
    EmptyScene,

    #[error("Primitive #{index} ({kind}) has no bounding box")]
    MissingBoundingBox { index: usize, kind: &'static str },
}

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}
