use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GridError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
