use std::path::PathBuf;

pub type GifsmithResult<T> = Result<T, GifsmithError>;

#[derive(thiserror::Error, Debug)]
pub enum GifsmithError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("build error: {0}")]
    Build(String),

    #[error("encode error: {0}")]
    Encode(String),

    /// Two artifacts in one batch run hashed to the same content checksum.
    /// This breaks the batch uniqueness guarantee and aborts the run.
    #[error("checksum collision in batch run: {artifact:?} repeats checksum {checksum}")]
    ChecksumCollision { checksum: String, artifact: PathBuf },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifsmithError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn build(msg: impl Into<String>) -> Self {
        Self::Build(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
