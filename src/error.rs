use thiserror::Error;

pub type DashResult<T> = Result<T, DashError>;

#[derive(Debug, Error)]
pub enum DashError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Transport failure, non-success status, or an upstream error payload.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream payload did not have the expected shape.
    #[error("unexpected payload format: {0}")]
    Format(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashError {
    /// Returns `true` for the failures the home view recovers from with fallback data.
    #[must_use]
    pub fn is_source_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Format(_))
    }
}
