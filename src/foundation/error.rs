/// Crate-wide result alias.
pub type ChronomapResult<T> = Result<T, ChronomapError>;

/// Error taxonomy for the frame engine.
///
/// Only `ResourceLoad` is fatal, and only at startup: without its input datasets the
/// engine cannot produce any frame. Every other variant is recoverable inside per-frame
/// computation — malformed records are skipped, affected sub-features are omitted for
/// the frame, overflowing panels are truncated.
#[derive(thiserror::Error, Debug)]
pub enum ChronomapError {
    /// Malformed coordinate, date or population string.
    #[error("parse error: {0}")]
    Parse(String),

    /// A record or query result violates a dataset invariant (e.g. `from > to`, or
    /// zero/multiple active boundary rulesets for a year).
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// More items to display in a frame than pre-allocated display slots.
    #[error("pool exhausted: {0}")]
    PoolExhaustion(String),

    /// An external dataset failed to load.
    #[error("resource load error: {0}")]
    ResourceLoad(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChronomapError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    pub fn pool_exhaustion(msg: impl Into<String>) -> Self {
        Self::PoolExhaustion(msg.into())
    }

    pub fn resource_load(msg: impl Into<String>) -> Self {
        Self::ResourceLoad(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(ChronomapError::parse("x").to_string().contains("parse error:"));
        assert!(
            ChronomapError::data_integrity("x")
                .to_string()
                .contains("data integrity error:")
        );
        assert!(
            ChronomapError::pool_exhaustion("x")
                .to_string()
                .contains("pool exhausted:")
        );
        assert!(
            ChronomapError::resource_load("x")
                .to_string()
                .contains("resource load error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ChronomapError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
