/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed channel errors shared across channel traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A channel id is not present in the plugin registry.
    #[error("unknown channel: {channel_id}")]
    UnknownChannel { channel_id: String },

    /// A mode string is not one of the five channel modes.
    #[error("invalid channel mode: {value}")]
    InvalidMode { value: String },
}

impl Error {
    #[must_use]
    pub fn unknown_channel(channel_id: impl std::fmt::Display) -> Self {
        Self::UnknownChannel {
            channel_id: channel_id.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_mode(value: impl std::fmt::Display) -> Self {
        Self::InvalidMode {
            value: value.to_string(),
        }
    }
}
