/// Result alias that carries the crate error type.
pub type Result<T> = std::result::Result<T, LateralError>;

/// Common error type for the core crate.
///
/// Invalid numeric *values* never surface here; they fall back to defaults
/// per the substitution policy in `settings`. Errors are reserved for things
/// a caller can meaningfully react to: unknown setting keys, an unusable
/// settings store, or a background renderer that could not be brought up.
#[derive(Debug, thiserror::Error)]
pub enum LateralError {
    #[error("unknown setting key: {0}")]
    UnknownSetting(String),
    #[error("settings store: {0}")]
    Store(String),
    #[error("impulse renderer: {0}")]
    Renderer(String),
}

impl LateralError {
    pub fn store<T: Into<String>>(msg: T) -> Self {
        Self::Store(msg.into())
    }
}
