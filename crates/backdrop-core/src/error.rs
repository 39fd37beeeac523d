use thiserror::Error;

/// Reasons a capability probe could not complete.
///
/// None of these are fatal: the scorer falls back to a conservative profile.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProbeError {
    #[error("no graphics context could be created")]
    ContextUnavailable,
    #[error("graphics limit query failed: {0}")]
    LimitQuery(String),
    #[error("extension query failed: {0}")]
    ExtensionQuery(String),
}

/// A configuration override that could not be applied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Internal failure while computing a new settings target.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdjustError {
    #[error("non-finite value computed for `{0}`")]
    NonFinite(&'static str),
}
