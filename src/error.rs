use sea_orm::DbErr;
use thiserror::Error;

/// Errors raised by the blog schema layer
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the backing store, propagated unmodified
    #[error(transparent)]
    Db(#[from] DbErr),
    /// No route matched the name and arguments given to [`Routes::reverse`](crate::Routes::reverse)
    #[error("Reverse for '{name}' not found: {reason}")]
    NoReverseMatch { name: String, reason: String },
    /// A route pattern could not be parsed
    #[error("Invalid route pattern '{pattern}': {reason}")]
    InvalidRoute { pattern: String, reason: String },
    /// The environment did not describe a usable configuration
    #[error("Config Error: {0}")]
    Config(String),
}

/// Result alias used throughout this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn no_reverse_match(name: &str, reason: impl Into<String>) -> Self {
        Self::NoReverseMatch {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
