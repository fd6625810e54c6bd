use std::fmt;

use crate::TypeTag;

/// Result type for vitrine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while registering or presenting
#[derive(Debug)]
pub enum Error {
    /// A caller-supplied presenter or resolver callback failed
    Callback(anyhow::Error),

    /// An object reached JSON conversion without being presented
    Unpresented(TypeTag),

    /// JSON conversion failed
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Callback(err) => write!(f, "Callback failed: {}", err),
            Error::Unpresented(tag) => write!(f, "Object of type {} was not presented", tag),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Callback(err) => Some(err.as_ref()),
            Error::Json(err) => Some(err),
            Error::Unpresented(_) => None,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Callback(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
