use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource chain must declare at least one resource")]
    EmptyChain,

    #[error("resource chain contains a blank resource kind")]
    BlankKind,

    #[error("resource '{0}' is declared more than once")]
    DuplicateKind(String),

    #[error("invalid override for '{kind}': {reason}")]
    InvalidOverride { kind: String, reason: String },

    #[error("'{name}' is used by both '{first}' and '{second}'")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("resource '{0}' is not active for this request")]
    InactiveResource(String),

    #[error("resource '{0}' is not declared on this controller")]
    UnknownKind(String),

    #[error("no accessor named '{0}'")]
    UnknownAccessor(String),

    #[error("no route helper named '{0}'")]
    UnknownHelper(String),

    #[error("resource '{0}' could not be found while building a route")]
    MissingObject(String),

    #[error("backing store error: {0}")]
    Store(String),

    #[error("route error: {0}")]
    Route(String),
}

impl ResourceError {
    /// Errors raised while declaring a controller; fatal to setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ResourceError::EmptyChain
                | ResourceError::BlankKind
                | ResourceError::DuplicateKind(_)
                | ResourceError::InvalidOverride { .. }
                | ResourceError::NameCollision { .. }
                | ResourceError::InvalidFormat(_)
        )
    }

    /// Errors caused by asking for something the current request does not
    /// have in scope. These indicate a caller defect, not bad user input.
    pub fn is_request_state(&self) -> bool {
        matches!(
            self,
            ResourceError::InactiveResource(_)
                | ResourceError::UnknownKind(_)
                | ResourceError::UnknownAccessor(_)
                | ResourceError::UnknownHelper(_)
                | ResourceError::MissingObject(_)
        )
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        ResourceError::InvalidFormat(err.to_string())
    }
}
