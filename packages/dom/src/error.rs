//! DOM Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),

    #[error("node is not an element")]
    NotAnElement,

    #[error("node not found")]
    NotFound,

    #[error("invalid attribute name \"{0}\"")]
    InvalidAttributeName(String),

    #[error("element already hosts a shadow root")]
    ShadowRootExists,

    #[error("\"{0}\" is not a valid custom element name")]
    InvalidCustomElementName(String),

    #[error("custom element \"{0}\" has already been defined")]
    AlreadyDefined(String),

    #[error("custom element \"{0}\" is not defined")]
    NotDefined(String),
}

pub type DomResult<T> = Result<T, DomError>;
