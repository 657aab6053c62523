//! Error Types
//!
//! Lifecycle methods never surface errors; these are for the operations that
//! can genuinely fail (extension calls, definition, configuration, render).

use thiserror::Error;
use wc_dom::DomError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManagerError {
    #[error("extension \"{0}\" is not registered")]
    ExtensionNotFound(String),

    #[error("{extension}.{method} is not a function")]
    NotAFunction { extension: String, method: String },

    #[error("core library unavailable: {0}")]
    CoreUnavailable(String),

    #[error("component \"{0}\" is not registered")]
    UnknownComponent(String),

    #[error("theme \"{0}\" is not registered")]
    UnknownTheme(String),

    #[error(transparent)]
    Dom(#[from] DomError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComponentError {
    #[error("invalid component config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Manager(#[from] ManagerError),
}

/// Returned by `Component::render`; caught at the render boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("{0}")]
    Message(String),

    #[error("required property \"{0}\" is missing")]
    MissingProperty(String),
}

impl RenderError {
    pub fn msg(message: impl Into<String>) -> Self {
        RenderError::Message(message.into())
    }
}
