#![deny(clippy::all)]

//! Web Components
//!
//! A small custom-element framework: a tagged-template style renderer with
//! event binding, reactive properties with attribute sync and batched
//! updates, extensible DOM / style / notification managers, and a base
//! component host tying them together. Runs on the `wc_dom` host
//! environment.

pub mod component;
pub mod error;
pub mod logging;
pub mod managers;
pub mod reactive;
pub mod template;
pub mod util;
pub mod value;

pub use component::{
    create, define, Component, ComponentConfig, ComponentHost, HostHandle, LifecycleState,
    PropertyDeclaration, PropertyDeclarations, RenderContext,
};
pub use error::{ComponentError, ManagerError, RenderError};
pub use logging::LogLevel;
pub use managers::{
    create_web_component_managers, shared_managers, DomOps, Extensible, ManagerBundle,
    ManagerConfig, NotifyOps, StyleOps,
};
pub use reactive::{
    AttributeBinding, BatchConfig, ReactiveManager, ReactivePropertyConfig, SetOutcome,
};
pub use template::{
    css, html, Conditional, Repeat, TemplateMetadata, TemplateResult, TemplateValue,
};
pub use value::PropType;

/// Re-export of the host environment
pub use wc_dom;
