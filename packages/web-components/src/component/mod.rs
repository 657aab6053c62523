//! Component Module
//!
//! The base custom element: configuration, the `Component` author trait,
//! the host that drives it, and registration.

pub mod config;
pub mod define;
pub mod host;

pub use config::{ComponentConfig, PropertyDeclaration, PropertyDeclarations};
pub use define::{create, define};
pub use host::{
    Component, ComponentHost, ComponentStateSnapshot, HostHandle, LifecycleState, RenderContext,
};
