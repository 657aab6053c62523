#![deny(clippy::all)]

//! Host environment for the web-components engine
//!
//! An in-memory DOM with the pieces a custom-element framework leans on:
//! markup parsing and serialization, shadow roots, `<template>` content,
//! events, mutation observers, a custom element registry, and a cooperative
//! event loop with a virtual clock.

pub mod custom_elements;
pub mod document;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod html;
pub mod mutation;
pub mod node;
pub mod promise;

pub use custom_elements::{
    create_element, is_valid_custom_element_name, CustomElement, CustomElementDefinition,
    CustomElementRegistry, ElementConstructor,
};
pub use document::Document;
pub use error::{DomError, DomResult};
pub use event::{Event, EventListener, ListenerId};
pub use event_loop::TimerId;
pub use mutation::{MutationKind, MutationObserver, MutationObserverInit, MutationRecord};
pub use node::{Node, NodeType, ShadowRootMode, WeakNode};
pub use promise::{Promise, PromiseState, Resolver};
