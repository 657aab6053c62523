//! DOM Manager
//!
//! Wraps a base DOM manager with shadow-root creation, cached templates, a
//! debug registry of live components and a single mutation observer.

use super::core::CoreDomManager;
use super::extension::{
    web_components_extension, DomOps, Extensible, ExtensionRegistry, WEB_COMPONENTS_EXTENSION,
};
use crate::error::ManagerError;
use crate::template::{create_template, html};
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;
use tracing::{debug, warn};
use wc_dom::event_loop::now;
use wc_dom::{
    MutationObserver, MutationObserverInit, MutationRecord, Node, NodeType, ShadowRootMode,
    WeakNode,
};

pub const DEFAULT_TREE_DEPTH: usize = 5;

/// Debug record of a registered component
#[derive(Debug, Clone)]
pub struct ComponentRegistration {
    pub id: String,
    pub element: WeakNode,
    pub shadow_root: Option<WeakNode>,
    pub template: Option<Node>,
    pub registered_at: f64,
    pub last_update: Option<f64>,
}

/// Serializable snapshot of an element subtree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTreeNode {
    pub tag_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: IndexMap<String, String>,
    pub has_shadow_root: bool,
    pub children: Vec<ElementTreeNode>,
    /// Children exist past the depth limit
    pub truncated: bool,
}

pub struct WebComponentDomManager {
    base: Rc<dyn CoreDomManager>,
    extensions: ExtensionRegistry,
    component_registry: RefCell<IndexMap<String, ComponentRegistration>>,
    mutation_observer: RefCell<Option<MutationObserver>>,
}

impl WebComponentDomManager {
    pub fn new(base: Rc<dyn CoreDomManager>) -> Self {
        if !base.is_initialized() {
            base.initialize();
        }
        let manager = WebComponentDomManager {
            base,
            extensions: ExtensionRegistry::new(),
            component_registry: RefCell::new(IndexMap::new()),
            mutation_observer: RefCell::new(None),
        };
        manager.extend(
            WEB_COMPONENTS_EXTENSION,
            web_components_extension(
                "dom",
                &["shadowRoot", "templates", "componentRegistry", "elementTree", "mutationObserver"],
            ),
        );
        manager
    }

    pub fn base(&self) -> &Rc<dyn CoreDomManager> {
        &self.base
    }

    /// `<template>` for raw markup, optionally prefixed with a style block
    pub fn create_template(&self, markup: &str, styles: Option<&str>, cache_key: Option<&str>) -> Node {
        let result = html(&[markup], Vec::new());
        create_template(&result, cache_key, styles)
    }

    pub fn get_component(&self, component_id: &str) -> Option<ComponentRegistration> {
        self.component_registry.borrow().get(component_id).cloned()
    }

    pub fn registered_components(&self) -> Vec<String> {
        self.component_registry.borrow().keys().cloned().collect()
    }

    /// Record a render. Returns false for unknown components.
    pub fn touch_component(&self, component_id: &str, template: Option<Node>) -> bool {
        let mut registry = self.component_registry.borrow_mut();
        let Some(registration) = registry.get_mut(component_id) else {
            return false;
        };
        registration.last_update = Some(now());
        if template.is_some() {
            registration.template = template;
        }
        true
    }

    /// Observe `target`, replacing any observer this manager started earlier
    pub fn start_mutation_observer(
        &self,
        target: &Node,
        options: MutationObserverInit,
        callback: impl Fn(&[MutationRecord]) + 'static,
    ) -> MutationObserver {
        self.stop_mutation_observer();
        let observer = MutationObserver::new(move |records, _| callback(records));
        observer.observe(target, options);
        *self.mutation_observer.borrow_mut() = Some(observer.clone());
        observer
    }

    pub fn stop_mutation_observer(&self) -> bool {
        match self.mutation_observer.borrow_mut().take() {
            Some(observer) => {
                observer.disconnect();
                true
            }
            None => false,
        }
    }

    pub fn is_observing(&self) -> bool {
        self.mutation_observer
            .borrow()
            .as_ref()
            .map_or(false, MutationObserver::is_observing)
    }
}

impl DomOps for WebComponentDomManager {
    /// Attaching twice is not an error: the existing root comes back
    fn create_shadow_root(&self, element: &Node, mode: ShadowRootMode) -> Result<Node, ManagerError> {
        if let Some(existing) = element.shadow_root() {
            warn!(tag = ?element.tag_name(), "shadow root already attached; reusing it");
            return Ok(existing);
        }
        Ok(element.attach_shadow(mode)?)
    }

    fn register_component(&self, component_id: &str, element: &Node, shadow_root: Option<&Node>) {
        if let Err(err) = element.set_attribute("data-component-id", component_id) {
            warn!(component = component_id, %err, "could not stamp component id");
        }
        self.base.register_element(component_id, element);
        let registration = ComponentRegistration {
            id: component_id.to_string(),
            element: element.downgrade(),
            shadow_root: shadow_root.map(Node::downgrade),
            template: None,
            registered_at: now(),
            last_update: None,
        };
        self.component_registry
            .borrow_mut()
            .insert(component_id.to_string(), registration);
        debug!(component = component_id, "component registered");
    }

    fn unregister_component(&self, component_id: &str) -> bool {
        let removed = self.component_registry.borrow_mut().shift_remove(component_id);
        self.base.unregister_element(component_id);
        removed.is_some()
    }

    fn get_element_tree(&self, element: &Node, max_depth: Option<usize>) -> ElementTreeNode {
        element_tree(element, 0, max_depth.unwrap_or(DEFAULT_TREE_DEPTH))
    }
}

fn element_tree(element: &Node, depth: usize, max_depth: usize) -> ElementTreeNode {
    let children = element.children();
    let expand = depth < max_depth;
    ElementTreeNode {
        tag_name: element.tag_name().unwrap_or_else(|| match element.node_type() {
            NodeType::ShadowRoot => "#shadow-root".to_string(),
            NodeType::DocumentFragment => "#document-fragment".to_string(),
            NodeType::Document => "#document".to_string(),
            _ => "#node".to_string(),
        }),
        id: element.get_attribute("id"),
        classes: element
            .get_attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default(),
        attributes: element.attributes().into_iter().collect(),
        has_shadow_root: element.shadow_root().is_some(),
        truncated: !expand && !children.is_empty(),
        children: if expand {
            children
                .iter()
                .map(|child| element_tree(child, depth + 1, max_depth))
                .collect()
        } else {
            Vec::new()
        },
    }
}

impl Extensible for WebComponentDomManager {
    fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }
}

impl Deref for WebComponentDomManager {
    type Target = dyn CoreDomManager;

    fn deref(&self) -> &Self::Target {
        self.base.as_ref()
    }
}
