//! Manager Extensions
//!
//! Named bundles of methods and properties registered on a manager at
//! runtime, plus the capability traits the web-component managers implement.
//! Callers feature-detect with `has_extension` before calling; calling an
//! absent method is the one failure surfaced as an error.

use super::dom::ElementTreeNode;
use super::notification::{LifecyclePhase, Notification};
use super::style::CssScope;
use crate::error::ManagerError;
use crate::logging::LogLevel;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;
use wc_dom::{Node, ShadowRootMode};

/// Name of the bundle every web-component manager installs on construction
pub const WEB_COMPONENTS_EXTENSION: &str = "web-components";

pub type ExtensionMethod = Rc<dyn Fn(&[Value]) -> Value>;

#[derive(Clone, Default)]
pub struct Extension {
    methods: IndexMap<String, ExtensionMethod>,
    properties: IndexMap<String, Value>,
}

impl Extension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, name: &str, f: impl Fn(&[Value]) -> Value + 'static) -> Self {
        self.methods.insert(name.to_string(), Rc::new(f));
        self
    }

    pub fn property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Merge `other` in; its entries win on name clashes
    fn merge(&mut self, other: Extension) {
        self.methods.extend(other.methods);
        self.properties.extend(other.properties);
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("properties", &self.properties)
            .finish()
    }
}

/// Per-manager extension table
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: RefCell<IndexMap<String, Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `extension` under `name`, merging into an existing bundle
    pub fn extend(&self, name: &str, extension: Extension) {
        let mut extensions = self.extensions.borrow_mut();
        match extensions.get_mut(name) {
            Some(existing) => existing.merge(extension),
            None => {
                extensions.insert(name.to_string(), extension);
            }
        }
        debug!(extension = name, "extension registered");
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.borrow().contains_key(name)
    }

    pub fn extension_names(&self) -> Vec<String> {
        self.extensions.borrow().keys().cloned().collect()
    }

    pub fn property(&self, name: &str, property: &str) -> Option<Value> {
        self.extensions
            .borrow()
            .get(name)?
            .get_property(property)
            .cloned()
    }

    pub fn call(&self, name: &str, method: &str, args: &[Value]) -> Result<Value, ManagerError> {
        // Release the borrow before calling so methods may extend the registry
        let f = {
            let extensions = self.extensions.borrow();
            let extension = extensions
                .get(name)
                .ok_or_else(|| ManagerError::ExtensionNotFound(name.to_string()))?;
            extension
                .methods
                .get(method)
                .cloned()
                .ok_or_else(|| ManagerError::NotAFunction {
                    extension: name.to_string(),
                    method: method.to_string(),
                })?
        };
        Ok(f(args))
    }
}

/// Runtime extension surface shared by all managers
pub trait Extensible {
    fn extensions(&self) -> &ExtensionRegistry;

    fn extend(&self, name: &str, extension: Extension) {
        self.extensions().extend(name, extension);
    }

    fn has_extension(&self, name: &str) -> bool {
        self.extensions().has_extension(name)
    }

    fn call_extension(&self, name: &str, method: &str, args: &[Value]) -> Result<Value, ManagerError> {
        self.extensions().call(name, method, args)
    }
}

/// The bundle each web-component manager installs describing itself
pub(crate) fn web_components_extension(manager: &str, capabilities: &[&str]) -> Extension {
    let listed: Vec<Value> = capabilities.iter().map(|c| Value::from(*c)).collect();
    let reported = Value::Array(listed.clone());
    Extension::new()
        .property("version", Value::from(env!("CARGO_PKG_VERSION")))
        .property("manager", Value::from(manager))
        .property("capabilities", Value::Array(listed))
        .method("capabilities", move |_| reported.clone())
}

/// Shadow roots, component registry and debug tree
pub trait DomOps {
    fn create_shadow_root(&self, element: &Node, mode: ShadowRootMode) -> Result<Node, ManagerError>;
    fn register_component(&self, component_id: &str, element: &Node, shadow_root: Option<&Node>);
    fn unregister_component(&self, component_id: &str) -> bool;
    fn get_element_tree(&self, element: &Node, max_depth: Option<usize>) -> ElementTreeNode;
}

/// Component stylesheets and CSS custom properties
pub trait StyleOps {
    fn add_component_styles(
        &self,
        component_id: &str,
        css: &str,
        root: &Node,
        merge: bool,
    ) -> Option<Node>;
    fn remove_component_styles(&self, component_id: &str) -> bool;
    fn set_css_variable(&self, name: &str, value: &str, scope: &CssScope) -> Result<(), ManagerError>;
    fn get_css_variable(&self, name: &str, scope: &CssScope) -> Option<String>;
}

/// Lifecycle and debug reporting
pub trait NotifyOps {
    fn notify_lifecycle(
        &self,
        component_id: &str,
        phase: LifecyclePhase,
        timing: Option<f64>,
        data: Option<Value>,
    ) -> Notification;
    fn show_component_debug(
        &self,
        component_id: &str,
        message: &str,
        level: LogLevel,
        data: Option<Value>,
    ) -> bool;
}
