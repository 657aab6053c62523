//! Style Manager
//!
//! One `<style data-component-id>` element per component, CSS custom
//! properties at global / component / element scope, and named themes.

use super::core::CoreStyleManager;
use super::css;
use super::extension::{
    web_components_extension, Extensible, ExtensionRegistry, StyleOps, WEB_COMPONENTS_EXTENSION,
};
use crate::error::ManagerError;
use crate::util::normalize_css_variable_name;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use std::str::FromStr;
use tracing::{debug, warn};
use wc_dom::event_loop::now;
use wc_dom::{Document, Node, NodeType, WeakNode};

pub type Theme = IndexMap<String, String>;

/// Where a CSS variable lives
#[derive(Debug, Clone, PartialEq)]
pub enum CssScope {
    /// The document element
    Global,
    /// A registered component's host element
    Component(String),
    Element(Node),
}

impl FromStr for CssScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "global" {
            return Ok(CssScope::Global);
        }
        match s.strip_prefix("component:") {
            Some(id) if !id.is_empty() => Ok(CssScope::Component(id.to_string())),
            _ => Err(format!("invalid CSS scope \"{}\"", s)),
        }
    }
}

impl fmt::Display for CssScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssScope::Global => f.write_str("global"),
            CssScope::Component(id) => write!(f, "component:{}", id),
            CssScope::Element(node) => write!(f, "element:{}", node.tag_name().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentStyleRegistration {
    pub component_id: String,
    pub root: WeakNode,
    pub style_element: Option<Node>,
    pub css_variables: IndexMap<String, String>,
    pub theme: Option<String>,
    pub registered_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStyleInfo {
    pub component_id: String,
    pub has_style_element: bool,
    pub css_length: usize,
    pub css_variables: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub registered_at: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDebugInfo {
    pub component_count: usize,
    pub components: Vec<ComponentStyleInfo>,
    pub themes: Vec<String>,
}

pub struct WebComponentStyleManager {
    base: Rc<dyn CoreStyleManager>,
    extensions: ExtensionRegistry,
    registrations: RefCell<IndexMap<String, ComponentStyleRegistration>>,
    themes: RefCell<IndexMap<String, Theme>>,
}

impl WebComponentStyleManager {
    pub fn new(base: Rc<dyn CoreStyleManager>) -> Self {
        if !base.is_initialized() {
            base.initialize();
        }
        let manager = WebComponentStyleManager {
            base,
            extensions: ExtensionRegistry::new(),
            registrations: RefCell::new(IndexMap::new()),
            themes: RefCell::new(IndexMap::new()),
        };
        manager.extend(
            WEB_COMPONENTS_EXTENSION,
            web_components_extension(
                "style",
                &["componentStyles", "cssVariables", "themes", "generateCss", "scopeCss"],
            ),
        );
        manager
    }

    pub fn base(&self) -> &Rc<dyn CoreStyleManager> {
        &self.base
    }

    pub fn get_component_styles(&self, component_id: &str) -> Option<ComponentStyleRegistration> {
        self.registrations.borrow().get(component_id).cloned()
    }

    pub fn register_theme(&self, name: &str, theme: Theme) {
        self.themes.borrow_mut().insert(name.to_string(), theme);
    }

    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.borrow().contains_key(name)
    }

    /// Set every variable of a registered theme on `scope`
    pub fn apply_theme(&self, name: &str, scope: &CssScope) -> Result<(), ManagerError> {
        let theme = self
            .themes
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| ManagerError::UnknownTheme(name.to_string()))?;
        for (variable, value) in &theme {
            self.set_css_variable(variable, value, scope)?;
        }
        if let CssScope::Component(id) = scope {
            if let Some(registration) = self.registrations.borrow_mut().get_mut(id) {
                registration.theme = Some(name.to_string());
            }
        }
        debug!(theme = name, %scope, "theme applied");
        Ok(())
    }

    pub fn generate_css(&self, style: &Value, selector: Option<&str>) -> String {
        css::generate_css(style, selector.unwrap_or(":host"))
    }

    pub fn scope_css(&self, css: &str, component_id: &str) -> String {
        css::scope_css(css, component_id)
    }

    pub fn get_style_debug_info(&self) -> StyleDebugInfo {
        let registrations = self.registrations.borrow();
        StyleDebugInfo {
            component_count: registrations.len(),
            components: registrations
                .values()
                .map(|registration| ComponentStyleInfo {
                    component_id: registration.component_id.clone(),
                    has_style_element: registration.style_element.is_some(),
                    css_length: registration
                        .style_element
                        .as_ref()
                        .map_or(0, |style| style.text_content().len()),
                    css_variables: registration.css_variables.clone(),
                    theme: registration.theme.clone(),
                    registered_at: registration.registered_at,
                })
                .collect(),
            themes: self.themes.borrow().keys().cloned().collect(),
        }
    }

    fn resolve_scope(&self, scope: &CssScope) -> Result<Node, ManagerError> {
        match scope {
            CssScope::Global => Ok(Document::current().document_element().clone()),
            CssScope::Element(node) => Ok(node.clone()),
            CssScope::Component(id) => {
                let root = self
                    .registrations
                    .borrow()
                    .get(id)
                    .and_then(|registration| registration.root.upgrade())
                    .ok_or_else(|| ManagerError::UnknownComponent(id.clone()))?;
                // Variables go on the host so they inherit into the shadow tree
                Ok(match root.node_type() {
                    NodeType::ShadowRoot => root.host().unwrap_or(root),
                    _ => root,
                })
            }
        }
    }
}

impl StyleOps for WebComponentStyleManager {
    /// Create or reuse the component's `<style>` as the first child of
    /// `root`. `merge` appends to the existing text instead of replacing it.
    fn add_component_styles(
        &self,
        component_id: &str,
        css: &str,
        root: &Node,
        merge: bool,
    ) -> Option<Node> {
        let existing = self
            .registrations
            .borrow()
            .get(component_id)
            .and_then(|registration| registration.style_element.clone());

        let style = match existing {
            Some(style) => style,
            None => {
                let style = Node::new_element("style");
                if let Err(err) = style.set_attribute("data-component-id", component_id) {
                    warn!(component = component_id, %err, "could not tag style element");
                }
                style
            }
        };

        let previous = style.text_content();
        let text = if merge && !previous.is_empty() {
            format!("{}\n{}", previous, css)
        } else {
            css.to_string()
        };
        style.set_text_content(&text);

        let attached = style.parent().map_or(false, |parent| parent.ptr_eq(root));
        if !attached {
            let first = root.first_child();
            if let Err(err) = root.insert_before(&style, first.as_ref()) {
                warn!(component = component_id, %err, "could not attach component styles");
                return None;
            }
        }

        let mut registrations = self.registrations.borrow_mut();
        let registration = registrations
            .entry(component_id.to_string())
            .or_insert_with(|| ComponentStyleRegistration {
                component_id: component_id.to_string(),
                root: root.downgrade(),
                style_element: None,
                css_variables: IndexMap::new(),
                theme: None,
                registered_at: now(),
            });
        registration.root = root.downgrade();
        registration.style_element = Some(style.clone());
        Some(style)
    }

    fn remove_component_styles(&self, component_id: &str) -> bool {
        let removed = self.registrations.borrow_mut().shift_remove(component_id);
        match removed {
            Some(registration) => {
                if let Some(style) = registration.style_element {
                    style.remove();
                }
                true
            }
            None => false,
        }
    }

    fn set_css_variable(&self, name: &str, value: &str, scope: &CssScope) -> Result<(), ManagerError> {
        let name = normalize_css_variable_name(name);
        let target = self.resolve_scope(scope)?;
        target.set_style_property(&name, value)?;
        if let CssScope::Component(id) = scope {
            if let Some(registration) = self.registrations.borrow_mut().get_mut(id) {
                registration.css_variables.insert(name, value.to_string());
            }
        }
        Ok(())
    }

    fn get_css_variable(&self, name: &str, scope: &CssScope) -> Option<String> {
        let target = self.resolve_scope(scope).ok()?;
        target.get_style_property(&normalize_css_variable_name(name))
    }
}

impl Extensible for WebComponentStyleManager {
    fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }
}

impl Deref for WebComponentStyleManager {
    type Target = dyn CoreStyleManager;

    fn deref(&self) -> &Self::Target {
        self.base.as_ref()
    }
}
