//! Custom Elements
//!
//! Per-thread registry of custom element definitions plus the lifecycle
//! interface the DOM calls into.

use crate::error::{DomError, DomResult};
use crate::node::Node;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::rc::Rc;

static VALID_CUSTOM_ELEMENT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9._]*-[a-z0-9._-]*$").unwrap());

/// Lifecycle reactions invoked by the DOM
pub trait CustomElement {
    /// The host element this instance drives
    fn element(&self) -> Node;

    fn observed_attributes(&self) -> Vec<String> {
        Vec::new()
    }

    fn connected_callback(&self) {}

    fn disconnected_callback(&self) {}

    fn attribute_changed_callback(&self, _name: &str, _old: Option<&str>, _new: Option<&str>) {}
}

pub type ElementConstructor = Rc<dyn Fn() -> Rc<dyn CustomElement>>;

#[derive(Clone)]
pub struct CustomElementDefinition {
    pub name: String,
    pub constructor: ElementConstructor,
}

#[derive(Default)]
pub struct CustomElementRegistry {
    definitions: IndexMap<String, CustomElementDefinition>,
}

thread_local! {
    static REGISTRY: RefCell<CustomElementRegistry> = RefCell::new(CustomElementRegistry::default());
}

pub fn is_valid_custom_element_name(name: &str) -> bool {
    VALID_CUSTOM_ELEMENT_NAME.is_match(name)
}

impl CustomElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against this thread's registry
    pub fn with<R>(f: impl FnOnce(&mut CustomElementRegistry) -> R) -> R {
        REGISTRY.with(|r| f(&mut r.borrow_mut()))
    }

    pub fn define(&mut self, name: &str, constructor: ElementConstructor) -> DomResult<()> {
        if !is_valid_custom_element_name(name) {
            return Err(DomError::InvalidCustomElementName(name.to_string()));
        }
        if self.definitions.contains_key(name) {
            return Err(DomError::AlreadyDefined(name.to_string()));
        }
        self.definitions.insert(
            name.to_string(),
            CustomElementDefinition {
                name: name.to_string(),
                constructor,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<CustomElementDefinition> {
        self.definitions.get(name).cloned()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.definitions.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.definitions.clear();
    }
}

/// Construct a registered custom element. The registry borrow is released
/// before the constructor runs so constructors may consult the registry.
pub fn create_element(name: &str) -> DomResult<Rc<dyn CustomElement>> {
    let definition = CustomElementRegistry::with(|r| r.get(name))
        .ok_or_else(|| DomError::NotDefined(name.to_string()))?;
    let instance = (definition.constructor)();
    instance.element().upgrade(&instance)?;
    Ok(instance)
}
