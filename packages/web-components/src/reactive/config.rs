//! Reactive Property Configuration

use crate::util::camel_case_to_dash_case;
use crate::value::PropType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

pub type Validator = Rc<dyn Fn(&Value) -> bool>;
pub type Transform = Rc<dyn Fn(Value) -> Value>;
/// Called with `(new, old)` after a write changed the value
pub type ChangeCallback = Rc<dyn Fn(&Value, &Value)>;
pub type ComputeFn = Rc<dyn Fn(&[Value]) -> Value>;

/// Which attribute, if any, mirrors a property.
///
/// Deserializes from `false` / `true` / `"attr-name"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawAttributeBinding", into = "RawAttributeBinding")]
pub enum AttributeBinding {
    #[default]
    Disabled,
    /// The property name in dash-case
    Reflect,
    Named(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawAttributeBinding {
    Flag(bool),
    Name(String),
}

impl From<RawAttributeBinding> for AttributeBinding {
    fn from(raw: RawAttributeBinding) -> Self {
        match raw {
            RawAttributeBinding::Flag(false) => AttributeBinding::Disabled,
            RawAttributeBinding::Flag(true) => AttributeBinding::Reflect,
            RawAttributeBinding::Name(name) => AttributeBinding::Named(name),
        }
    }
}

impl From<AttributeBinding> for RawAttributeBinding {
    fn from(binding: AttributeBinding) -> Self {
        match binding {
            AttributeBinding::Disabled => RawAttributeBinding::Flag(false),
            AttributeBinding::Reflect => RawAttributeBinding::Flag(true),
            AttributeBinding::Named(name) => RawAttributeBinding::Name(name),
        }
    }
}

impl From<&str> for AttributeBinding {
    fn from(name: &str) -> Self {
        AttributeBinding::Named(name.to_string())
    }
}

impl From<bool> for AttributeBinding {
    fn from(flag: bool) -> Self {
        RawAttributeBinding::Flag(flag).into()
    }
}

impl AttributeBinding {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AttributeBinding::Disabled)
    }

    pub fn attribute_name(&self, property: &str) -> Option<String> {
        match self {
            AttributeBinding::Disabled => None,
            AttributeBinding::Reflect => Some(camel_case_to_dash_case(property)),
            AttributeBinding::Named(name) => Some(name.to_ascii_lowercase()),
        }
    }
}

/// Per-property behavior. Installed once and never mutated afterwards.
#[derive(Clone, Default)]
pub struct ReactivePropertyConfig {
    pub initial_value: Value,
    pub attribute: AttributeBinding,
    pub prop_type: Option<PropType>,
    pub validator: Option<Validator>,
    /// Applied to accepted writes before type coercion
    pub transform: Option<Transform>,
    pub on_change: Option<ChangeCallback>,
    pub sync: bool,
}

impl ReactivePropertyConfig {
    pub fn new(initial_value: Value) -> Self {
        ReactivePropertyConfig {
            initial_value,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, prop_type: PropType) -> Self {
        self.prop_type = Some(prop_type);
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<AttributeBinding>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_validator(mut self, validator: impl Fn(&Value) -> bool + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    pub fn with_transform(mut self, transform: impl Fn(Value) -> Value + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    pub fn with_on_change(mut self, on_change: impl Fn(&Value, &Value) + 'static) -> Self {
        self.on_change = Some(Rc::new(on_change));
        self
    }

    pub(crate) fn synced_attribute(&self, property: &str) -> Option<String> {
        if self.sync {
            self.attribute.attribute_name(property)
        } else {
            None
        }
    }
}

impl fmt::Debug for ReactivePropertyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactivePropertyConfig")
            .field("initial_value", &self.initial_value)
            .field("attribute", &self.attribute)
            .field("prop_type", &self.prop_type)
            .field("validator", &self.validator.is_some())
            .field("transform", &self.transform.is_some())
            .field("on_change", &self.on_change.is_some())
            .field("sync", &self.sync)
            .finish()
    }
}

/// Debounce settings for update flushing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    /// Milliseconds between the first queued update and the flush
    pub debounce_time: f64,
    /// Pending keys that force an early flush
    pub max_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            debounce_time: 16.0,
            max_batch_size: 100,
        }
    }
}
