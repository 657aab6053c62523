//! Component Configuration
//!
//! Static per-component settings and property declarations. Both are plain
//! serde types so they can be loaded from JSON.

use crate::error::ComponentError;
use crate::reactive::{AttributeBinding, ReactivePropertyConfig, Transform, Validator};
use crate::value::PropType;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use wc_dom::{is_valid_custom_element_name, ShadowRootMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentConfig {
    pub tag_name: String,
    /// `None` renders into the host element itself
    pub shadow_mode: Option<ShadowRootMode>,
    pub style_encapsulation: bool,
    pub enable_reactivity: bool,
    pub debug: bool,
    pub styles: Option<String>,
    pub observed_attributes: Vec<String>,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        ComponentConfig {
            tag_name: String::new(),
            shadow_mode: Some(ShadowRootMode::Open),
            style_encapsulation: true,
            enable_reactivity: true,
            debug: false,
            styles: None,
            observed_attributes: Vec::new(),
        }
    }
}

impl ComponentConfig {
    pub fn new(tag_name: &str) -> Self {
        ComponentConfig {
            tag_name: tag_name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_shadow_mode(mut self, mode: Option<ShadowRootMode>) -> Self {
        self.shadow_mode = mode;
        self
    }

    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_reactivity(mut self, enabled: bool) -> Self {
        self.enable_reactivity = enabled;
        self
    }

    pub fn with_style_encapsulation(mut self, enabled: bool) -> Self {
        self.style_encapsulation = enabled;
        self
    }

    pub fn with_observed_attributes(mut self, attributes: &[&str]) -> Self {
        self.observed_attributes = attributes.iter().map(|a| a.to_ascii_lowercase()).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ComponentError> {
        if !is_valid_custom_element_name(&self.tag_name) {
            return Err(ComponentError::InvalidConfig(format!(
                "\"{}\" is not a valid custom element name",
                self.tag_name
            )));
        }
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file: {:?}", path))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: ComponentConfig =
            serde_json::from_str(json).context("Failed to parse component config")?;
        config.validate()?;
        Ok(config)
    }
}

/// How one property behaves on a component
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyDeclaration {
    #[serde(rename = "type")]
    pub prop_type: Option<PropType>,
    pub default_value: Value,
    pub attribute: AttributeBinding,
    pub required: bool,
    /// Mirror writes back to the attribute
    pub sync: bool,
    #[serde(skip)]
    pub validator: Option<Validator>,
    #[serde(skip)]
    pub transform: Option<Transform>,
}

impl PropertyDeclaration {
    pub fn new(prop_type: PropType) -> Self {
        PropertyDeclaration {
            prop_type: Some(prop_type),
            ..Default::default()
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = value;
        self
    }

    pub fn attribute(mut self, attribute: impl Into<AttributeBinding>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn sync(mut self) -> Self {
        self.sync = true;
        self
    }

    pub fn validator(mut self, validator: impl Fn(&Value) -> bool + 'static) -> Self {
        self.validator = Some(Rc::new(validator));
        self
    }

    pub fn transform(mut self, transform: impl Fn(Value) -> Value + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    /// Reactive config for this declaration; `on_change` is wired by the host
    pub(crate) fn to_reactive_config(&self) -> ReactivePropertyConfig {
        ReactivePropertyConfig {
            initial_value: self.default_value.clone(),
            attribute: self.attribute.clone(),
            prop_type: self.prop_type,
            validator: self.validator.clone(),
            transform: self.transform.clone(),
            on_change: None,
            sync: self.sync,
        }
    }
}

impl fmt::Debug for PropertyDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDeclaration")
            .field("prop_type", &self.prop_type)
            .field("default_value", &self.default_value)
            .field("attribute", &self.attribute)
            .field("required", &self.required)
            .field("sync", &self.sync)
            .field("validator", &self.validator.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

pub type PropertyDeclarations = IndexMap<String, PropertyDeclaration>;
