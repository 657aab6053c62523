//! Component Registration

use super::host::{Component, ComponentHost};
use crate::error::ComponentError;
use crate::managers::ManagerBundle;
use std::rc::Rc;
use tracing::{debug, warn};
use wc_dom::{CustomElement, CustomElementRegistry, ElementConstructor};

/// Register `C` under its configured tag. Defining a tag twice is a warning,
/// not an error, and returns `Ok(false)`.
pub fn define<C: Component>(managers: &ManagerBundle) -> Result<bool, ComponentError> {
    let config = C::config();
    config.validate()?;
    let tag_name = config.tag_name;

    if CustomElementRegistry::with(|registry| registry.is_defined(&tag_name)) {
        warn!(tag = tag_name.as_str(), "custom element already defined");
        return Ok(false);
    }

    let managers = managers.clone();
    let constructor: ElementConstructor = Rc::new(move || {
        let host: Rc<dyn CustomElement> = ComponentHost::<C>::new(managers.clone());
        host
    });
    CustomElementRegistry::with(|registry| registry.define(&tag_name, constructor))?;
    debug!(tag = tag_name.as_str(), "custom element defined");
    Ok(true)
}

/// Construct a host directly, without going through the registry
pub fn create<C: Component>(managers: &ManagerBundle) -> Rc<ComponentHost<C>> {
    ComponentHost::new(managers.clone())
}
