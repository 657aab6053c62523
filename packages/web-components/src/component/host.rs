//! Component Host
//!
//! `ComponentHost<C>` is the custom-element instance behind a `Component`.
//! It owns the host element, installs reactive properties from the declared
//! properties, routes attribute changes through the same typed write path as
//! code, and re-renders the whole root on a batched schedule.
//!
//! Lifecycle: created -> connected <-> attribute changes -> disconnected.
//! Reconnection re-installs reactive state from the values saved on
//! disconnect and schedules a fresh render.

use super::config::{ComponentConfig, PropertyDeclarations};
use crate::error::RenderError;
use crate::logging::LogLevel;
use crate::managers::{
    ComponentNotificationConfig, DomOps, LifecyclePhase, ManagerBundle, NotifyOps, StyleOps,
};
use crate::reactive::{ReactiveStateSnapshot, SetOutcome};
use crate::template::{create_template, process_template, TemplateResult};
use crate::util::generate_component_id;
use crate::value::{display_string, to_boolean, to_number};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, error, trace, warn};
use wc_dom::event_loop::{now, request_animation_frame};
use wc_dom::{CustomElement, Event, Node};

/// What a component author implements
pub trait Component: 'static {
    fn config() -> ComponentConfig
    where
        Self: Sized;

    fn properties() -> PropertyDeclarations
    where
        Self: Sized,
    {
        PropertyDeclarations::new()
    }

    fn create() -> Self
    where
        Self: Sized;

    /// `Ok(None)` leaves the current DOM untouched
    fn render(&self, ctx: &RenderContext) -> Result<Option<TemplateResult>, RenderError>;

    fn on_connected(&self, _ctx: &RenderContext) {}

    fn on_disconnected(&self, _ctx: &RenderContext) {}

    fn on_attribute_changed(
        &self,
        _ctx: &RenderContext,
        _name: &str,
        _old: Option<&str>,
        _new: Option<&str>,
    ) {
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Created,
    Connected,
    Disconnected,
}

pub(crate) trait HostOps {
    fn component_id(&self) -> &str;
    fn element(&self) -> Node;
    fn get_property(&self, name: &str) -> Option<Value>;
    fn set_property(&self, name: &str, value: Value) -> SetOutcome;
    fn dispatch_custom_event(&self, name: &str, detail: Value) -> bool;
    fn request_render(&self);
}

/// Weak, type-erased handle to a host. Event listeners capture this rather
/// than the host so templates never keep a component alive.
#[derive(Clone)]
pub struct HostHandle {
    inner: Weak<dyn HostOps>,
}

impl HostHandle {
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn component_id(&self) -> Option<String> {
        Some(self.inner.upgrade()?.component_id().to_string())
    }

    pub fn element(&self) -> Option<Node> {
        Some(self.inner.upgrade()?.element())
    }

    pub fn get_property(&self, name: &str) -> Option<Value> {
        self.inner.upgrade()?.get_property(name)
    }

    pub fn set_property(&self, name: &str, value: Value) -> SetOutcome {
        match self.inner.upgrade() {
            Some(host) => host.set_property(name, value),
            None => SetOutcome::Missing,
        }
    }

    pub fn dispatch_custom_event(&self, name: &str, detail: Value) -> bool {
        self.inner
            .upgrade()
            .map_or(false, |host| host.dispatch_custom_event(name, detail))
    }

    pub fn request_render(&self) {
        if let Some(host) = self.inner.upgrade() {
            host.request_render();
        }
    }
}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandle")
            .field("component_id", &self.component_id())
            .finish()
    }
}

/// Read access to the host's properties during render and hooks
pub struct RenderContext {
    handle: HostHandle,
}

impl RenderContext {
    pub fn handle(&self) -> HostHandle {
        self.handle.clone()
    }

    pub fn component_id(&self) -> String {
        self.handle.component_id().unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Value {
        self.handle.get_property(name).unwrap_or(Value::Null)
    }

    pub fn get_f64(&self, name: &str) -> f64 {
        to_number(&self.get(name)).unwrap_or(f64::NAN)
    }

    pub fn get_i64(&self, name: &str) -> i64 {
        let value = self.get(name);
        value
            .as_i64()
            .unwrap_or_else(|| to_number(&value).map_or(0, |n| n as i64))
    }

    pub fn get_str(&self, name: &str) -> String {
        display_string(&self.get(name))
    }

    pub fn get_bool(&self, name: &str) -> bool {
        to_boolean(&self.get(name))
    }
}

/// Debug view of a host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStateSnapshot {
    pub component_id: String,
    pub tag_name: String,
    pub lifecycle: LifecycleState,
    pub connected: bool,
    pub has_shadow_root: bool,
    pub render_count: u64,
    pub render_scheduled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactive: Option<ReactiveStateSnapshot>,
}

pub struct ComponentHost<C: Component> {
    component: C,
    config: ComponentConfig,
    declarations: PropertyDeclarations,
    component_id: String,
    element: Node,
    shadow_root: Option<Node>,
    managers: ManagerBundle,
    lifecycle: Cell<LifecycleState>,
    render_scheduled: Cell<bool>,
    render_count: Cell<u64>,
    last_error: RefCell<Option<String>>,
    /// Property values carried across a disconnect
    saved_values: RefCell<Option<IndexMap<String, Value>>>,
    self_ref: Weak<ComponentHost<C>>,
}

impl<C: Component> ComponentHost<C> {
    pub fn new(managers: ManagerBundle) -> Rc<Self> {
        let config = C::config();
        let declarations = C::properties();
        let component_id = generate_component_id(&config.tag_name);
        let element = Node::new_element(&config.tag_name);

        let shadow_root = config.shadow_mode.and_then(|mode| {
            match managers.dom.create_shadow_root(&element, mode) {
                Ok(root) => Some(root),
                Err(err) => {
                    warn!(component = component_id.as_str(), %err, "could not attach shadow root");
                    None
                }
            }
        });
        register_with_managers(&managers, &config, &component_id, &element, shadow_root.as_ref());

        let host = Rc::new_cyclic(|self_ref| ComponentHost {
            component: C::create(),
            config,
            declarations,
            component_id,
            element,
            shadow_root,
            managers,
            lifecycle: Cell::new(LifecycleState::Created),
            render_scheduled: Cell::new(false),
            render_count: Cell::new(0),
            last_error: RefCell::new(None),
            saved_values: RefCell::new(None),
            self_ref: self_ref.clone(),
        });

        if host.config.enable_reactivity {
            host.install_properties(None);
        }
        let instance: Rc<dyn CustomElement> = host.clone();
        if let Err(err) = host.element.upgrade(&instance) {
            warn!(component = host.component_id.as_str(), %err, "could not upgrade host element");
        }
        host.managers.notification.notify_lifecycle(
            &host.component_id,
            LifecyclePhase::Created,
            None,
            None,
        );
        debug!(component = host.component_id.as_str(), "component created");
        host
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn element(&self) -> &Node {
        &self.element
    }

    pub fn shadow_root(&self) -> Option<&Node> {
        self.shadow_root.as_ref()
    }

    /// Where rendered content goes: the shadow root, else the element
    pub fn render_root(&self) -> &Node {
        self.shadow_root.as_ref().unwrap_or(&self.element)
    }

    pub fn managers(&self) -> &ManagerBundle {
        &self.managers
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.get()
    }

    pub fn render_count(&self) -> u64 {
        self.render_count.get()
    }

    pub fn is_render_scheduled(&self) -> bool {
        self.render_scheduled.get()
    }

    pub fn last_render_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    pub fn handle(&self) -> HostHandle {
        let inner: Weak<dyn HostOps> = self.self_ref.clone();
        HostHandle { inner }
    }

    pub fn context(&self) -> RenderContext {
        RenderContext {
            handle: self.handle(),
        }
    }

    pub fn get_property(&self, name: &str) -> Option<Value> {
        self.managers
            .reactive
            .get_property(&self.component_id, name)
    }

    /// Same validated, typed path attribute changes take
    pub fn set_property(&self, name: &str, value: Value) -> SetOutcome {
        self.managers
            .reactive
            .set_property(&self.component_id, name, value)
    }

    /// Dispatch a bubbling `CustomEvent` from the host element
    pub fn dispatch_custom_event(&self, name: &str, detail: Value) -> bool {
        let event = Event::custom(name, detail, true);
        self.element.dispatch_event(&event)
    }

    pub fn get_component_state(&self) -> ComponentStateSnapshot {
        ComponentStateSnapshot {
            component_id: self.component_id.clone(),
            tag_name: self.config.tag_name.clone(),
            lifecycle: self.lifecycle.get(),
            connected: self.element.is_connected(),
            has_shadow_root: self.shadow_root.is_some(),
            render_count: self.render_count.get(),
            render_scheduled: self.render_scheduled.get(),
            last_error: self.last_error.borrow().clone(),
            reactive: self
                .managers
                .reactive
                .get_component_state(&self.component_id),
        }
    }

    fn install_properties(&self, saved: Option<IndexMap<String, Value>>) {
        let reactive = &self.managers.reactive;
        reactive.register_component(&self.component_id, &self.element);
        for (name, declaration) in &self.declarations {
            let mut config = declaration.to_reactive_config();
            if let Some(value) = saved.as_ref().and_then(|values| values.get(name)) {
                config.initial_value = value.clone();
            }
            let host = self.self_ref.clone();
            config.on_change = Some(Rc::new(move |_, _| {
                if let Some(host) = host.upgrade() {
                    host.schedule_render();
                }
            }));
            reactive.create_reactive_property(&self.element, name, config, &self.component_id);
        }
    }

    fn warn_missing_required(&self) {
        for (name, declaration) in &self.declarations {
            if !declaration.required {
                continue;
            }
            let missing = self.get_property(name).map_or(true, |value| value.is_null());
            if missing {
                warn!(
                    component = self.component_id.as_str(),
                    property = name.as_str(),
                    "required property has no value"
                );
            }
        }
    }

    /// At most one render pending. Goes through the reactive batch when
    /// available, otherwise the next animation frame.
    pub fn schedule_render(&self) {
        if self.render_scheduled.replace(true) {
            return;
        }
        let host = self.self_ref.clone();
        let run = move || {
            if let Some(host) = host.upgrade() {
                host.render_scheduled.set(false);
                host.perform_render();
            }
        };

        if self.config.enable_reactivity {
            if let Some(flush) = self.managers.reactive.batch_update(&self.component_id, || {}) {
                flush.then(move |_| run());
                return;
            }
        }
        request_animation_frame(run);
    }

    /// Replace the root's content with a fresh render. Errors are logged and
    /// reported; the previous DOM stays.
    pub fn perform_render(&self) {
        if !self.element.is_connected() {
            trace!(component = self.component_id.as_str(), "skipping render while disconnected");
            return;
        }
        let started = now();

        let result = match self.component.render(&self.context()) {
            Ok(Some(result)) => result.with_component_id(self.component_id.as_str()),
            Ok(None) => return,
            Err(err) => {
                self.report_render_error(&err);
                return;
            }
        };

        let cache_key = format!("{}-template", self.component_id);
        let template = create_template(&result, Some(&cache_key), None);
        let fragment = process_template(&template, &result, Some(&self.component_id));

        let root = self.render_root();
        root.clear_children();
        if let Err(err) = root.append_child(&fragment) {
            self.report_render_error(&RenderError::msg(err.to_string()));
            return;
        }
        self.apply_styles(root);

        self.managers
            .dom
            .touch_component(&self.component_id, Some(template));
        self.render_count.set(self.render_count.get() + 1);
        self.last_error.borrow_mut().take();
        self.managers.notification.notify_lifecycle(
            &self.component_id,
            LifecyclePhase::Rendered,
            Some(now() - started),
            None,
        );
    }

    /// Drop everything the shared managers hold for this id, except the
    /// template cache
    fn release_manager_state(&self) {
        let id = self.component_id.as_str();
        self.managers.reactive.cleanup_component(id);
        self.managers.style.remove_component_styles(id);
        self.managers.dom.unregister_component(id);
        self.managers.notification.remove_component(id);
        trace!(component = id, "manager state released");
    }

    fn apply_styles(&self, root: &Node) {
        let Some(styles) = self.config.styles.as_deref() else {
            return;
        };
        let css = if self.shadow_root.is_none() && self.config.style_encapsulation {
            self.managers.style.scope_css(styles, &self.component_id)
        } else {
            styles.to_string()
        };
        self.managers
            .style
            .add_component_styles(&self.component_id, &css, root, false);
    }

    fn report_render_error(&self, err: &RenderError) {
        error!(component = self.component_id.as_str(), %err, "render failed");
        *self.last_error.borrow_mut() = Some(err.to_string());
        self.managers.notification.show_component_debug(
            &self.component_id,
            &format!("render failed: {}", err),
            LogLevel::Error,
            Some(json!({ "error": err.to_string() })),
        );
    }
}

impl<C: Component> Drop for ComponentHost<C> {
    fn drop(&mut self) {
        if self.lifecycle.get() != LifecycleState::Disconnected {
            self.release_manager_state();
        }
    }
}

fn register_with_managers(
    managers: &ManagerBundle,
    config: &ComponentConfig,
    component_id: &str,
    element: &Node,
    shadow_root: Option<&Node>,
) {
    managers
        .dom
        .register_component(component_id, element, shadow_root);
    managers.notification.configure_component(
        component_id,
        ComponentNotificationConfig {
            debug: config.debug,
            ..Default::default()
        },
    );
}

impl<C: Component> CustomElement for ComponentHost<C> {
    fn element(&self) -> Node {
        self.element.clone()
    }

    fn observed_attributes(&self) -> Vec<String> {
        let mut attributes = self.config.observed_attributes.clone();
        for (name, declaration) in &self.declarations {
            if let Some(attribute) = declaration.attribute.attribute_name(name) {
                if !attributes.contains(&attribute) {
                    attributes.push(attribute);
                }
            }
        }
        attributes
    }

    fn connected_callback(&self) {
        self.lifecycle.set(LifecycleState::Connected);
        if self.managers.dom.get_component(&self.component_id).is_none() {
            register_with_managers(
                &self.managers,
                &self.config,
                &self.component_id,
                &self.element,
                self.shadow_root.as_ref(),
            );
        }
        let reactive = &self.managers.reactive;
        if self.config.enable_reactivity && !reactive.has_component(&self.component_id) {
            let saved = self.saved_values.borrow_mut().take();
            self.install_properties(saved);
        }
        self.managers.notification.notify_lifecycle(
            &self.component_id,
            LifecyclePhase::Connected,
            None,
            None,
        );
        self.warn_missing_required();
        self.component.on_connected(&self.context());
        self.schedule_render();
    }

    fn disconnected_callback(&self) {
        self.lifecycle.set(LifecycleState::Disconnected);
        self.managers.notification.notify_lifecycle(
            &self.component_id,
            LifecyclePhase::Disconnected,
            None,
            None,
        );
        self.component.on_disconnected(&self.context());

        let values: IndexMap<String, Value> = self
            .declarations
            .keys()
            .filter_map(|name| Some((name.clone(), self.get_property(name)?)))
            .collect();
        *self.saved_values.borrow_mut() = Some(values);
        self.release_manager_state();
    }

    fn attribute_changed_callback(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        self.managers.notification.notify_lifecycle(
            &self.component_id,
            LifecyclePhase::AttributeChanged,
            None,
            Some(json!({ "name": name, "oldValue": old, "newValue": new })),
        );
        if self.config.enable_reactivity {
            self.managers
                .reactive
                .sync_attribute_to_property(&self.component_id, name, new);
        }
        self.component
            .on_attribute_changed(&self.context(), name, old, new);
    }
}

impl<C: Component> HostOps for ComponentHost<C> {
    fn component_id(&self) -> &str {
        &self.component_id
    }

    fn element(&self) -> Node {
        self.element.clone()
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        ComponentHost::get_property(self, name)
    }

    fn set_property(&self, name: &str, value: Value) -> SetOutcome {
        ComponentHost::set_property(self, name, value)
    }

    fn dispatch_custom_event(&self, name: &str, detail: Value) -> bool {
        ComponentHost::dispatch_custom_event(self, name, detail)
    }

    fn request_render(&self) {
        self.schedule_render();
    }
}
