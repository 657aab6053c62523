//! Reactive Manager
//!
//! Owns one `ComponentReactiveState` per component id: property configs,
//! the value store, computed properties and the pending update batch.
//!
//! Writes run validation, transform and coercion, skip when the value is
//! unchanged, mirror synced attributes, call `on_change`, dirty dependent
//! computed values and queue a debounced flush. No `RefCell` borrow is held
//! while attribute sync or callbacks run, so those may write back.

use super::config::{BatchConfig, ComputeFn, ReactivePropertyConfig};
use crate::value::{attribute_to_value, convert_value_to_type, property_to_attribute, PropType};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, trace, warn};
use wc_dom::event_loop::{clear_timeout, set_timeout};
use wc_dom::{Node, Promise, Resolver, TimerId, WeakNode};

/// What a property write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The validator refused the value
    Rejected,
    Unchanged,
    Changed,
    /// No such component or property
    Missing,
}

impl SetOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, SetOutcome::Changed)
    }
}

struct ComputedProperty {
    dependencies: SmallVec<[String; 4]>,
    compute_fn: ComputeFn,
    last_value: Value,
    is_dirty: bool,
}

struct PendingFlush {
    promise: Promise<()>,
    resolver: Resolver<()>,
    timer: TimerId,
}

struct ComponentReactiveState {
    element: WeakNode,
    properties: IndexMap<String, Rc<ReactivePropertyConfig>>,
    values: IndexMap<String, Value>,
    computed: IndexMap<String, ComputedProperty>,
    batched_updates: IndexSet<String>,
    is_updating: bool,
    update_queue: Option<PendingFlush>,
    flush_count: u64,
}

impl ComponentReactiveState {
    fn new(element: &Node) -> Self {
        ComponentReactiveState {
            element: element.downgrade(),
            properties: IndexMap::new(),
            values: IndexMap::new(),
            computed: IndexMap::new(),
            batched_updates: IndexSet::new(),
            is_updating: false,
            update_queue: None,
            flush_count: 0,
        }
    }

    /// Mark computed values depending on `property` dirty, transitively
    fn invalidate_dependents(&mut self, property: &str) {
        let mut pending = vec![property.to_string()];
        while let Some(changed) = pending.pop() {
            for (name, computed) in self.computed.iter_mut() {
                if !computed.is_dirty && computed.dependencies.iter().any(|d| *d == changed) {
                    computed.is_dirty = true;
                    pending.push(name.clone());
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    pub value: Value,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<PropType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    pub sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedSnapshot {
    pub dependencies: Vec<String>,
    pub last_value: Value,
    pub is_dirty: bool,
}

/// Debug view of one component's reactive state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactiveStateSnapshot {
    pub component_id: String,
    pub element_alive: bool,
    pub properties: IndexMap<String, PropertySnapshot>,
    pub computed: IndexMap<String, ComputedSnapshot>,
    pub batched_updates: Vec<String>,
    pub is_updating: bool,
    pub has_pending_flush: bool,
    pub flush_count: u64,
}

/// Handle to one reactive property
#[derive(Clone)]
pub struct PropertyAccessor {
    manager: Weak<ReactiveManager>,
    component_id: String,
    property: String,
}

impl PropertyAccessor {
    pub fn name(&self) -> &str {
        &self.property
    }

    pub fn get(&self) -> Option<Value> {
        self.manager
            .upgrade()?
            .get_property(&self.component_id, &self.property)
    }

    pub fn set(&self, value: Value) -> SetOutcome {
        match self.manager.upgrade() {
            Some(manager) => manager.set_property(&self.component_id, &self.property, value),
            None => SetOutcome::Missing,
        }
    }
}

pub struct ReactiveManager {
    components: RefCell<IndexMap<String, ComponentReactiveState>>,
    batch_config: BatchConfig,
    self_ref: Weak<ReactiveManager>,
}

impl ReactiveManager {
    pub fn new(batch_config: BatchConfig) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| ReactiveManager {
            components: RefCell::new(IndexMap::new()),
            batch_config,
            self_ref: self_ref.clone(),
        })
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.batch_config
    }

    /// Start fresh state for `component_id`. An existing state under the same
    /// id is replaced.
    pub fn register_component(&self, component_id: &str, element: &Node) {
        let previous = self
            .components
            .borrow_mut()
            .insert(component_id.to_string(), ComponentReactiveState::new(element));
        if previous.is_some() {
            warn!(component = component_id, "reactive state replaced by a new registration");
        }
    }

    pub fn has_component(&self, component_id: &str) -> bool {
        self.components.borrow().contains_key(component_id)
    }

    pub fn component_ids(&self) -> Vec<String> {
        self.components.borrow().keys().cloned().collect()
    }

    pub fn property_names(&self, component_id: &str) -> Vec<String> {
        self.components
            .borrow()
            .get(component_id)
            .map(|state| state.properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn create_reactive_property(
        &self,
        target: &Node,
        property: &str,
        config: ReactivePropertyConfig,
        component_id: &str,
    ) -> PropertyAccessor {
        let initial = convert_value_to_type(config.initial_value.clone(), config.prop_type);
        let synced = config.synced_attribute(property).is_some();
        {
            let mut components = self.components.borrow_mut();
            let state = components
                .entry(component_id.to_string())
                .or_insert_with(|| ComponentReactiveState::new(target));
            state.properties.insert(property.to_string(), Rc::new(config));
            state.values.insert(property.to_string(), initial);
        }
        trace!(component = component_id, property, "reactive property installed");

        if synced {
            self.sync_property_to_attribute(component_id, property);
        }
        PropertyAccessor {
            manager: self.self_ref.clone(),
            component_id: component_id.to_string(),
            property: property.to_string(),
        }
    }

    pub fn accessor(&self, component_id: &str, property: &str) -> Option<PropertyAccessor> {
        let components = self.components.borrow();
        let state = components.get(component_id)?;
        if !state.properties.contains_key(property) && !state.computed.contains_key(property) {
            return None;
        }
        Some(PropertyAccessor {
            manager: self.self_ref.clone(),
            component_id: component_id.to_string(),
            property: property.to_string(),
        })
    }

    pub fn get_property(&self, component_id: &str, property: &str) -> Option<Value> {
        {
            let components = self.components.borrow();
            let state = components.get(component_id)?;
            if !state.computed.contains_key(property) {
                return state.values.get(property).cloned();
            }
        }
        self.evaluate_computed(component_id, property)
    }

    pub fn set_property(&self, component_id: &str, property: &str, value: Value) -> SetOutcome {
        let (config, old) = {
            let components = self.components.borrow();
            let Some(state) = components.get(component_id) else {
                return SetOutcome::Missing;
            };
            let Some(config) = state.properties.get(property) else {
                return SetOutcome::Missing;
            };
            let old = state.values.get(property).cloned().unwrap_or(Value::Null);
            (config.clone(), old)
        };

        if let Some(validator) = &config.validator {
            if !validator(&value) {
                warn!(component = component_id, property, %value, "validation rejected value");
                return SetOutcome::Rejected;
            }
        }
        let value = match &config.transform {
            Some(transform) => transform(value),
            None => value,
        };
        let value = convert_value_to_type(value, config.prop_type);
        if value == old {
            return SetOutcome::Unchanged;
        }

        let schedule = {
            let mut components = self.components.borrow_mut();
            let Some(state) = components.get_mut(component_id) else {
                return SetOutcome::Missing;
            };
            state.values.insert(property.to_string(), value.clone());
            state.invalidate_dependents(property);
            state.batched_updates.insert(property.to_string());
            !state.is_updating
        };

        if config.synced_attribute(property).is_some() {
            self.sync_property_to_attribute(component_id, property);
        }
        if let Some(on_change) = &config.on_change {
            on_change(&value, &old);
        }
        if schedule {
            self.queue_batch_update(component_id, property);
        }
        SetOutcome::Changed
    }

    /// Register a lazily recomputed property. Returns false when the
    /// component has no reactive state.
    pub fn create_computed(
        &self,
        component_id: &str,
        property: &str,
        dependencies: &[&str],
        compute_fn: impl Fn(&[Value]) -> Value + 'static,
    ) -> bool {
        let mut components = self.components.borrow_mut();
        let Some(state) = components.get_mut(component_id) else {
            warn!(component = component_id, property, "computed property on unknown component");
            return false;
        };
        state.computed.insert(
            property.to_string(),
            ComputedProperty {
                dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
                compute_fn: Rc::new(compute_fn),
                last_value: Value::Null,
                is_dirty: true,
            },
        );
        true
    }

    fn evaluate_computed(&self, component_id: &str, property: &str) -> Option<Value> {
        let (dependencies, compute_fn) = {
            let components = self.components.borrow();
            let computed = components.get(component_id)?.computed.get(property)?;
            if !computed.is_dirty {
                return Some(computed.last_value.clone());
            }
            (computed.dependencies.clone(), computed.compute_fn.clone())
        };

        let args: Vec<Value> = dependencies
            .iter()
            .map(|dep| self.get_property(component_id, dep).unwrap_or(Value::Null))
            .collect();
        let value = compute_fn(&args);

        let mut components = self.components.borrow_mut();
        if let Some(computed) = components
            .get_mut(component_id)
            .and_then(|state| state.computed.get_mut(property))
        {
            computed.last_value = value.clone();
            computed.is_dirty = false;
        }
        Some(value)
    }

    /// Add `key` to the pending batch and make sure a flush is scheduled.
    /// Every caller in the same window gets the same promise.
    pub fn queue_batch_update(&self, component_id: &str, key: &str) -> Option<Promise<()>> {
        self.schedule_flush(component_id, Some(key))
    }

    fn schedule_flush(&self, component_id: &str, key: Option<&str>) -> Option<Promise<()>> {
        let (promise, full) = {
            let mut components = self.components.borrow_mut();
            let state = components.get_mut(component_id)?;
            if let Some(key) = key {
                state.batched_updates.insert(key.to_string());
            }
            let existing = state.update_queue.as_ref().map(|p| p.promise.clone());
            let promise = match existing {
                Some(promise) => promise,
                None => {
                    let (promise, resolver) = Promise::new();
                    let manager = self.self_ref.clone();
                    let id = component_id.to_string();
                    let on_fire = resolver.clone();
                    let timer = set_timeout(self.batch_config.debounce_time, move || {
                        if let Some(manager) = manager.upgrade() {
                            manager.flush_batch_updates(&id);
                        }
                        // Resolves even when the component was cleaned up meanwhile
                        on_fire.resolve(());
                    });
                    state.update_queue = Some(PendingFlush {
                        promise: promise.clone(),
                        resolver,
                        timer,
                    });
                    promise
                }
            };
            (
                promise,
                state.batched_updates.len() >= self.batch_config.max_batch_size,
            )
        };
        if full {
            debug!(component = component_id, "batch size limit reached; flushing early");
            self.flush_batch_updates(component_id);
        }
        Some(promise)
    }

    /// Clear pending keys and settle the pending flush. Returns how many keys
    /// were flushed; a missing component flushes nothing.
    pub fn flush_batch_updates(&self, component_id: &str) -> usize {
        let (pending, flushed) = {
            let mut components = self.components.borrow_mut();
            let Some(state) = components.get_mut(component_id) else {
                trace!(component = component_id, "flush for removed component ignored");
                return 0;
            };
            let keys = std::mem::take(&mut state.batched_updates);
            state.flush_count += 1;
            (state.update_queue.take(), keys.len())
        };
        if let Some(pending) = pending {
            clear_timeout(pending.timer);
            pending.resolver.resolve(());
        }
        trace!(component = component_id, flushed, "batch flushed");
        flushed
    }

    /// Run `f` with per-write scheduling suppressed, then schedule one flush
    pub fn batch_update(&self, component_id: &str, f: impl FnOnce()) -> Option<Promise<()>> {
        let previous = {
            let mut components = self.components.borrow_mut();
            components
                .get_mut(component_id)
                .map(|state| std::mem::replace(&mut state.is_updating, true))
        };
        f();
        let previous = previous?;
        if let Some(state) = self.components.borrow_mut().get_mut(component_id) {
            state.is_updating = previous;
        }
        self.schedule_flush(component_id, None)
    }

    /// Route an attribute change to the property mapped to it
    pub fn sync_attribute_to_property(
        &self,
        component_id: &str,
        attribute: &str,
        value: Option<&str>,
    ) -> Option<SetOutcome> {
        let (property, prop_type) = {
            let components = self.components.borrow();
            let state = components.get(component_id)?;
            state.properties.iter().find_map(|(name, config)| {
                (config.attribute.attribute_name(name).as_deref() == Some(attribute))
                    .then(|| (name.clone(), config.prop_type))
            })?
        };
        let value = attribute_to_value(value, prop_type);
        Some(self.set_property(component_id, &property, value))
    }

    /// Mirror a property onto its attribute. Returns whether the DOM changed.
    pub fn sync_property_to_attribute(&self, component_id: &str, property: &str) -> bool {
        let Some((element, attribute, value)) = self.attribute_target(component_id, property)
        else {
            return false;
        };

        match property_to_attribute(&value) {
            None => element.remove_attribute(&attribute),
            Some(text) => {
                if element.get_attribute(&attribute).as_deref() == Some(text.as_str()) {
                    return false;
                }
                match element.set_attribute(&attribute, &text) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(component = component_id, attribute, %err, "attribute sync failed");
                        false
                    }
                }
            }
        }
    }

    fn attribute_target(&self, component_id: &str, property: &str) -> Option<(Node, String, Value)> {
        let components = self.components.borrow();
        let state = components.get(component_id)?;
        let attribute = state.properties.get(property)?.attribute.attribute_name(property)?;
        let element = state.element.upgrade()?;
        let value = state.values.get(property).cloned().unwrap_or(Value::Null);
        Some((element, attribute, value))
    }

    /// Drop all state for a component. Returns whether any existed.
    pub fn cleanup_component(&self, component_id: &str) -> bool {
        let removed = self.components.borrow_mut().shift_remove(component_id);
        match removed {
            Some(_) => {
                debug!(component = component_id, "reactive state cleaned up");
                true
            }
            None => false,
        }
    }

    pub fn get_component_state(&self, component_id: &str) -> Option<ReactiveStateSnapshot> {
        let components = self.components.borrow();
        let state = components.get(component_id)?;
        Some(ReactiveStateSnapshot {
            component_id: component_id.to_string(),
            element_alive: state.element.is_alive(),
            properties: state
                .properties
                .iter()
                .map(|(name, config)| {
                    let snapshot = PropertySnapshot {
                        value: state.values.get(name).cloned().unwrap_or(Value::Null),
                        prop_type: config.prop_type,
                        attribute: config.attribute.attribute_name(name),
                        sync: config.sync,
                    };
                    (name.clone(), snapshot)
                })
                .collect(),
            computed: state
                .computed
                .iter()
                .map(|(name, computed)| {
                    let snapshot = ComputedSnapshot {
                        dependencies: computed.dependencies.to_vec(),
                        last_value: computed.last_value.clone(),
                        is_dirty: computed.is_dirty,
                    };
                    (name.clone(), snapshot)
                })
                .collect(),
            batched_updates: state.batched_updates.iter().cloned().collect(),
            is_updating: state.is_updating,
            has_pending_flush: state.update_queue.is_some(),
            flush_count: state.flush_count,
        })
    }
}
