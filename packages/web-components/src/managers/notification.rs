//! Notification Manager
//!
//! Per-component debug configuration, lifecycle history and batched
//! notification delivery on top of a base notification manager.
//!
//! Lifecycle notifications are always recorded; logging them is gated on
//! global debug. History per component is capped, oldest first out.

use super::core::CoreNotificationManager;
use super::extension::{
    web_components_extension, Extensible, ExtensionRegistry, NotifyOps, WEB_COMPONENTS_EXTENSION,
};
use crate::logging::{emit, LogLevel};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};
use wc_dom::event_loop::{clear_timeout, now, set_timeout};
use wc_dom::TimerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Lifecycle,
    Debug,
    Custom,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Lifecycle => "lifecycle",
            NotificationKind::Debug => "debug",
            NotificationKind::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LifecyclePhase {
    Created,
    Connected,
    Disconnected,
    AttributeChanged,
    Rendered,
    Updated,
    Error,
}

impl LifecyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecyclePhase::Created => "created",
            LifecyclePhase::Connected => "connected",
            LifecyclePhase::Disconnected => "disconnected",
            LifecyclePhase::AttributeChanged => "attributeChanged",
            LifecyclePhase::Rendered => "rendered",
            LifecyclePhase::Updated => "updated",
            LifecyclePhase::Error => "error",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub component_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub level: LogLevel,
    pub message: String,
    pub data: Value,
    pub timestamp: f64,
}

/// A notification waiting in a component's batch queue
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub kind: NotificationKind,
    pub level: LogLevel,
    pub message: String,
    pub data: Value,
}

impl PendingNotification {
    pub fn new(kind: NotificationKind, level: LogLevel, message: impl Into<String>) -> Self {
        PendingNotification {
            kind,
            level,
            message: message.into(),
            data: Value::Null,
        }
    }

    pub fn custom(message: impl Into<String>, data: Value) -> Self {
        PendingNotification {
            data,
            ..Self::new(NotificationKind::Custom, LogLevel::Info, message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentNotificationConfig {
    pub debug: bool,
    pub log_level: LogLevel,
    pub history_size: usize,
    /// Queued notifications that trigger an immediate flush
    pub batch_size: usize,
    /// Milliseconds before a partial batch is flushed
    pub batch_timeout: f64,
}

impl Default for ComponentNotificationConfig {
    fn default() -> Self {
        ComponentNotificationConfig {
            debug: false,
            log_level: LogLevel::Info,
            history_size: 100,
            batch_size: 10,
            batch_timeout: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStats {
    pub total_components: usize,
    pub total_notifications: usize,
    pub by_type: IndexMap<String, usize>,
    pub by_level: IndexMap<String, usize>,
    pub queued: usize,
    pub global_debug: bool,
    pub debug_components: Vec<String>,
}

#[derive(Default)]
struct ComponentQueue {
    items: Vec<PendingNotification>,
    timer: Option<TimerId>,
}

pub struct WebComponentNotificationManager {
    base: Rc<dyn CoreNotificationManager>,
    extensions: ExtensionRegistry,
    global_debug: Cell<bool>,
    next_id: Cell<u64>,
    configs: RefCell<IndexMap<String, ComponentNotificationConfig>>,
    history: RefCell<IndexMap<String, VecDeque<Notification>>>,
    queues: RefCell<IndexMap<String, ComponentQueue>>,
    self_ref: Weak<WebComponentNotificationManager>,
}

impl WebComponentNotificationManager {
    pub fn new(base: Rc<dyn CoreNotificationManager>) -> Rc<Self> {
        if !base.is_initialized() {
            base.initialize();
        }
        let manager = Rc::new_cyclic(|self_ref| WebComponentNotificationManager {
            base,
            extensions: ExtensionRegistry::new(),
            global_debug: Cell::new(false),
            next_id: Cell::new(0),
            configs: RefCell::new(IndexMap::new()),
            history: RefCell::new(IndexMap::new()),
            queues: RefCell::new(IndexMap::new()),
            self_ref: self_ref.clone(),
        });
        manager.extend(
            WEB_COMPONENTS_EXTENSION,
            web_components_extension(
                "notification",
                &["lifecycle", "componentDebug", "batching", "history"],
            ),
        );
        manager
    }

    pub fn base(&self) -> &Rc<dyn CoreNotificationManager> {
        &self.base
    }

    pub fn configure_component(&self, component_id: &str, config: ComponentNotificationConfig) {
        self.configs
            .borrow_mut()
            .insert(component_id.to_string(), config);
        self.trim_history(component_id);
    }

    pub fn component_config(&self, component_id: &str) -> ComponentNotificationConfig {
        self.configs
            .borrow()
            .get(component_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_global_debug(&self, enabled: bool) {
        self.global_debug.set(enabled);
    }

    pub fn is_global_debug(&self) -> bool {
        self.global_debug.get()
    }

    pub fn is_debug_enabled(&self, component_id: &str) -> bool {
        self.global_debug.get() || self.component_config(component_id).debug
    }

    /// Queue one notification; a full batch flushes at once, otherwise a
    /// timer flushes after `batch_timeout`. Returns the queue length.
    pub fn queue_notification(&self, component_id: &str, notification: PendingNotification) -> usize {
        let config = self.component_config(component_id);
        let (len, needs_timer) = {
            let mut queues = self.queues.borrow_mut();
            let queue = queues.entry(component_id.to_string()).or_default();
            queue.items.push(notification);
            (queue.items.len(), queue.timer.is_none())
        };

        if len >= config.batch_size.max(1) {
            self.flush_component_queue(component_id);
            return 0;
        }
        if needs_timer {
            let manager = self.self_ref.clone();
            let id = component_id.to_string();
            let timer = set_timeout(config.batch_timeout, move || {
                if let Some(manager) = manager.upgrade() {
                    manager.flush_component_queue(&id);
                }
            });
            if let Some(queue) = self.queues.borrow_mut().get_mut(component_id) {
                queue.timer = Some(timer);
            }
        }
        len
    }

    pub fn batch_notify(&self, component_id: &str, notifications: Vec<PendingNotification>) {
        for notification in notifications {
            self.queue_notification(component_id, notification);
        }
    }

    /// Deliver everything queued for a component. Returns how many were sent.
    pub fn flush_component_queue(&self, component_id: &str) -> usize {
        let Some(queue) = self.queues.borrow_mut().shift_remove(component_id) else {
            return 0;
        };
        if let Some(timer) = queue.timer {
            clear_timeout(timer);
        }
        let debug = self.is_debug_enabled(component_id);
        let count = queue.items.len();
        for pending in queue.items {
            let notification = self.build(
                component_id,
                pending.kind,
                pending.level,
                pending.message,
                pending.data,
            );
            if debug {
                emit(notification.level, component_id, &notification.message);
            }
            self.record(notification.clone());
            self.base.notify(&notification);
        }
        count
    }

    pub fn queued_count(&self, component_id: &str) -> usize {
        self.queues
            .borrow()
            .get(component_id)
            .map_or(0, |queue| queue.items.len())
    }

    pub fn get_component_notifications(&self, component_id: &str) -> Vec<Notification> {
        self.history
            .borrow()
            .get(component_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_component_history(&self, component_id: &str) {
        self.history.borrow_mut().shift_remove(component_id);
    }

    /// Forget a component entirely, dropping anything still queued
    pub fn remove_component(&self, component_id: &str) {
        self.configs.borrow_mut().shift_remove(component_id);
        self.history.borrow_mut().shift_remove(component_id);
        if let Some(queue) = self.queues.borrow_mut().shift_remove(component_id) {
            if let Some(timer) = queue.timer {
                clear_timeout(timer);
            }
        }
    }

    pub fn get_notification_stats(&self) -> NotificationStats {
        let history = self.history.borrow();
        let mut by_type: IndexMap<String, usize> = IndexMap::new();
        let mut by_level: IndexMap<String, usize> = IndexMap::new();
        let mut total = 0;
        for notification in history.values().flatten() {
            total += 1;
            *by_type.entry(notification.kind.as_str().to_string()).or_default() += 1;
            *by_level.entry(notification.level.as_str().to_string()).or_default() += 1;
        }
        NotificationStats {
            total_components: history.len(),
            total_notifications: total,
            by_type,
            by_level,
            queued: self.queues.borrow().values().map(|q| q.items.len()).sum(),
            global_debug: self.global_debug.get(),
            debug_components: self
                .configs
                .borrow()
                .iter()
                .filter(|(_, config)| config.debug)
                .map(|(id, _)| id.clone())
                .collect(),
        }
    }

    fn build(
        &self,
        component_id: &str,
        kind: NotificationKind,
        level: LogLevel,
        message: String,
        data: Value,
    ) -> Notification {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        Notification {
            id,
            component_id: component_id.to_string(),
            kind,
            level,
            message,
            data,
            timestamp: now(),
        }
    }

    fn record(&self, notification: Notification) {
        let limit = self.component_config(&notification.component_id).history_size;
        let mut history = self.history.borrow_mut();
        let entries = history
            .entry(notification.component_id.clone())
            .or_default();
        entries.push_back(notification);
        while entries.len() > limit {
            entries.pop_front();
        }
    }

    fn trim_history(&self, component_id: &str) {
        let limit = self.component_config(component_id).history_size;
        if let Some(entries) = self.history.borrow_mut().get_mut(component_id) {
            while entries.len() > limit {
                entries.pop_front();
            }
        }
    }
}

impl NotifyOps for WebComponentNotificationManager {
    fn notify_lifecycle(
        &self,
        component_id: &str,
        phase: LifecyclePhase,
        timing: Option<f64>,
        data: Option<Value>,
    ) -> Notification {
        let mut payload = match data {
            Some(Value::Object(map)) => map,
            Some(other) => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
            None => Map::new(),
        };
        payload.insert("phase".to_string(), Value::from(phase.as_str()));
        if let Some(timing) = timing {
            payload.insert("timing".to_string(), Value::from(timing));
        }

        let notification = self.build(
            component_id,
            NotificationKind::Lifecycle,
            LogLevel::Info,
            format!("lifecycle: {}", phase),
            Value::Object(payload),
        );
        if self.global_debug.get() {
            emit(LogLevel::Info, component_id, &notification.message);
        }
        self.record(notification.clone());
        self.base.notify(&notification);
        notification
    }

    /// No-op unless debug is on for the component and `level` passes its
    /// configured threshold
    fn show_component_debug(
        &self,
        component_id: &str,
        message: &str,
        level: LogLevel,
        data: Option<Value>,
    ) -> bool {
        if !self.is_debug_enabled(component_id) {
            return false;
        }
        if !level.is_enabled(self.component_config(component_id).log_level) {
            return false;
        }
        let notification = self.build(
            component_id,
            NotificationKind::Debug,
            level,
            message.to_string(),
            data.unwrap_or(Value::Null),
        );
        emit(level, component_id, message);
        self.record(notification.clone());
        self.base.notify(&notification);
        true
    }
}

impl Extensible for WebComponentNotificationManager {
    fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }
}

impl Deref for WebComponentNotificationManager {
    type Target = dyn CoreNotificationManager;

    fn deref(&self) -> &Self::Target {
        self.base.as_ref()
    }
}
