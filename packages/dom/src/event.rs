//! DOM Events

use crate::node::{Node, WeakNode};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Shared event callback
#[derive(Clone)]
pub struct EventListener(Rc<dyn Fn(&Event)>);

impl EventListener {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        EventListener(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    pub fn ptr_eq(&self, other: &EventListener) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventListener({:p})", Rc::as_ptr(&self.0))
    }
}

/// A dispatched event. Flags use interior mutability so listeners only need `&Event`.
pub struct Event {
    event_type: String,
    bubbles: bool,
    detail: Value,
    target: RefCell<WeakNode>,
    current_target: RefCell<WeakNode>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
}

impl Event {
    pub fn new(event_type: &str) -> Self {
        Event {
            event_type: event_type.to_string(),
            bubbles: true,
            detail: Value::Null,
            target: RefCell::new(WeakNode::default()),
            current_target: RefCell::new(WeakNode::default()),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
        }
    }

    /// Custom event carrying a JSON payload
    pub fn custom(event_type: &str, detail: Value, bubbles: bool) -> Self {
        let mut event = Event::new(event_type);
        event.detail = detail;
        event.bubbles = bubbles;
        event
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn target(&self) -> Option<Node> {
        self.target.borrow().upgrade()
    }

    pub fn current_target(&self) -> Option<Node> {
        self.current_target.borrow().upgrade()
    }

    pub(crate) fn set_target(&self, node: &Node) {
        *self.target.borrow_mut() = node.downgrade();
    }

    pub(crate) fn set_current_target(&self, node: &Node) {
        *self.current_target.borrow_mut() = node.downgrade();
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("bubbles", &self.bubbles)
            .field("detail", &self.detail)
            .finish()
    }
}
