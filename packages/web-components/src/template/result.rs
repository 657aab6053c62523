//! Template Result
//!
//! The intermediate representation produced by `html`: markup with event
//! markers, the raw interpolated values, the listener table and metadata.

use crate::value::{display_string, format_number};
use bitflags::bitflags;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use wc_dom::{Event, EventListener};

/// A value interpolated into a template
#[derive(Debug, Clone, Default)]
pub enum TemplateValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Json(Value),
    Listener(EventListener),
    Conditional(Conditional),
    Repeat(Repeat),
    Template(TemplateResult),
}

impl TemplateValue {
    pub fn listener(f: impl Fn(&Event) + 'static) -> Self {
        TemplateValue::Listener(EventListener::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Null => Ok(()),
            TemplateValue::Text(s) => f.write_str(s),
            TemplateValue::Number(n) => f.write_str(&format_number(*n)),
            TemplateValue::Bool(b) => write!(f, "{}", b),
            TemplateValue::Json(v) => f.write_str(&display_string(v)),
            TemplateValue::Listener(_) => f.write_str("[function]"),
            TemplateValue::Conditional(c) => write!(f, "{}", c.render()),
            TemplateValue::Repeat(r) => {
                for item in r.items() {
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            TemplateValue::Template(t) => f.write_str(t.html()),
        }
    }
}

impl PartialEq for TemplateValue {
    fn eq(&self, other: &Self) -> bool {
        use TemplateValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Text(a), Text(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Json(a), Json(b)) => a == b,
            (Listener(a), Listener(b)) => a.ptr_eq(b),
            (Conditional(a), Conditional(b)) => Rc::ptr_eq(&a.0, &b.0),
            (Repeat(a), Repeat(b)) => a == b,
            (Template(a), Template(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

impl From<&String> for TemplateValue {
    fn from(s: &String) -> Self {
        TemplateValue::Text(s.clone())
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for TemplateValue {
                fn from(n: $t) -> Self {
                    TemplateValue::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f32);

impl From<f64> for TemplateValue {
    fn from(n: f64) -> Self {
        TemplateValue::Number(n)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<Value> for TemplateValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => TemplateValue::Null,
            other => TemplateValue::Json(other),
        }
    }
}

impl From<&Value> for TemplateValue {
    fn from(v: &Value) -> Self {
        TemplateValue::from(v.clone())
    }
}

impl From<EventListener> for TemplateValue {
    fn from(l: EventListener) -> Self {
        TemplateValue::Listener(l)
    }
}

impl From<Conditional> for TemplateValue {
    fn from(c: Conditional) -> Self {
        TemplateValue::Conditional(c)
    }
}

impl From<Repeat> for TemplateValue {
    fn from(r: Repeat) -> Self {
        TemplateValue::Repeat(r)
    }
}

impl From<TemplateResult> for TemplateValue {
    fn from(t: TemplateResult) -> Self {
        TemplateValue::Template(t)
    }
}

impl<T: Into<TemplateValue>> From<Option<T>> for TemplateValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(TemplateValue::Null, Into::into)
    }
}

/// Deferred value, rendered when the engine splices it
#[derive(Clone)]
pub struct Conditional(Rc<dyn Fn() -> TemplateValue>);

impl Conditional {
    pub fn new(render: impl Fn() -> TemplateValue + 'static) -> Self {
        Conditional(Rc::new(render))
    }

    pub fn render(&self) -> TemplateValue {
        (self.0)()
    }
}

impl fmt::Debug for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Conditional")
    }
}

/// Loop output; the engine concatenates the items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repeat {
    items: Vec<TemplateValue>,
}

impl Repeat {
    pub fn new(items: Vec<TemplateValue>) -> Self {
        Repeat { items }
    }

    /// Loop outputs are always joined rather than stringified
    pub fn is_template(&self) -> bool {
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TemplateValue] {
        &self.items
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct TemplateFlags: u8 {
        const CONDITIONALS = 1 << 0;
        const LOOPS = 1 << 1;
        const EVENTS = 1 << 2;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub has_conditionals: bool,
    pub has_loops: bool,
    pub has_events: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl TemplateMetadata {
    pub(crate) fn from_flags(flags: TemplateFlags) -> Self {
        TemplateMetadata {
            has_conditionals: flags.contains(TemplateFlags::CONDITIONALS),
            has_loops: flags.contains(TemplateFlags::LOOPS),
            has_events: flags.contains(TemplateFlags::EVENTS),
            component_id: None,
        }
    }

    pub(crate) fn flags(&self) -> TemplateFlags {
        let mut flags = TemplateFlags::empty();
        flags.set(TemplateFlags::CONDITIONALS, self.has_conditionals);
        flags.set(TemplateFlags::LOOPS, self.has_loops);
        flags.set(TemplateFlags::EVENTS, self.has_events);
        flags
    }
}

#[derive(Debug, Clone)]
pub struct EventBinding {
    pub event: String,
    pub listener: EventListener,
}

/// Parsed template. Immutable once built.
#[derive(Debug, Clone)]
pub struct TemplateResult {
    html: String,
    values: Vec<TemplateValue>,
    event_listeners: IndexMap<String, EventBinding>,
    metadata: TemplateMetadata,
}

impl TemplateResult {
    pub(crate) fn from_parts(
        html: String,
        values: Vec<TemplateValue>,
        event_listeners: IndexMap<String, EventBinding>,
        metadata: TemplateMetadata,
    ) -> Self {
        TemplateResult {
            html,
            values,
            event_listeners,
            metadata,
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn values(&self) -> &[TemplateValue] {
        &self.values
    }

    pub fn event_listeners(&self) -> &IndexMap<String, EventBinding> {
        &self.event_listeners
    }

    pub fn listener(&self, id: &str) -> Option<&EventBinding> {
        self.event_listeners.get(id)
    }

    pub fn metadata(&self) -> &TemplateMetadata {
        &self.metadata
    }

    pub fn with_component_id(mut self, component_id: impl Into<String>) -> Self {
        self.metadata.component_id = Some(component_id.into());
        self
    }
}

impl PartialEq for TemplateResult {
    fn eq(&self, other: &Self) -> bool {
        self.html == other.html
            && self.values == other.values
            && self.metadata == other.metadata
            && self.event_listeners.len() == other.event_listeners.len()
            && self
                .event_listeners
                .iter()
                .zip(other.event_listeners.iter())
                .all(|((ka, a), (kb, b))| {
                    ka == kb && a.event == b.event && a.listener.ptr_eq(&b.listener)
                })
    }
}

impl fmt::Display for TemplateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}
