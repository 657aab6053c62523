//! Template Directives
//!
//! Conditional, loop, async and composition helpers built on the engine's
//! value types. All are pure except `async_template`, whose state changes
//! when its promise settles.

use super::engine::html;
use super::result::{Conditional, Repeat, TemplateResult, TemplateValue};
use crate::util::camel_case_to_dash_case;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wc_dom::{Promise, PromiseState};

pub type ErrorTemplate = Rc<dyn Fn(&str) -> TemplateValue>;

pub fn when(condition: bool, template: impl Into<TemplateValue>) -> Conditional {
    let template = template.into();
    Conditional::new(move || {
        if condition {
            template.clone()
        } else {
            TemplateValue::Text(String::new())
        }
    })
}

pub fn when_else(
    condition: bool,
    template: impl Into<TemplateValue>,
    else_template: impl Into<TemplateValue>,
) -> Conditional {
    let template = template.into();
    let else_template = else_template.into();
    Conditional::new(move || {
        if condition {
            template.clone()
        } else {
            else_template.clone()
        }
    })
}

/// First case whose condition holds; empty when none do
pub fn choose(cases: Vec<(bool, TemplateValue)>) -> TemplateValue {
    cases
        .into_iter()
        .find(|(condition, _)| *condition)
        .map(|(_, template)| template)
        .unwrap_or_else(|| TemplateValue::Text(String::new()))
}

pub fn switch_case(
    value: impl Display,
    cases: IndexMap<String, TemplateValue>,
    default: Option<TemplateValue>,
) -> TemplateValue {
    let key = value.to_string();
    cases
        .get(&key)
        .cloned()
        .or(default)
        .unwrap_or_else(|| TemplateValue::Text(String::new()))
}

pub fn repeat<T, R>(items: impl IntoIterator<Item = T>, f: impl Fn(T, usize) -> R) -> Repeat
where
    R: Into<TemplateValue>,
{
    Repeat::new(
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| f(item, index).into())
            .collect(),
    )
}

struct AsyncState {
    value: Option<TemplateValue>,
    error: Option<String>,
}

/// Render a promise's outcome. Rendering before settlement shows the
/// placeholder; settlement alone does not re-render the host.
pub fn async_template(
    promise: &Promise<TemplateValue>,
    placeholder: Option<TemplateValue>,
    error_template: Option<ErrorTemplate>,
) -> Conditional {
    let state = Rc::new(RefCell::new(AsyncState {
        value: None,
        error: None,
    }));

    match promise.state() {
        PromiseState::Fulfilled(value) => state.borrow_mut().value = Some(value),
        PromiseState::Rejected(reason) => state.borrow_mut().error = Some(reason),
        PromiseState::Pending => {
            let on_value = state.clone();
            promise.then(move |value| on_value.borrow_mut().value = Some(value));
            let on_error = state.clone();
            promise.catch(move |reason| on_error.borrow_mut().error = Some(reason));
        }
    }

    Conditional::new(move || {
        let state = state.borrow();
        if let Some(reason) = &state.error {
            return error_template
                .as_ref()
                .map_or(TemplateValue::Null, |render| render(reason));
        }
        match &state.value {
            Some(value) => value.clone(),
            None => placeholder.clone().unwrap_or_default(),
        }
    })
}

/// Concatenate templates with a separator, keeping their listeners
pub fn join(templates: Vec<TemplateValue>, separator: &str) -> TemplateResult {
    let mut chunks: Vec<&str> = Vec::with_capacity(templates.len() + 1);
    chunks.push("");
    for _ in 1..templates.len() {
        chunks.push(separator);
    }
    if !templates.is_empty() {
        chunks.push("");
    }
    html(&chunks, templates)
}

/// Space-separated names whose flag is set
pub fn class_map(classes: &[(&str, bool)]) -> String {
    classes
        .iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inline style text from non-empty declarations
pub fn style_map(styles: &[(&str, &str)]) -> String {
    styles
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(property, value)| format!("{}: {}", camel_case_to_dash_case(property), value))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Nothing at all for `None` rather than a placeholder word
pub fn if_defined<T: Into<TemplateValue>>(value: Option<T>) -> TemplateValue {
    value.map_or(TemplateValue::Null, Into::into)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
