//! Template Cache
//!
//! Thread-wide map from cache key to a built `<template>` element. Callers
//! always receive a fresh node; the cached one is never handed out. The cache
//! is unbounded and not scoped to components.

use super::engine::EVENT_ID_ATTR;
use super::result::TemplateResult;
use indexmap::IndexMap;
use std::cell::RefCell;
use tracing::{trace, warn};
use wc_dom::Node;

struct CachedTemplate {
    markup: String,
    template: Node,
}

thread_local! {
    static TEMPLATE_CACHE: RefCell<IndexMap<String, CachedTemplate>> = RefCell::new(IndexMap::new());
}

fn with_markup_prefix(html: &str, styles: Option<&str>) -> String {
    match styles {
        Some(styles) if !styles.trim().is_empty() => format!("<style>{}</style>{}", styles, html),
        _ => html.to_string(),
    }
}

/// Build (or reuse) a `<template>` for `result`.
///
/// A key whose cached markup differs from the new markup is rebuilt, so a
/// component re-rendering with new values under its fixed key sees them.
pub fn create_template(
    result: &TemplateResult,
    cache_key: Option<&str>,
    styles: Option<&str>,
) -> Node {
    let markup = with_markup_prefix(result.html(), styles);

    if let Some(key) = cache_key {
        let hit = TEMPLATE_CACHE.with(|cache| {
            cache
                .borrow()
                .get(key)
                .filter(|entry| entry.markup == markup)
                .map(|entry| entry.template.clone_node(true))
        });
        if let Some(template) = hit {
            trace!(key, "template cache hit");
            return template;
        }
    }

    let template = template_from_markup(&markup);
    if let Some(key) = cache_key {
        let cached = CachedTemplate {
            markup,
            template: template.clone_node(true),
        };
        TEMPLATE_CACHE.with(|cache| cache.borrow_mut().insert(key.to_string(), cached));
    }
    template
}

/// Uncached `<template>` holding `markup`
pub fn template_from_markup(markup: &str) -> Node {
    let template = Node::new_element("template");
    template.set_inner_html(markup);
    template
}

/// Clone the template's content into a fragment and bind its listeners
pub fn process_template(
    template: &Node,
    result: &TemplateResult,
    component_id: Option<&str>,
) -> Node {
    let fragment = Node::new_fragment();
    let content = template.template_content().unwrap_or_else(|| template.clone());
    for child in content.child_nodes() {
        // A fresh fragment accepts any node
        let _ = fragment.append_child(&child.clone_node(true));
    }

    for element in fragment.elements_with_attribute(EVENT_ID_ATTR) {
        let ids = element.get_attribute(EVENT_ID_ATTR).unwrap_or_default();
        for id in ids.split_whitespace() {
            match result.listener(id) {
                Some(binding) => {
                    element.add_event_listener(&binding.event, binding.listener.clone());
                }
                None => warn!(id, "no listener registered for event marker"),
            }
        }
        if let Some(component_id) = component_id {
            if let Err(err) = element.set_attribute("data-component", component_id) {
                warn!(%err, "could not stamp component id");
            }
        }
        element.remove_attribute(EVENT_ID_ATTR);
    }
    fragment
}

/// `create_template` followed by `process_template`
pub fn render_template(
    result: &TemplateResult,
    cache_key: Option<&str>,
    component_id: Option<&str>,
) -> Node {
    let template = create_template(result, cache_key, None);
    process_template(&template, result, component_id)
}

pub fn clear_template_cache() {
    TEMPLATE_CACHE.with(|cache| cache.borrow_mut().clear());
}

pub fn template_cache_size() -> usize {
    TEMPLATE_CACHE.with(|cache| cache.borrow().len())
}

pub fn template_cache_contains(key: &str) -> bool {
    TEMPLATE_CACHE.with(|cache| cache.borrow().contains_key(key))
}
