//! Template Engine
//!
//! Turns literal chunks plus interpolated values into a `TemplateResult`.
//!
//! A listener interpolated right after `@event=` becomes an event binding:
//! the marker is dropped and the open tag gets `data-event-id="<id>"`, where
//! the id is `__event_<event>_<index>`. Nested templates are spliced in with
//! their ids suffixed by `#<index>`, innermost first. Repeat items add their
//! item index ahead of the interpolation index. `#` never occurs in an event
//! name, so nested ids cannot collide with top-level ones.

use super::result::{
    EventBinding, TemplateFlags, TemplateMetadata, TemplateResult, TemplateValue,
};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;
use wc_dom::EventListener;

/// `@click=` at the very end of a chunk, optionally followed by an opening quote
static EVENT_MARKER_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"@([A-Za-z][\w:.-]*)=(["']?)$"#).unwrap());

pub(crate) static EVENT_ID_ATTR_REGEXP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-event-id="([^"]*)""#).unwrap());

pub const EVENT_ID_ATTR: &str = "data-event-id";

const NESTED_ID_SEPARATOR: char = '#';

#[derive(Default)]
struct TemplateBuilder {
    html: String,
    event_listeners: IndexMap<String, EventBinding>,
    flags: TemplateFlags,
}

impl TemplateBuilder {
    fn bind_event(&mut self, id: String, event: &str, listener: EventListener) {
        let tag_start = self.html.rfind('<').unwrap_or(0);
        let existing = EVENT_ID_ATTR_REGEXP
            .find(&self.html[tag_start..])
            .map(|m| tag_start + m.end() - 1);
        match existing {
            Some(closing_quote) => self.html.insert_str(closing_quote, &format!(" {}", id)),
            None => self
                .html
                .push_str(&format!(" {}=\"{}\"", EVENT_ID_ATTR, id)),
        }
        self.event_listeners.insert(
            id,
            EventBinding {
                event: event.to_string(),
                listener,
            },
        );
        self.flags |= TemplateFlags::EVENTS;
    }

    fn splice(&mut self, value: &TemplateValue, suffix: &str) {
        match value {
            TemplateValue::Null => {}
            TemplateValue::Listener(_) => {
                warn!("listener interpolated outside an @event= position; rendering it as text");
                self.html.push_str(&value.to_string());
            }
            TemplateValue::Conditional(conditional) => {
                self.flags |= TemplateFlags::CONDITIONALS;
                let rendered = conditional.render();
                self.splice(&rendered, suffix);
            }
            TemplateValue::Repeat(repeat) => {
                self.flags |= TemplateFlags::LOOPS;
                for (index, item) in repeat.items().iter().enumerate() {
                    self.splice(item, &format!("{}{}{}", index, NESTED_ID_SEPARATOR, suffix));
                }
            }
            TemplateValue::Template(nested) => self.merge(nested, suffix),
            TemplateValue::Text(_)
            | TemplateValue::Number(_)
            | TemplateValue::Bool(_)
            | TemplateValue::Json(_) => self.html.push_str(&value.to_string()),
        }
    }

    fn merge(&mut self, nested: &TemplateResult, suffix: &str) {
        if nested.event_listeners().is_empty() {
            self.html.push_str(nested.html());
        } else {
            let renamed = EVENT_ID_ATTR_REGEXP.replace_all(nested.html(), |caps: &Captures| {
                let ids: Vec<String> = caps[1]
                    .split_whitespace()
                    .map(|id| nested_id(id, suffix))
                    .collect();
                format!("{}=\"{}\"", EVENT_ID_ATTR, ids.join(" "))
            });
            self.html.push_str(&renamed);
            for (id, binding) in nested.event_listeners() {
                self.event_listeners
                    .insert(nested_id(id, suffix), binding.clone());
            }
        }
        self.flags |= nested.metadata().flags();
    }

    fn finish(self, values: Vec<TemplateValue>) -> TemplateResult {
        TemplateResult::from_parts(
            self.html,
            values,
            self.event_listeners,
            TemplateMetadata::from_flags(self.flags),
        )
    }
}

fn nested_id(id: &str, suffix: &str) -> String {
    format!("{}{}{}", id, NESTED_ID_SEPARATOR, suffix)
}

/// Build a template from literal chunks and the values between them.
/// `strings` normally has one more entry than `values`.
pub fn html(strings: &[&str], values: Vec<TemplateValue>) -> TemplateResult {
    let mut builder = TemplateBuilder::default();
    let mut pending_quote: Option<char> = None;

    for (index, raw_chunk) in strings.iter().enumerate() {
        let mut chunk: &str = raw_chunk;
        if let Some(quote) = pending_quote.take() {
            chunk = chunk.strip_prefix(quote).unwrap_or(chunk);
        }

        let Some(value) = values.get(index) else {
            builder.html.push_str(chunk);
            continue;
        };

        if let TemplateValue::Listener(listener) = value {
            if let Some(caps) = EVENT_MARKER_REGEXP.captures(chunk) {
                let marker_start = caps.get(0).map_or(chunk.len(), |m| m.start());
                let event = caps[1].to_string();
                pending_quote = caps[2].chars().next();
                builder.html.push_str(chunk[..marker_start].trim_end());
                builder.bind_event(
                    format!("__event_{}_{}", event, index),
                    &event,
                    listener.clone(),
                );
                continue;
            }
        }

        builder.html.push_str(chunk);
        builder.splice(value, &index.to_string());
    }

    builder.finish(values)
}

/// Plain interpolation for style blocks
pub fn css(strings: &[&str], values: Vec<TemplateValue>) -> String {
    let mut out = String::new();
    for (index, chunk) in strings.iter().enumerate() {
        out.push_str(chunk);
        if let Some(value) = values.get(index) {
            out.push_str(&value.to_string());
        }
    }
    out
}

/// `html!(["<p>", "</p>"], name)`: chunks in brackets, then the values
#[macro_export]
macro_rules! html {
    ([$($chunk:expr),* $(,)?] $(, $value:expr)* $(,)?) => {
        $crate::template::html(
            &[$($chunk),*],
            vec![$($crate::template::TemplateValue::from($value)),*],
        )
    };
}

#[macro_export]
macro_rules! css {
    ([$($chunk:expr),* $(,)?] $(, $value:expr)* $(,)?) => {
        $crate::template::css(
            &[$($chunk),*],
            vec![$($crate::template::TemplateValue::from($value)),*],
        )
    };
}
