//! HTML Tag Definitions
//!
//! Parsing rules per tag: void elements, raw-text content, implicit closing.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Tag content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    RawText,
    EscapableRawText,
    ParsableData,
}

#[derive(Debug, Clone)]
pub struct HtmlTagDefinition {
    pub closed_by_children: Vec<&'static str>,
    pub content_type: TagContentType,
    pub is_void: bool,
}

impl HtmlTagDefinition {
    fn new() -> Self {
        HtmlTagDefinition {
            closed_by_children: Vec::new(),
            content_type: TagContentType::ParsableData,
            is_void: false,
        }
    }

    fn with_void(mut self) -> Self {
        self.is_void = true;
        self
    }

    fn with_closed_by_children(mut self, children: &[&'static str]) -> Self {
        self.closed_by_children = children.to_vec();
        self
    }

    fn with_content_type(mut self, content_type: TagContentType) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn is_closed_by_child(&self, name: &str) -> bool {
        self.is_void || self.closed_by_children.iter().any(|c| *c == name)
    }
}

const BLOCK_CLOSERS_OF_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "fieldset", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "main", "nav", "ol", "p", "pre",
    "section", "table", "ul",
];

static TAG_DEFINITIONS: Lazy<HashMap<&'static str, HtmlTagDefinition>> = Lazy::new(|| {
    let mut defs = HashMap::new();
    for name in [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ] {
        defs.insert(name, HtmlTagDefinition::new().with_void());
    }
    defs.insert("p", HtmlTagDefinition::new().with_closed_by_children(BLOCK_CLOSERS_OF_P));
    defs.insert("li", HtmlTagDefinition::new().with_closed_by_children(&["li"]));
    defs.insert("dt", HtmlTagDefinition::new().with_closed_by_children(&["dt", "dd"]));
    defs.insert("dd", HtmlTagDefinition::new().with_closed_by_children(&["dt", "dd"]));
    defs.insert("option", HtmlTagDefinition::new().with_closed_by_children(&["option", "optgroup"]));
    defs.insert("optgroup", HtmlTagDefinition::new().with_closed_by_children(&["optgroup"]));
    defs.insert("tr", HtmlTagDefinition::new().with_closed_by_children(&["tr"]));
    defs.insert("td", HtmlTagDefinition::new().with_closed_by_children(&["td", "th"]));
    defs.insert("th", HtmlTagDefinition::new().with_closed_by_children(&["td", "th"]));
    for name in ["style", "script"] {
        defs.insert(name, HtmlTagDefinition::new().with_content_type(TagContentType::RawText));
    }
    for name in ["textarea", "title"] {
        defs.insert(
            name,
            HtmlTagDefinition::new().with_content_type(TagContentType::EscapableRawText),
        );
    }
    defs
});

static DEFAULT_TAG_DEFINITION: Lazy<HtmlTagDefinition> = Lazy::new(HtmlTagDefinition::new);

pub fn get_html_tag_definition(tag_name: &str) -> &'static HtmlTagDefinition {
    TAG_DEFINITIONS
        .get(tag_name.to_ascii_lowercase().as_str())
        .unwrap_or(&DEFAULT_TAG_DEFINITION)
}

pub fn is_void_element(tag_name: &str) -> bool {
    get_html_tag_definition(tag_name).is_void
}

pub fn is_raw_text_element(tag_name: &str) -> bool {
    get_html_tag_definition(tag_name).content_type != TagContentType::ParsableData
}
