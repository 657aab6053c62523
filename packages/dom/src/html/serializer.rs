//! HTML Serializer

use super::tags::{is_raw_text_element, is_void_element};
use crate::node::{Node, NodeKind};

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Serialize the children of `node`
pub fn serialize_children(node: &Node) -> String {
    let raw = node.tag_name().map_or(false, |t| is_raw_text_element(&t));
    let mut out = String::new();
    for child in node.child_nodes() {
        write_node(&child, raw, &mut out);
    }
    out
}

/// Serialize `node` itself (fragments serialize as their children)
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

fn write_node(node: &Node, raw_parent: bool, out: &mut String) {
    let data = node.0.borrow();
    match &data.kind {
        NodeKind::Text(text) => {
            if raw_parent {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.tag_name);
            for (name, value) in &el.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
            out.push('>');
            if is_void_element(&el.tag_name) {
                return;
            }
            let content = el.template_content.clone();
            let tag_name = el.tag_name.clone();
            drop(data);
            match content {
                Some(content) => out.push_str(&serialize_children(&content)),
                None => out.push_str(&serialize_children(node)),
            }
            out.push_str("</");
            out.push_str(&tag_name);
            out.push('>');
        }
        NodeKind::Document | NodeKind::DocumentFragment | NodeKind::ShadowRoot { .. } => {
            drop(data);
            out.push_str(&serialize_children(node));
        }
    }
}
