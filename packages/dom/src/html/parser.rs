//! HTML Parser
//!
//! Builds a node tree from lexer tokens. Recovery is lenient: unclosed
//! elements close at end of input, stray end tags are dropped, duplicate
//! attributes keep their first value.

use super::lexer::{tokenize, Token};
use super::tags::get_html_tag_definition;
use crate::node::Node;

struct OpenElement {
    name: String,
    /// Where children go (a template's content fragment, otherwise the element)
    container: Node,
}

/// Parse markup into a detached document fragment
pub fn parse_fragment(source: &str) -> Node {
    let root = Node::new_fragment();
    let mut stack: Vec<OpenElement> = Vec::new();

    fn current(root: &Node, stack: &[OpenElement]) -> Node {
        stack
            .last()
            .map(|open| open.container.clone())
            .unwrap_or_else(|| root.clone())
    }

    for token in tokenize(source) {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                while let Some(open) = stack.last() {
                    if get_html_tag_definition(&open.name).is_closed_by_child(&name) {
                        stack.pop();
                    } else {
                        break;
                    }
                }

                let element = Node::new_element(&name);
                for (attr, value) in attrs {
                    if !element.has_attribute(&attr) {
                        // Names come from the lexer's attribute-name rule, which set_attribute accepts
                        let _ = element.set_attribute(&attr, &value);
                    }
                }
                let _ = current(&root, &stack).append_child(&element);

                if !self_closing && !get_html_tag_definition(&name).is_void {
                    let container = element.template_content().unwrap_or(element);
                    stack.push(OpenElement { name, container });
                }
            }
            Token::EndTag { name } => {
                if let Some(index) = stack.iter().rposition(|open| open.name == name) {
                    stack.truncate(index);
                }
            }
            Token::Text(text) => {
                let _ = current(&root, &stack).append_child(&Node::new_text(&text));
            }
            Token::Comment(text) => {
                let _ = current(&root, &stack).append_child(&Node::new_comment(&text));
            }
            Token::Doctype(_) => {}
        }
    }
    root
}
