//! Document
//!
//! One document per thread: `<html>` with `<head>` and `<body>`.

use crate::node::Node;
use std::cell::RefCell;

#[derive(Clone, Debug)]
pub struct Document {
    node: Node,
    document_element: Node,
    head: Node,
    body: Node,
}

thread_local! {
    static CURRENT: RefCell<Option<Document>> = const { RefCell::new(None) };
}

impl Document {
    pub fn new() -> Self {
        let node = Node::new_document();
        let document_element = Node::new_element("html");
        let head = Node::new_element("head");
        let body = Node::new_element("body");
        // Fresh nodes: none of these insertions can fail
        let _ = document_element.append_child(&head);
        let _ = document_element.append_child(&body);
        let _ = node.append_child(&document_element);
        Document {
            node,
            document_element,
            head,
            body,
        }
    }

    /// This thread's document, created on first use
    pub fn current() -> Document {
        CURRENT.with(|c| c.borrow_mut().get_or_insert_with(Document::new).clone())
    }

    /// Replace this thread's document with a fresh one
    pub fn reset() -> Document {
        let document = Document::new();
        CURRENT.with(|c| *c.borrow_mut() = Some(document.clone()));
        document
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn document_element(&self) -> &Node {
        &self.document_element
    }

    pub fn head(&self) -> &Node {
        &self.head
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    pub fn create_element(&self, tag_name: &str) -> Node {
        Node::new_element(tag_name)
    }

    pub fn create_text_node(&self, text: &str) -> Node {
        Node::new_text(text)
    }

    pub fn create_document_fragment(&self) -> Node {
        Node::new_fragment()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
