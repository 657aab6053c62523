//! DOM Node
//!
//! In-memory node tree: elements, text, comments, fragments, shadow roots and
//! the document. A `Node` is a cheap handle; cloning it clones the handle, not
//! the subtree (use [`Node::clone_node`] for that).

use crate::custom_elements::CustomElement;
use crate::error::{DomError, DomResult};
use crate::event::{Event, EventListener, ListenerId};
use crate::html;
use crate::mutation::{self, MutationKind, ObserverRegistration};
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

thread_local! {
    static NEXT_LISTENER_ID: Cell<u64> = const { Cell::new(1) };
}

/// Shadow root encapsulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadowRootMode {
    Open,
    Closed,
}

/// Node type discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    DocumentFragment,
    ShadowRoot,
    Document,
}

pub(crate) struct ElementData {
    pub(crate) tag_name: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) style: IndexMap<String, String>,
    pub(crate) shadow_root: Option<Node>,
    pub(crate) template_content: Option<Node>,
    pub(crate) custom: Option<CustomElementSlot>,
}

pub(crate) struct CustomElementSlot {
    pub(crate) instance: Weak<dyn CustomElement>,
    pub(crate) observed_attributes: Vec<String>,
}

pub(crate) enum NodeKind {
    Document,
    DocumentFragment,
    ShadowRoot {
        mode: ShadowRootMode,
        host: Weak<RefCell<NodeData>>,
    },
    Element(ElementData),
    Text(String),
    Comment(String),
}

pub(crate) struct RegisteredListener {
    pub(crate) id: ListenerId,
    pub(crate) event_type: String,
    pub(crate) listener: EventListener,
}

pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<Weak<RefCell<NodeData>>>,
    pub(crate) children: Vec<Node>,
    pub(crate) listeners: Vec<RegisteredListener>,
    pub(crate) observers: Vec<ObserverRegistration>,
}

/// Handle to a DOM node
#[derive(Clone)]
pub struct Node(pub(crate) Rc<RefCell<NodeData>>);

/// Non-owning handle to a DOM node
#[derive(Clone, Default)]
pub struct WeakNode(Option<Weak<RefCell<NodeData>>>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.as_ref().and_then(Weak::upgrade).map(Node)
    }

    pub fn is_alive(&self) -> bool {
        self.upgrade().is_some()
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(node) => write!(f, "WeakNode({:?})", node),
            None => write!(f, "WeakNode(<dropped>)"),
        }
    }
}

impl Node {
    fn from_kind(kind: NodeKind) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
            observers: Vec::new(),
        })))
    }

    /// Create an element. `<template>` elements get an empty content fragment.
    pub fn new_element(tag_name: &str) -> Self {
        let tag_name = tag_name.to_ascii_lowercase();
        let template_content = if tag_name == "template" {
            Some(Node::new_fragment())
        } else {
            None
        };
        Node::from_kind(NodeKind::Element(ElementData {
            tag_name,
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            shadow_root: None,
            template_content,
            custom: None,
        }))
    }

    pub fn new_text(text: &str) -> Self {
        Node::from_kind(NodeKind::Text(text.to_string()))
    }

    pub fn new_comment(text: &str) -> Self {
        Node::from_kind(NodeKind::Comment(text.to_string()))
    }

    pub fn new_fragment() -> Self {
        Node::from_kind(NodeKind::DocumentFragment)
    }

    pub(crate) fn new_document() -> Self {
        Node::from_kind(NodeKind::Document)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Some(Rc::downgrade(&self.0)))
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ------------------------------------------------------------------
    // Kind queries
    // ------------------------------------------------------------------

    pub fn node_type(&self) -> NodeType {
        match &self.0.borrow().kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::DocumentFragment => NodeType::DocumentFragment,
            NodeKind::ShadowRoot { .. } => NodeType::ShadowRoot,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Comment(_) => NodeType::Comment,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type() == NodeType::Element
    }

    /// Fragments and shadow roots: containers that are never rendered as tags
    pub fn is_fragment_like(&self) -> bool {
        matches!(
            self.node_type(),
            NodeType::DocumentFragment | NodeType::ShadowRoot
        )
    }

    /// Lowercase tag name, `None` for non-elements
    pub fn tag_name(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(el.tag_name.clone()),
            _ => None,
        }
    }

    pub(crate) fn with_element<R>(&self, f: impl FnOnce(&ElementData) -> R) -> Option<R> {
        match &self.0.borrow().kind {
            NodeKind::Element(el) => Some(f(el)),
            _ => None,
        }
    }

    fn with_element_mut<R>(&self, f: impl FnOnce(&mut ElementData) -> R) -> DomResult<R> {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Element(el) => Ok(f(el)),
            _ => Err(DomError::NotAnElement),
        }
    }

    // ------------------------------------------------------------------
    // Tree navigation
    // ------------------------------------------------------------------

    pub fn parent(&self) -> Option<Node> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Node)
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    /// Element children only
    pub fn children(&self) -> Vec<Node> {
        self.child_nodes()
            .into_iter()
            .filter(Node::is_element)
            .collect()
    }

    pub fn first_child(&self) -> Option<Node> {
        self.0.borrow().children.first().cloned()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// All descendants in document order, excluding `self`.
    /// Shadow trees and template contents are not traversed.
    pub fn descendants(&self) -> Vec<Node> {
        let mut out = Vec::new();
        fn walk(node: &Node, out: &mut Vec<Node>) {
            for child in node.child_nodes() {
                out.push(child.clone());
                walk(&child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    pub fn is_ancestor_of(&self, other: &Node) -> bool {
        let mut current = other.parent();
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Topmost ancestor (crossing shadow boundaries into the host's tree)
    pub fn root(&self) -> Node {
        let mut current = self.clone();
        loop {
            if let Some(parent) = current.parent() {
                current = parent;
                continue;
            }
            if let Some(host) = current.host() {
                current = host;
                continue;
            }
            return current;
        }
    }

    /// Whether the node is in a document (shadow trees count through their host)
    pub fn is_connected(&self) -> bool {
        self.root().node_type() == NodeType::Document
    }

    pub fn elements_with_attribute(&self, name: &str) -> Vec<Node> {
        self.descendants()
            .into_iter()
            .filter(|n| n.has_attribute(name))
            .collect()
    }

    pub fn elements_by_tag_name(&self, tag_name: &str) -> Vec<Node> {
        let tag_name = tag_name.to_ascii_lowercase();
        self.descendants()
            .into_iter()
            .filter(|n| n.tag_name().as_deref() == Some(tag_name.as_str()))
            .collect()
    }

    pub fn element_by_id(&self, id: &str) -> Option<Node> {
        self.descendants()
            .into_iter()
            .find(|n| n.get_attribute("id").as_deref() == Some(id))
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    fn can_contain(&self, child: &Node) -> DomResult<()> {
        match self.node_type() {
            NodeType::Text | NodeType::Comment => return Err(DomError::HierarchyRequest(
                "text and comment nodes cannot have children".to_string(),
            )),
            _ => {}
        }
        match child.node_type() {
            NodeType::Document | NodeType::ShadowRoot => {
                return Err(DomError::HierarchyRequest(format!(
                    "a {:?} node cannot be inserted",
                    child.node_type()
                )))
            }
            _ => {}
        }
        if child.ptr_eq(self) || child.is_ancestor_of(self) {
            return Err(DomError::HierarchyRequest(
                "the new child is an ancestor of the parent".to_string(),
            ));
        }
        Ok(())
    }

    /// Append `child`. Fragments are emptied into `self`.
    pub fn append_child(&self, child: &Node) -> DomResult<Node> {
        self.insert_before(child, None)
    }

    /// Insert `child` before `reference` (or at the end when `None`).
    pub fn insert_before(&self, child: &Node, reference: Option<&Node>) -> DomResult<Node> {
        self.can_contain(child)?;

        let incoming = if child.node_type() == NodeType::DocumentFragment {
            let moved = child.child_nodes();
            for node in &moved {
                child.detach_child(node);
            }
            if !moved.is_empty() {
                mutation::record(child, MutationKind::ChildList, Vec::new(), moved.clone(), None, None);
            }
            moved
        } else {
            if let Some(old_parent) = child.parent() {
                old_parent.remove_child(child)?;
            }
            vec![child.clone()]
        };

        {
            let mut data = self.0.borrow_mut();
            let mut index = match reference {
                Some(reference) => data
                    .children
                    .iter()
                    .position(|c| c.ptr_eq(reference))
                    .ok_or(DomError::NotFound)?,
                None => data.children.len(),
            };
            for node in &incoming {
                node.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
                data.children.insert(index, node.clone());
                index += 1;
            }
        }

        if !incoming.is_empty() {
            mutation::record(self, MutationKind::ChildList, incoming.clone(), Vec::new(), None, None);
            if self.is_connected() {
                for node in &incoming {
                    run_connection_reactions(node, true);
                }
            }
        }
        Ok(child.clone())
    }

    fn detach_child(&self, child: &Node) -> bool {
        let mut data = self.0.borrow_mut();
        match data.children.iter().position(|c| c.ptr_eq(child)) {
            Some(index) => {
                let removed = data.children.remove(index);
                removed.0.borrow_mut().parent = None;
                true
            }
            None => false,
        }
    }

    pub fn remove_child(&self, child: &Node) -> DomResult<Node> {
        let was_connected = self.is_connected();
        if !self.detach_child(child) {
            return Err(DomError::NotFound);
        }
        mutation::record(self, MutationKind::ChildList, Vec::new(), vec![child.clone()], None, None);
        if was_connected {
            run_connection_reactions(child, false);
        }
        Ok(child.clone())
    }

    /// Detach from the parent, if any
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            let _ = parent.remove_child(self);
        }
    }

    /// Remove all children (the `innerHTML = ''` step)
    pub fn clear_children(&self) {
        let was_connected = self.is_connected();
        let removed: Vec<Node> = {
            let mut data = self.0.borrow_mut();
            std::mem::take(&mut data.children)
        };
        for node in &removed {
            node.0.borrow_mut().parent = None;
        }
        if !removed.is_empty() {
            mutation::record(self, MutationKind::ChildList, Vec::new(), removed.clone(), None, None);
            if was_connected {
                for node in &removed {
                    run_connection_reactions(node, false);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.with_element(|el| el.attributes.get(&name.to_ascii_lowercase()).cloned())
            .flatten()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.with_element(|el| el.attributes.contains_key(&name.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.with_element(|el| {
            el.attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> DomResult<()> {
        let name = name.to_ascii_lowercase();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '"' || c == '>') {
            return Err(DomError::InvalidAttributeName(name));
        }
        let old = self.with_element_mut(|el| {
            let old = el.attributes.insert(name.clone(), value.to_string());
            if name == "style" {
                el.style = parse_style_declarations(value);
            }
            old
        })?;
        mutation::record(self, MutationKind::Attributes, Vec::new(), Vec::new(), Some(name.clone()), old.clone());
        self.attribute_changed(&name, old.as_deref(), Some(value));
        Ok(())
    }

    /// Returns whether the attribute was present
    pub fn remove_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        let old = self
            .with_element_mut(|el| {
                let old = el.attributes.shift_remove(&name);
                if name == "style" {
                    el.style.clear();
                }
                old
            })
            .ok()
            .flatten();
        match old {
            Some(old) => {
                mutation::record(self, MutationKind::Attributes, Vec::new(), Vec::new(), Some(name.clone()), Some(old.clone()));
                self.attribute_changed(&name, Some(&old), None);
                true
            }
            None => false,
        }
    }

    fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        let target = self
            .with_element(|el| {
                el.custom.as_ref().and_then(|slot| {
                    if slot.observed_attributes.iter().any(|a| a == name) {
                        slot.instance.upgrade()
                    } else {
                        None
                    }
                })
            })
            .flatten();
        if let Some(instance) = target {
            instance.attribute_changed_callback(name, old, new);
        }
    }

    // ------------------------------------------------------------------
    // Inline style
    // ------------------------------------------------------------------

    pub fn set_style_property(&self, property: &str, value: &str) -> DomResult<()> {
        let serialized = self.with_element_mut(|el| {
            el.style.insert(property.to_string(), value.to_string());
            serialize_style_declarations(&el.style)
        })?;
        self.set_attribute("style", &serialized)
    }

    pub fn get_style_property(&self, property: &str) -> Option<String> {
        self.with_element(|el| el.style.get(property).cloned()).flatten()
    }

    pub fn remove_style_property(&self, property: &str) -> Option<String> {
        let (removed, serialized) = self
            .with_element_mut(|el| {
                let removed = el.style.shift_remove(property);
                (removed, serialize_style_declarations(&el.style))
            })
            .ok()?;
        if removed.is_some() {
            if serialized.is_empty() {
                self.remove_attribute("style");
            } else {
                let _ = self.set_attribute("style", &serialized);
            }
        }
        removed
    }

    // ------------------------------------------------------------------
    // Text and markup
    // ------------------------------------------------------------------

    pub fn text_content(&self) -> String {
        match &self.0.borrow().kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => return text.clone(),
            _ => {}
        }
        self.descendants()
            .iter()
            .filter_map(|n| match &n.0.borrow().kind {
                NodeKind::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_text_content(&self, text: &str) {
        let is_character_data = {
            let mut data = self.0.borrow_mut();
            match &mut data.kind {
                NodeKind::Text(value) | NodeKind::Comment(value) => {
                    *value = text.to_string();
                    true
                }
                _ => false,
            }
        };
        if is_character_data {
            mutation::record(self, MutationKind::CharacterData, Vec::new(), Vec::new(), None, None);
            return;
        }
        self.clear_children();
        if !text.is_empty() {
            let _ = self.append_child(&Node::new_text(text));
        }
    }

    /// Serialized children (template elements serialize their content)
    pub fn inner_html(&self) -> String {
        match self.template_content() {
            Some(content) => html::serialize_children(&content),
            None => html::serialize_children(self),
        }
    }

    /// Replace children with parsed markup
    pub fn set_inner_html(&self, markup: &str) {
        let target = self.template_content().unwrap_or_else(|| self.clone());
        target.clear_children();
        let fragment = html::parse_fragment(markup);
        let _ = target.append_child(&fragment);
    }

    pub fn outer_html(&self) -> String {
        html::serialize_node(self)
    }

    // ------------------------------------------------------------------
    // Cloning
    // ------------------------------------------------------------------

    /// Copy the node (and its subtree when `deep`). Listeners, shadow roots
    /// and custom-element upgrades are not copied; template content is.
    pub fn clone_node(&self, deep: bool) -> Node {
        let copy = {
            let data = self.0.borrow();
            match &data.kind {
                NodeKind::Document => Node::new_document(),
                NodeKind::DocumentFragment | NodeKind::ShadowRoot { .. } => Node::new_fragment(),
                NodeKind::Text(text) => Node::new_text(text),
                NodeKind::Comment(text) => Node::new_comment(text),
                NodeKind::Element(el) => {
                    let node = Node::new_element(&el.tag_name);
                    if let NodeKind::Element(target) = &mut node.0.borrow_mut().kind {
                        target.attributes = el.attributes.clone();
                        target.style = el.style.clone();
                        if let (Some(src), Some(dst)) = (&el.template_content, &target.template_content) {
                            for child in src.child_nodes() {
                                let cloned = child.clone_node(true);
                                cloned.0.borrow_mut().parent = Some(Rc::downgrade(&dst.0));
                                dst.0.borrow_mut().children.push(cloned);
                            }
                        }
                    }
                    node
                }
            }
        };
        if deep {
            for child in self.child_nodes() {
                let cloned = child.clone_node(true);
                cloned.0.borrow_mut().parent = Some(Rc::downgrade(&copy.0));
                copy.0.borrow_mut().children.push(cloned);
            }
        }
        copy
    }

    // ------------------------------------------------------------------
    // Shadow DOM and templates
    // ------------------------------------------------------------------

    pub fn attach_shadow(&self, mode: ShadowRootMode) -> DomResult<Node> {
        if self.shadow_root().is_some() {
            return Err(DomError::ShadowRootExists);
        }
        let root = Node::from_kind(NodeKind::ShadowRoot {
            mode,
            host: Rc::downgrade(&self.0),
        });
        self.with_element_mut(|el| el.shadow_root = Some(root.clone()))?;
        Ok(root)
    }

    pub fn shadow_root(&self) -> Option<Node> {
        self.with_element(|el| el.shadow_root.clone()).flatten()
    }

    pub fn shadow_root_mode(&self) -> Option<ShadowRootMode> {
        match &self.0.borrow().kind {
            NodeKind::ShadowRoot { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// Host element of a shadow root
    pub fn host(&self) -> Option<Node> {
        match &self.0.borrow().kind {
            NodeKind::ShadowRoot { host, .. } => host.upgrade().map(Node),
            _ => None,
        }
    }

    pub fn template_content(&self) -> Option<Node> {
        self.with_element(|el| el.template_content.clone()).flatten()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(&self, event_type: &str, listener: EventListener) -> ListenerId {
        let id = NEXT_LISTENER_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            ListenerId(id)
        });
        self.0.borrow_mut().listeners.push(RegisteredListener {
            id,
            event_type: event_type.to_string(),
            listener,
        });
        id
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut data = self.0.borrow_mut();
        let before = data.listeners.len();
        data.listeners.retain(|l| l.id != id);
        data.listeners.len() != before
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event_type == event_type)
            .count()
    }

    /// Dispatch to this node, then bubble through ancestors (and shadow hosts).
    /// Returns `false` when a listener called `prevent_default`.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        event.set_target(self);
        let mut current = Some(self.clone());
        while let Some(node) = current {
            event.set_current_target(&node);
            let snapshot: Vec<EventListener> = node
                .0
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.event_type == event.event_type())
                .map(|l| l.listener.clone())
                .collect();
            for listener in snapshot {
                listener.call(event);
                if event.is_immediate_propagation_stopped() {
                    break;
                }
            }
            if !event.bubbles() || event.is_propagation_stopped() {
                break;
            }
            current = node.parent().or_else(|| node.host());
        }
        !event.default_prevented()
    }

    // ------------------------------------------------------------------
    // Custom elements
    // ------------------------------------------------------------------

    /// Bind a custom element instance to this element. Only a weak reference
    /// is kept; the instance owns the element, not the other way round.
    pub fn upgrade(&self, instance: &Rc<dyn CustomElement>) -> DomResult<()> {
        let observed_attributes = instance.observed_attributes();
        self.with_element_mut(|el| {
            el.custom = Some(CustomElementSlot {
                instance: Rc::downgrade(instance),
                observed_attributes,
            })
        })
    }

    pub fn custom_element(&self) -> Option<Rc<dyn CustomElement>> {
        self.with_element(|el| el.custom.as_ref().and_then(|slot| slot.instance.upgrade()))
            .flatten()
    }

    pub(crate) fn observer_registrations(&self) -> Vec<ObserverRegistration> {
        self.0.borrow().observers.clone()
    }

    pub(crate) fn add_observer_registration(&self, registration: ObserverRegistration) {
        let mut data = self.0.borrow_mut();
        data.observers.retain(|r| !r.same_observer(&registration));
        data.observers.push(registration);
    }

    pub(crate) fn remove_observer_registrations(&self, observer_id: u64) {
        self.0
            .borrow_mut()
            .observers
            .retain(|r| r.observer_id() != observer_id);
    }
}

fn run_connection_reactions(node: &Node, connected: bool) {
    let mut nodes = vec![node.clone()];
    nodes.extend(node.descendants());
    for n in nodes {
        if let Some(instance) = n.custom_element() {
            if connected {
                instance.connected_callback();
            } else {
                instance.disconnected_callback();
            }
        }
    }
}

fn parse_style_declarations(value: &str) -> IndexMap<String, String> {
    value
        .split(';')
        .filter_map(|decl| {
            let (name, val) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), val.trim().to_string()))
        })
        .collect()
}

fn serialize_style_declarations(style: &IndexMap<String, String>) -> String {
    style
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.borrow().kind {
            NodeKind::Document => write!(f, "#document"),
            NodeKind::DocumentFragment => write!(f, "#document-fragment"),
            NodeKind::ShadowRoot { mode, .. } => write!(f, "#shadow-root({:?})", mode),
            NodeKind::Element(el) => write!(f, "<{}>", el.tag_name),
            NodeKind::Text(text) => write!(f, "#text({:?})", text),
            NodeKind::Comment(text) => write!(f, "#comment({:?})", text),
        }
    }
}
