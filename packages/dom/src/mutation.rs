//! Mutation Observers
//!
//! Records are queued per observer and delivered together in one microtask.

use crate::event_loop;
use crate::node::{Node, WeakNode};
use bitflags::bitflags;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

bitflags! {
    /// What an observer is interested in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MutationObserverInit: u32 {
        const CHILD_LIST = 0b00001;
        const ATTRIBUTES = 0b00010;
        const CHARACTER_DATA = 0b00100;
        const SUBTREE = 0b01000;
        const ATTRIBUTE_OLD_VALUE = 0b10000;
    }
}

impl Default for MutationObserverInit {
    fn default() -> Self {
        MutationObserverInit::CHILD_LIST | MutationObserverInit::ATTRIBUTES | MutationObserverInit::SUBTREE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

#[derive(Debug, Clone)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: Node,
    pub added_nodes: Vec<Node>,
    pub removed_nodes: Vec<Node>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

type ObserverCallback = Rc<dyn Fn(&[MutationRecord], &MutationObserver)>;

struct ObserverInner {
    id: u64,
    callback: ObserverCallback,
    records: RefCell<Vec<MutationRecord>>,
    scheduled: Cell<bool>,
    targets: RefCell<Vec<WeakNode>>,
}

#[derive(Clone)]
pub struct MutationObserver(Rc<ObserverInner>);

#[derive(Clone)]
pub(crate) struct ObserverRegistration {
    observer: Weak<ObserverInner>,
    observer_id: u64,
    options: MutationObserverInit,
}

impl ObserverRegistration {
    pub(crate) fn observer_id(&self) -> u64 {
        self.observer_id
    }

    pub(crate) fn same_observer(&self, other: &ObserverRegistration) -> bool {
        self.observer_id == other.observer_id
    }
}

thread_local! {
    static NEXT_OBSERVER_ID: Cell<u64> = const { Cell::new(1) };
}

impl MutationObserver {
    pub fn new(callback: impl Fn(&[MutationRecord], &MutationObserver) + 'static) -> Self {
        let id = NEXT_OBSERVER_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        MutationObserver(Rc::new(ObserverInner {
            id,
            callback: Rc::new(callback),
            records: RefCell::new(Vec::new()),
            scheduled: Cell::new(false),
            targets: RefCell::new(Vec::new()),
        }))
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Start (or re-configure) observation of `target`
    pub fn observe(&self, target: &Node, options: MutationObserverInit) {
        target.add_observer_registration(ObserverRegistration {
            observer: Rc::downgrade(&self.0),
            observer_id: self.0.id,
            options,
        });
        let mut targets = self.0.targets.borrow_mut();
        if !targets
            .iter()
            .any(|t| t.upgrade().map_or(false, |n| n.ptr_eq(target)))
        {
            targets.push(target.downgrade());
        }
    }

    /// Stop observing everything and drop queued records
    pub fn disconnect(&self) {
        let targets = std::mem::take(&mut *self.0.targets.borrow_mut());
        for target in targets.iter().filter_map(WeakNode::upgrade) {
            target.remove_observer_registrations(self.0.id);
        }
        self.0.records.borrow_mut().clear();
    }

    pub fn take_records(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut *self.0.records.borrow_mut())
    }

    pub fn is_observing(&self) -> bool {
        self.0.targets.borrow().iter().any(WeakNode::is_alive)
    }

    fn enqueue(&self, record: MutationRecord) {
        self.0.records.borrow_mut().push(record);
        if self.0.scheduled.replace(true) {
            return;
        }
        let observer = self.clone();
        event_loop::queue_microtask(move || {
            observer.0.scheduled.set(false);
            let records = observer.take_records();
            if !records.is_empty() {
                (observer.0.callback)(&records, &observer);
            }
        });
    }
}

impl fmt::Debug for MutationObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MutationObserver({})", self.0.id)
    }
}

fn wants(options: MutationObserverInit, kind: MutationKind) -> bool {
    match kind {
        MutationKind::ChildList => options.contains(MutationObserverInit::CHILD_LIST),
        MutationKind::Attributes => options.contains(MutationObserverInit::ATTRIBUTES),
        MutationKind::CharacterData => options.contains(MutationObserverInit::CHARACTER_DATA),
    }
}

/// Queue a record for every observer interested in a mutation of `target`
pub(crate) fn record(
    target: &Node,
    kind: MutationKind,
    added_nodes: Vec<Node>,
    removed_nodes: Vec<Node>,
    attribute_name: Option<String>,
    old_value: Option<String>,
) {
    let mut delivered: Vec<u64> = Vec::new();
    let mut current = Some(target.clone());
    while let Some(node) = current {
        let is_target = node.ptr_eq(target);
        for registration in node.observer_registrations() {
            if delivered.contains(&registration.observer_id) {
                continue;
            }
            if !is_target && !registration.options.contains(MutationObserverInit::SUBTREE) {
                continue;
            }
            if !wants(registration.options, kind) {
                continue;
            }
            let Some(inner) = registration.observer.upgrade() else {
                continue;
            };
            delivered.push(registration.observer_id);
            let keep_old = kind != MutationKind::Attributes
                || registration
                    .options
                    .contains(MutationObserverInit::ATTRIBUTE_OLD_VALUE);
            MutationObserver(inner).enqueue(MutationRecord {
                kind,
                target: target.clone(),
                added_nodes: added_nodes.clone(),
                removed_nodes: removed_nodes.clone(),
                attribute_name: attribute_name.clone(),
                old_value: if keep_old { old_value.clone() } else { None },
            });
        }
        current = node.parent();
    }
}
