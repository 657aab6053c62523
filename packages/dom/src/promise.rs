//! Promise
//!
//! Single-assignment result with callbacks delivered on the microtask queue.

use crate::event_loop;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

type FulfilledCallback<T> = Box<dyn FnOnce(T)>;
type RejectedCallback = Box<dyn FnOnce(String)>;

struct Inner<T> {
    state: PromiseState<T>,
    on_fulfilled: Vec<FulfilledCallback<T>>,
    on_rejected: Vec<RejectedCallback>,
}

pub struct Promise<T: Clone + 'static>(Rc<RefCell<Inner<T>>>);

/// Settles the paired promise
pub struct Resolver<T: Clone + 'static>(Promise<T>);

impl<T: Clone + 'static> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Promise(self.0.clone())
    }
}

impl<T: Clone + 'static> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Resolver(self.0.clone())
    }
}

impl<T: Clone + 'static> Promise<T> {
    pub fn new() -> (Promise<T>, Resolver<T>) {
        let promise = Promise(Rc::new(RefCell::new(Inner {
            state: PromiseState::Pending,
            on_fulfilled: Vec::new(),
            on_rejected: Vec::new(),
        })));
        (promise.clone(), Resolver(promise))
    }

    pub fn resolved(value: T) -> Promise<T> {
        let (promise, resolver) = Promise::new();
        resolver.resolve(value);
        promise
    }

    pub fn rejected(reason: impl Into<String>) -> Promise<T> {
        let (promise, resolver) = Promise::new();
        resolver.reject(reason);
        promise
    }

    pub fn state(&self) -> PromiseState<T> {
        self.0.borrow().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.0.borrow().state, PromiseState::Pending)
    }

    pub fn value(&self) -> Option<T> {
        match &self.0.borrow().state {
            PromiseState::Fulfilled(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Promise<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Run `f` (as a microtask) once fulfilled
    pub fn then(&self, f: impl FnOnce(T) + 'static) {
        let mut inner = self.0.borrow_mut();
        match &inner.state {
            PromiseState::Pending => inner.on_fulfilled.push(Box::new(f)),
            PromiseState::Fulfilled(v) => {
                let v = v.clone();
                event_loop::queue_microtask(move || f(v));
            }
            PromiseState::Rejected(_) => {}
        }
    }

    /// Run `f` (as a microtask) once rejected
    pub fn catch(&self, f: impl FnOnce(String) + 'static) {
        let mut inner = self.0.borrow_mut();
        match &inner.state {
            PromiseState::Pending => inner.on_rejected.push(Box::new(f)),
            PromiseState::Rejected(reason) => {
                let reason = reason.clone();
                event_loop::queue_microtask(move || f(reason));
            }
            PromiseState::Fulfilled(_) => {}
        }
    }
}

impl<T: Clone + 'static> Resolver<T> {
    pub fn promise(&self) -> Promise<T> {
        self.0.clone()
    }

    /// Returns `false` if the promise was already settled
    pub fn resolve(&self, value: T) -> bool {
        let callbacks = {
            let mut inner = self.0 .0.borrow_mut();
            if !matches!(inner.state, PromiseState::Pending) {
                return false;
            }
            inner.state = PromiseState::Fulfilled(value.clone());
            inner.on_rejected.clear();
            std::mem::take(&mut inner.on_fulfilled)
        };
        for callback in callbacks {
            let v = value.clone();
            event_loop::queue_microtask(move || callback(v));
        }
        true
    }

    pub fn reject(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let callbacks = {
            let mut inner = self.0 .0.borrow_mut();
            if !matches!(inner.state, PromiseState::Pending) {
                return false;
            }
            inner.state = PromiseState::Rejected(reason.clone());
            inner.on_fulfilled.clear();
            std::mem::take(&mut inner.on_rejected)
        };
        for callback in callbacks {
            let r = reason.clone();
            event_loop::queue_microtask(move || callback(r));
        }
        true
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Promise({:?})", self.0.borrow().state)
    }
}
