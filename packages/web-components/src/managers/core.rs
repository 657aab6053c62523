//! Base Managers
//!
//! The minimal DOM / style / notification managers a core library provides,
//! and the degraded stand-ins used when that library is unavailable. The
//! web-component managers wrap these and layer their extensions on top.

use super::notification::Notification;
use crate::error::ManagerError;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::warn;
use wc_dom::{Node, WeakNode};

pub type NotificationObserver = Rc<dyn Fn(&Notification)>;

pub trait CoreManager {
    fn name(&self) -> &str;
    fn initialize(&self);
    fn is_initialized(&self) -> bool;
    /// Degraded stand-in for a missing core library
    fn is_fallback(&self) -> bool {
        false
    }
}

pub trait CoreDomManager: CoreManager {
    fn register_element(&self, key: &str, element: &Node);
    fn get_element(&self, key: &str) -> Option<Node>;
    fn unregister_element(&self, key: &str) -> bool;
    fn element_keys(&self) -> Vec<String>;
}

pub trait CoreStyleManager: CoreManager {
    /// Set inline style properties
    fn apply_styles(&self, element: &Node, styles: &IndexMap<String, String>);
    fn remove_styles(&self, element: &Node, properties: &[&str]);
}

pub trait CoreNotificationManager: CoreManager {
    fn subscribe(&self, observer: NotificationObserver) -> u64;
    fn unsubscribe(&self, id: u64) -> bool;
    fn notify(&self, notification: &Notification);
    fn observer_count(&self) -> usize;
}

/// Source of base managers
pub trait CoreLibrary {
    fn dom_manager(&self) -> Result<Rc<dyn CoreDomManager>, ManagerError>;
    fn style_manager(&self) -> Result<Rc<dyn CoreStyleManager>, ManagerError>;
    fn notification_manager(&self) -> Result<Rc<dyn CoreNotificationManager>, ManagerError>;
}

// ----------------------------------------------------------------------
// Basic implementations
// ----------------------------------------------------------------------

#[derive(Default)]
pub struct BasicDomManager {
    initialized: Cell<bool>,
    elements: RefCell<IndexMap<String, WeakNode>>,
}

impl CoreManager for BasicDomManager {
    fn name(&self) -> &str {
        "DomManager"
    }

    fn initialize(&self) {
        self.initialized.set(true);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.get()
    }
}

impl CoreDomManager for BasicDomManager {
    fn register_element(&self, key: &str, element: &Node) {
        self.elements
            .borrow_mut()
            .insert(key.to_string(), element.downgrade());
    }

    fn get_element(&self, key: &str) -> Option<Node> {
        self.elements.borrow().get(key)?.upgrade()
    }

    fn unregister_element(&self, key: &str) -> bool {
        self.elements.borrow_mut().shift_remove(key).is_some()
    }

    fn element_keys(&self) -> Vec<String> {
        self.elements.borrow().keys().cloned().collect()
    }
}

#[derive(Default)]
pub struct BasicStyleManager {
    initialized: Cell<bool>,
}

impl CoreManager for BasicStyleManager {
    fn name(&self) -> &str {
        "StyleManager"
    }

    fn initialize(&self) {
        self.initialized.set(true);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.get()
    }
}

impl CoreStyleManager for BasicStyleManager {
    fn apply_styles(&self, element: &Node, styles: &IndexMap<String, String>) {
        for (property, value) in styles {
            if let Err(err) = element.set_style_property(property, value) {
                warn!(property = property.as_str(), %err, "could not apply style");
            }
        }
    }

    fn remove_styles(&self, element: &Node, properties: &[&str]) {
        for property in properties {
            element.remove_style_property(property);
        }
    }
}

#[derive(Default)]
pub struct BasicNotificationManager {
    initialized: Cell<bool>,
    next_observer: Cell<u64>,
    observers: RefCell<IndexMap<u64, NotificationObserver>>,
}

impl CoreManager for BasicNotificationManager {
    fn name(&self) -> &str {
        "NotificationManager"
    }

    fn initialize(&self) {
        self.initialized.set(true);
    }

    fn is_initialized(&self) -> bool {
        self.initialized.get()
    }
}

impl CoreNotificationManager for BasicNotificationManager {
    fn subscribe(&self, observer: NotificationObserver) -> u64 {
        let id = self.next_observer.get() + 1;
        self.next_observer.set(id);
        self.observers.borrow_mut().insert(id, observer);
        id
    }

    fn unsubscribe(&self, id: u64) -> bool {
        self.observers.borrow_mut().shift_remove(&id).is_some()
    }

    fn notify(&self, notification: &Notification) {
        // Observers may subscribe or unsubscribe while being notified
        let observers: Vec<NotificationObserver> =
            self.observers.borrow().values().cloned().collect();
        for observer in observers {
            observer(notification);
        }
    }

    fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

// ----------------------------------------------------------------------
// Fallbacks
// ----------------------------------------------------------------------

macro_rules! fallback_manager {
    ($name:ident, $label:expr) => {
        #[derive(Default)]
        pub struct $name {
            initialized: Cell<bool>,
        }

        impl CoreManager for $name {
            fn name(&self) -> &str {
                $label
            }

            fn initialize(&self) {
                self.initialized.set(true);
            }

            fn is_initialized(&self) -> bool {
                self.initialized.get()
            }

            fn is_fallback(&self) -> bool {
                true
            }
        }
    };
}

fallback_manager!(FallbackDomManager, "FallbackDomManager");
fallback_manager!(FallbackStyleManager, "FallbackStyleManager");
fallback_manager!(FallbackNotificationManager, "FallbackNotificationManager");

impl CoreDomManager for FallbackDomManager {
    fn register_element(&self, _key: &str, _element: &Node) {}

    fn get_element(&self, _key: &str) -> Option<Node> {
        None
    }

    fn unregister_element(&self, _key: &str) -> bool {
        false
    }

    fn element_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

impl CoreStyleManager for FallbackStyleManager {
    fn apply_styles(&self, _element: &Node, _styles: &IndexMap<String, String>) {}

    fn remove_styles(&self, _element: &Node, _properties: &[&str]) {}
}

impl CoreNotificationManager for FallbackNotificationManager {
    fn subscribe(&self, _observer: NotificationObserver) -> u64 {
        0
    }

    fn unsubscribe(&self, _id: u64) -> bool {
        false
    }

    fn notify(&self, _notification: &Notification) {}

    fn observer_count(&self) -> usize {
        0
    }
}

// ----------------------------------------------------------------------
// Libraries
// ----------------------------------------------------------------------

/// Provides the basic managers above
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicCoreLibrary;

impl CoreLibrary for BasicCoreLibrary {
    fn dom_manager(&self) -> Result<Rc<dyn CoreDomManager>, ManagerError> {
        Ok(Rc::new(BasicDomManager::default()))
    }

    fn style_manager(&self) -> Result<Rc<dyn CoreStyleManager>, ManagerError> {
        Ok(Rc::new(BasicStyleManager::default()))
    }

    fn notification_manager(&self) -> Result<Rc<dyn CoreNotificationManager>, ManagerError> {
        Ok(Rc::new(BasicNotificationManager::default()))
    }
}

/// A core library that failed to load
#[derive(Debug, Clone)]
pub struct UnavailableCoreLibrary {
    reason: String,
}

impl UnavailableCoreLibrary {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableCoreLibrary {
            reason: reason.into(),
        }
    }

    fn error(&self) -> ManagerError {
        ManagerError::CoreUnavailable(self.reason.clone())
    }
}

impl CoreLibrary for UnavailableCoreLibrary {
    fn dom_manager(&self) -> Result<Rc<dyn CoreDomManager>, ManagerError> {
        Err(self.error())
    }

    fn style_manager(&self) -> Result<Rc<dyn CoreStyleManager>, ManagerError> {
        Err(self.error())
    }

    fn notification_manager(&self) -> Result<Rc<dyn CoreNotificationManager>, ManagerError> {
        Err(self.error())
    }
}
