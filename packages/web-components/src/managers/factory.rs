//! Manager Factory
//!
//! Builds the manager bundle a component host runs on. A core library that
//! cannot supply a base manager never fails construction: the gap is logged
//! and a fallback base is used instead.

use super::core::{
    BasicCoreLibrary, CoreDomManager, CoreLibrary, CoreNotificationManager, CoreStyleManager,
    FallbackDomManager, FallbackNotificationManager, FallbackStyleManager,
};
use super::dom::WebComponentDomManager;
use super::notification::WebComponentNotificationManager;
use super::style::WebComponentStyleManager;
use crate::reactive::{BatchConfig, ReactiveManager};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagerConfig {
    pub batch: BatchConfig,
    /// Global notification debug mode
    pub debug: bool,
}

#[derive(Clone)]
pub struct ManagerBundle {
    pub dom: Rc<WebComponentDomManager>,
    pub style: Rc<WebComponentStyleManager>,
    pub notification: Rc<WebComponentNotificationManager>,
    pub reactive: Rc<ReactiveManager>,
    degraded: bool,
}

impl ManagerBundle {
    /// Whether any base manager is a fallback
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

thread_local! {
    static SHARED_MANAGERS: RefCell<Option<ManagerBundle>> = const { RefCell::new(None) };
}

/// This thread's default bundle, built from `BasicCoreLibrary` on first use
pub fn shared_managers() -> ManagerBundle {
    SHARED_MANAGERS.with(|shared| {
        shared
            .borrow_mut()
            .get_or_insert_with(|| {
                create_web_component_managers(&BasicCoreLibrary, &ManagerConfig::default())
            })
            .clone()
    })
}

/// Drop the shared bundle so the next `shared_managers` builds a fresh one
pub fn reset_shared_managers() {
    SHARED_MANAGERS.with(|shared| shared.borrow_mut().take());
}

pub fn create_web_component_managers(
    library: &dyn CoreLibrary,
    config: &ManagerConfig,
) -> ManagerBundle {
    let mut degraded = false;

    let dom_base: Rc<dyn CoreDomManager> = library.dom_manager().unwrap_or_else(|err| {
        warn!(%err, "core DomManager unavailable; using fallback");
        degraded = true;
        Rc::new(FallbackDomManager::default())
    });
    let style_base: Rc<dyn CoreStyleManager> = library.style_manager().unwrap_or_else(|err| {
        warn!(%err, "core StyleManager unavailable; using fallback");
        degraded = true;
        Rc::new(FallbackStyleManager::default())
    });
    let notification_base: Rc<dyn CoreNotificationManager> =
        library.notification_manager().unwrap_or_else(|err| {
            warn!(%err, "core NotificationManager unavailable; using fallback");
            degraded = true;
            Rc::new(FallbackNotificationManager::default())
        });

    let notification = WebComponentNotificationManager::new(notification_base);
    notification.set_global_debug(config.debug);

    ManagerBundle {
        dom: Rc::new(WebComponentDomManager::new(dom_base)),
        style: Rc::new(WebComponentStyleManager::new(style_base)),
        notification,
        reactive: ReactiveManager::new(config.batch.clone()),
        degraded,
    }
}
