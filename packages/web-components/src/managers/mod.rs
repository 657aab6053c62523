//! Managers Module
//!
//! Base managers from the core library, the extension mechanism, and the
//! web-component DOM / style / notification managers built on them.

pub mod core;
pub mod css;
pub mod dom;
pub mod extension;
pub mod factory;
pub mod notification;
pub mod style;

pub use self::core::{
    BasicCoreLibrary, BasicDomManager, BasicNotificationManager, BasicStyleManager, CoreDomManager,
    CoreLibrary, CoreManager, CoreNotificationManager, CoreStyleManager, FallbackDomManager,
    FallbackNotificationManager, FallbackStyleManager, NotificationObserver,
    UnavailableCoreLibrary,
};
pub use css::{generate_css, scope_css};
pub use dom::{ComponentRegistration, ElementTreeNode, WebComponentDomManager, DEFAULT_TREE_DEPTH};
pub use extension::{
    DomOps, Extensible, Extension, ExtensionMethod, ExtensionRegistry, NotifyOps, StyleOps,
    WEB_COMPONENTS_EXTENSION,
};
pub use factory::{
    create_web_component_managers, reset_shared_managers, shared_managers, ManagerBundle,
    ManagerConfig,
};
pub use notification::{
    ComponentNotificationConfig, LifecyclePhase, Notification, NotificationKind,
    NotificationStats, PendingNotification, WebComponentNotificationManager,
};
pub use style::{
    ComponentStyleRegistration, CssScope, StyleDebugInfo, Theme, WebComponentStyleManager,
};
