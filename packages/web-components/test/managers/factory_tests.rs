//! Manager Factory Tests
//!
//! Bundle construction from full, partial and missing core libraries.

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use web_components::managers::{
        create_web_component_managers, reset_shared_managers, shared_managers, BasicCoreLibrary,
        BasicDomManager, CoreDomManager, CoreLibrary, CoreNotificationManager,
        CoreStyleManager, ManagerConfig, UnavailableCoreLibrary,
    };
    use web_components::reactive::BatchConfig;
    use web_components::ManagerError;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("web_components=debug")
            .try_init();
    }

    /// Supplies a DOM manager only
    struct DomOnlyLibrary;

    impl CoreLibrary for DomOnlyLibrary {
        fn dom_manager(&self) -> Result<Rc<dyn CoreDomManager>, ManagerError> {
            Ok(Rc::new(BasicDomManager::default()))
        }

        fn style_manager(&self) -> Result<Rc<dyn CoreStyleManager>, ManagerError> {
            Err(ManagerError::CoreUnavailable("no styles".to_string()))
        }

        fn notification_manager(&self) -> Result<Rc<dyn CoreNotificationManager>, ManagerError> {
            Err(ManagerError::CoreUnavailable("no notifications".to_string()))
        }
    }

    #[test]
    fn should_build_from_basic_library() {
        init_logging();
        let managers = create_web_component_managers(&BasicCoreLibrary, &ManagerConfig::default());

        assert!(!managers.is_degraded());
        assert!(!managers.dom.base().is_fallback());
        assert!(managers.dom.base().is_initialized());
        assert_eq!(managers.style.base().name(), "StyleManager");
        assert!(!managers.notification.is_global_debug());
        assert_eq!(managers.reactive.batch_config(), &BatchConfig::default());
    }

    #[test]
    fn should_substitute_fallbacks_when_core_missing() {
        init_logging();
        let library = UnavailableCoreLibrary::new("not loaded");
        let managers = create_web_component_managers(&library, &ManagerConfig::default());

        assert!(managers.is_degraded());
        assert!(managers.dom.base().is_fallback());
        assert!(managers.style.base().is_fallback());
        assert!(managers.notification.base().is_fallback());
        assert_eq!(managers.dom.base().name(), "FallbackDomManager");
    }

    #[test]
    fn should_fill_only_missing_pieces() {
        init_logging();
        let managers = create_web_component_managers(&DomOnlyLibrary, &ManagerConfig::default());

        assert!(managers.is_degraded());
        assert!(!managers.dom.base().is_fallback());
        assert!(managers.style.base().is_fallback());
        assert!(managers.notification.base().is_fallback());
    }

    #[test]
    fn should_apply_config() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{ "debug": true, "batch": { "debounceTime": 5 } }"#).unwrap();
        assert_eq!(config.batch.max_batch_size, 100);

        let managers = create_web_component_managers(&BasicCoreLibrary, &config);
        assert!(managers.notification.is_global_debug());
        assert_eq!(managers.reactive.batch_config().debounce_time, 5.0);
    }

    #[test]
    fn should_share_bundle_per_thread() {
        reset_shared_managers();
        let first = shared_managers();
        let second = shared_managers();
        assert!(Rc::ptr_eq(&first.dom, &second.dom));
        assert!(Rc::ptr_eq(&first.reactive, &second.reactive));

        reset_shared_managers();
        let third = shared_managers();
        assert!(!Rc::ptr_eq(&first.dom, &third.dom));
    }
}
