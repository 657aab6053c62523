//! Notification Manager Tests
//!
//! Lifecycle history, component debug gating, batching and statistics.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_components::managers::{
        BasicNotificationManager, ComponentNotificationConfig,
        LifecyclePhase, Notification, NotificationKind, NotifyOps, PendingNotification,
        WebComponentNotificationManager,
    };
    use web_components::wc_dom::event_loop;
    use web_components::LogLevel;

    const ID: &str = "x-card-1";

    fn manager() -> Rc<WebComponentNotificationManager> {
        event_loop::reset();
        WebComponentNotificationManager::new(Rc::new(BasicNotificationManager::default()))
    }

    fn observe(manager: &WebComponentNotificationManager) -> Rc<RefCell<Vec<Notification>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        manager
            .base()
            .subscribe(Rc::new(move |n: &Notification| sink.borrow_mut().push(n.clone())));
        seen
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn should_record_lifecycle_without_debug() {
            let notifications = manager();
            assert!(!notifications.is_debug_enabled(ID));

            notifications.notify_lifecycle(ID, LifecyclePhase::Connected, None, None);

            let history = notifications.get_component_notifications(ID);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].kind, NotificationKind::Lifecycle);
            assert_eq!(history[0].data["phase"], json!("connected"));
            assert_eq!(history[0].message, "lifecycle: connected");
        }

        #[test]
        fn should_merge_timing_and_data() {
            let notifications = manager();
            let sent = notifications.notify_lifecycle(
                ID,
                LifecyclePhase::AttributeChanged,
                Some(1.5),
                Some(json!({ "name": "count" })),
            );
            assert_eq!(
                sent.data,
                json!({ "name": "count", "phase": "attributeChanged", "timing": 1.5 })
            );

            let wrapped = notifications.notify_lifecycle(ID, LifecyclePhase::Updated, None, Some(json!(3)));
            assert_eq!(wrapped.data, json!({ "value": 3, "phase": "updated" }));
            assert!(wrapped.id > sent.id);
        }

        #[test]
        fn should_forward_to_base_observers() {
            let notifications = manager();
            let seen = observe(&notifications);
            notifications.notify_lifecycle(ID, LifecyclePhase::Created, None, None);

            assert_eq!(seen.borrow().len(), 1);
            assert_eq!(seen.borrow()[0].component_id, ID);
            assert_eq!(notifications.observer_count(), 1);
        }

        #[test]
        fn should_cap_history() {
            let notifications = manager();
            notifications.configure_component(
                ID,
                ComponentNotificationConfig {
                    history_size: 2,
                    ..Default::default()
                },
            );
            for phase in [
                LifecyclePhase::Created,
                LifecyclePhase::Connected,
                LifecyclePhase::Rendered,
            ] {
                notifications.notify_lifecycle(ID, phase, None, None);
            }

            let history = notifications.get_component_notifications(ID);
            assert_eq!(history.len(), 2);
            assert_eq!(history[0].data["phase"], json!("connected"));
            assert_eq!(history[1].data["phase"], json!("rendered"));
        }
    }

    mod debug {
        use super::*;

        #[test]
        fn should_ignore_debug_when_disabled() {
            let notifications = manager();
            assert!(!notifications.show_component_debug(ID, "hidden", LogLevel::Error, None));
            assert!(notifications.get_component_notifications(ID).is_empty());
        }

        #[test]
        fn should_gate_on_component_level() {
            let notifications = manager();
            notifications.configure_component(
                ID,
                ComponentNotificationConfig {
                    debug: true,
                    log_level: LogLevel::Warn,
                    ..Default::default()
                },
            );

            assert!(!notifications.show_component_debug(ID, "chatty", LogLevel::Info, None));
            assert!(notifications.show_component_debug(
                ID,
                "careful",
                LogLevel::Warn,
                Some(json!({ "k": 1 }))
            ));

            let history = notifications.get_component_notifications(ID);
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].kind, NotificationKind::Debug);
            assert_eq!(history[0].level, LogLevel::Warn);
            assert_eq!(history[0].data, json!({ "k": 1 }));
        }

        #[test]
        fn should_honor_global_debug() {
            let notifications = manager();
            notifications.set_global_debug(true);
            assert!(notifications.is_debug_enabled("x-any-1"));
            assert!(notifications.show_component_debug("x-any-1", "hi", LogLevel::Info, None));
        }
    }

    mod batching {
        use super::*;

        #[test]
        fn should_flush_after_timeout() {
            let notifications = manager();
            let seen = observe(&notifications);

            assert_eq!(notifications.queue_notification(ID, PendingNotification::custom("a", json!(1))), 1);
            assert_eq!(notifications.queue_notification(ID, PendingNotification::custom("b", json!(2))), 2);
            assert_eq!(notifications.queued_count(ID), 2);
            assert!(seen.borrow().is_empty());

            event_loop::advance_by(99.0);
            assert!(seen.borrow().is_empty());
            event_loop::advance_by(1.0);
            assert_eq!(seen.borrow().len(), 2);
            assert_eq!(notifications.queued_count(ID), 0);
            assert_eq!(seen.borrow()[0].message, "a");
            assert_eq!(seen.borrow()[1].kind, NotificationKind::Custom);
        }

        #[test]
        fn should_flush_full_batch_immediately() {
            let notifications = manager();
            notifications.configure_component(
                ID,
                ComponentNotificationConfig {
                    batch_size: 2,
                    ..Default::default()
                },
            );
            notifications.batch_notify(
                ID,
                vec![
                    PendingNotification::custom("a", json!(null)),
                    PendingNotification::custom("b", json!(null)),
                    PendingNotification::new(NotificationKind::Debug, LogLevel::Warn, "c"),
                ],
            );

            assert_eq!(notifications.get_component_notifications(ID).len(), 2);
            assert_eq!(notifications.queued_count(ID), 1);
            assert_eq!(event_loop::pending_timers(), 1);
        }

        #[test]
        fn should_drop_queue_on_remove() {
            let notifications = manager();
            notifications.queue_notification(ID, PendingNotification::custom("a", json!(null)));
            notifications.remove_component(ID);

            assert_eq!(notifications.queued_count(ID), 0);
            assert_eq!(event_loop::pending_timers(), 0);
            assert_eq!(notifications.flush_component_queue(ID), 0);
        }
    }

    #[test]
    fn should_summarize_stats() {
        let notifications = manager();
        notifications.configure_component(
            "x-b-1",
            ComponentNotificationConfig {
                debug: true,
                ..Default::default()
            },
        );
        notifications.notify_lifecycle(ID, LifecyclePhase::Created, None, None);
        notifications.notify_lifecycle("x-b-1", LifecyclePhase::Created, None, None);
        notifications.show_component_debug("x-b-1", "warned", LogLevel::Warn, None);
        notifications.queue_notification(ID, PendingNotification::custom("later", json!(null)));

        let stats = notifications.get_notification_stats();
        assert_eq!(stats.total_components, 2);
        assert_eq!(stats.total_notifications, 3);
        assert_eq!(stats.by_type.get("lifecycle"), Some(&2));
        assert_eq!(stats.by_type.get("debug"), Some(&1));
        assert_eq!(stats.by_level.get("warn"), Some(&1));
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.debug_components, vec!["x-b-1".to_string()]);

        notifications.clear_component_history(ID);
        assert_eq!(notifications.get_notification_stats().total_components, 1);
    }
}
