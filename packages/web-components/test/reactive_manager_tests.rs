//! Reactive Manager Tests
//!
//! Property writes, attribute synchronization, computed values and batching.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use web_components::reactive::{
        BatchConfig, ReactiveManager, ReactivePropertyConfig, SetOutcome,
    };
    use web_components::wc_dom::{event_loop, Node, PromiseState};
    use web_components::PropType;

    const ID: &str = "x-counter-1";

    fn setup() -> (Rc<ReactiveManager>, Node) {
        event_loop::reset();
        let manager = ReactiveManager::new(BatchConfig::default());
        let element = Node::new_element("x-counter");
        manager.register_component(ID, &element);
        (manager, element)
    }

    fn count_config() -> ReactivePropertyConfig {
        ReactivePropertyConfig::new(json!(0))
            .with_type(PropType::Number)
            .with_attribute(true)
            .with_sync(true)
    }

    mod properties {
        use super::*;

        #[test]
        fn should_coerce_initial_value() {
            let (manager, element) = setup();
            let config = ReactivePropertyConfig::new(json!("5")).with_type(PropType::Number);
            let accessor = manager.create_reactive_property(&element, "count", config, ID);

            assert_eq!(accessor.name(), "count");
            assert_eq!(accessor.get(), Some(json!(5)));
            assert_eq!(manager.property_names(ID), vec!["count".to_string()]);
        }

        #[test]
        fn should_ignore_idempotent_writes() {
            let (manager, element) = setup();
            let calls = Rc::new(Cell::new(0));
            let seen = calls.clone();
            let config = count_config().with_on_change(move |_, _| seen.set(seen.get() + 1));
            manager.create_reactive_property(&element, "count", config, ID);

            assert_eq!(manager.set_property(ID, "count", json!(5)), SetOutcome::Changed);
            assert_eq!(manager.set_property(ID, "count", json!(5)), SetOutcome::Unchanged);
            assert_eq!(manager.set_property(ID, "count", json!("5")), SetOutcome::Unchanged);
            assert_eq!(calls.get(), 1);
        }

        #[test]
        fn should_pass_new_and_old_to_on_change() {
            let (manager, element) = setup();
            let log = Rc::new(RefCell::new(Vec::new()));
            let sink = log.clone();
            let config = count_config()
                .with_on_change(move |new, old| sink.borrow_mut().push((new.clone(), old.clone())));
            manager.create_reactive_property(&element, "count", config, ID);

            manager.set_property(ID, "count", json!(3));
            assert_eq!(*log.borrow(), vec![(json!(3), json!(0))]);
        }

        #[test]
        fn should_reject_invalid_values() {
            let (manager, element) = setup();
            let config = count_config().with_validator(|v| v.as_f64().map_or(false, |n| n >= 0.0));
            manager.create_reactive_property(&element, "count", config, ID);

            assert_eq!(manager.set_property(ID, "count", json!(-1)), SetOutcome::Rejected);
            assert_eq!(manager.get_property(ID, "count"), Some(json!(0)));
        }

        #[test]
        fn should_transform_before_storing() {
            let (manager, element) = setup();
            let config = ReactivePropertyConfig::new(json!(""))
                .with_type(PropType::String)
                .with_transform(|v| json!(v.as_str().unwrap_or_default().trim().to_uppercase()));
            manager.create_reactive_property(&element, "label", config, ID);

            manager.set_property(ID, "label", json!("  hi "));
            assert_eq!(manager.get_property(ID, "label"), Some(json!("HI")));
        }

        #[test]
        fn should_report_missing_targets() {
            let (manager, _) = setup();
            assert_eq!(manager.set_property(ID, "nope", json!(1)), SetOutcome::Missing);
            assert_eq!(manager.set_property("x-other-9", "count", json!(1)), SetOutcome::Missing);
            assert!(manager.get_property("x-other-9", "count").is_none());
            assert!(manager.accessor(ID, "nope").is_none());
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_reflect_number_property_to_attribute() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            assert_eq!(element.get_attribute("count").as_deref(), Some("0"));

            manager.set_property(ID, "count", json!(5));
            assert_eq!(element.get_attribute("count").as_deref(), Some("5"));
        }

        #[test]
        fn should_route_attribute_to_property() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);

            let outcome = manager.sync_attribute_to_property(ID, "count", Some("10"));
            assert_eq!(outcome, Some(SetOutcome::Changed));
            assert_eq!(manager.get_property(ID, "count"), Some(json!(10)));
            assert!(manager.sync_attribute_to_property(ID, "unknown", Some("1")).is_none());
        }

        #[test]
        fn should_round_trip_boolean_by_presence() {
            let (manager, element) = setup();
            let config = ReactivePropertyConfig::new(json!(false))
                .with_type(PropType::Boolean)
                .with_attribute(true)
                .with_sync(true);
            manager.create_reactive_property(&element, "disabled", config, ID);
            assert!(!element.has_attribute("disabled"));

            manager.set_property(ID, "disabled", json!(true));
            assert_eq!(element.get_attribute("disabled").as_deref(), Some(""));

            manager.set_property(ID, "disabled", json!(false));
            assert!(!element.has_attribute("disabled"));

            manager.sync_attribute_to_property(ID, "disabled", Some(""));
            assert_eq!(manager.get_property(ID, "disabled"), Some(json!(true)));
            manager.sync_attribute_to_property(ID, "disabled", None);
            assert_eq!(manager.get_property(ID, "disabled"), Some(json!(false)));
        }

        #[test]
        fn should_use_dash_case_and_named_attributes() {
            let (manager, element) = setup();
            let reflected = ReactivePropertyConfig::new(json!("a"))
                .with_attribute(true)
                .with_sync(true);
            let named = ReactivePropertyConfig::new(json!("b"))
                .with_attribute("Data-Label")
                .with_sync(true);
            manager.create_reactive_property(&element, "maxLength", reflected, ID);
            manager.create_reactive_property(&element, "label", named, ID);

            assert_eq!(element.get_attribute("max-length").as_deref(), Some("a"));
            assert_eq!(element.get_attribute("data-label").as_deref(), Some("b"));
        }

        #[test]
        fn should_not_write_attribute_without_sync() {
            let (manager, element) = setup();
            let config = ReactivePropertyConfig::new(json!(1)).with_attribute(true);
            manager.create_reactive_property(&element, "size", config, ID);
            manager.set_property(ID, "size", json!(2));

            assert!(!element.has_attribute("size"));
            manager.sync_attribute_to_property(ID, "size", Some("7"));
            assert_eq!(manager.get_property(ID, "size"), Some(json!("7")));
        }
    }

    mod computed {
        use super::*;

        #[test]
        fn should_recompute_after_dependency_changes() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            let runs = Rc::new(Cell::new(0));
            let counter = runs.clone();
            assert!(manager.create_computed(ID, "doubled", &["count"], move |deps| {
                counter.set(counter.get() + 1);
                json!(deps[0].as_i64().unwrap_or(0) * 2)
            }));

            assert_eq!(manager.get_property(ID, "doubled"), Some(json!(0)));
            assert_eq!(manager.get_property(ID, "doubled"), Some(json!(0)));
            assert_eq!(runs.get(), 1);

            manager.set_property(ID, "count", json!(4));
            assert_eq!(manager.get_property(ID, "doubled"), Some(json!(8)));
            assert_eq!(runs.get(), 2);
        }

        #[test]
        fn should_chain_computed_values() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            manager.create_computed(ID, "doubled", &["count"], |d| {
                json!(d[0].as_i64().unwrap_or(0) * 2)
            });
            manager.create_computed(ID, "label", &["doubled"], |d| json!(format!("x{}", d[0])));

            assert_eq!(manager.get_property(ID, "label"), Some(json!("x0")));
            manager.set_property(ID, "count", json!(2));
            assert_eq!(manager.get_property(ID, "label"), Some(json!("x4")));
        }

        #[test]
        fn should_refuse_unknown_component() {
            let (manager, _) = setup();
            assert!(!manager.create_computed("x-none-1", "c", &[], |_| Value::Null));
        }
    }

    mod batching {
        use super::*;

        #[test]
        fn should_share_one_flush_per_window() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);

            let first = manager.queue_batch_update(ID, "a").unwrap();
            let second = manager.queue_batch_update(ID, "b").unwrap();
            assert!(first.ptr_eq(&second));
            assert!(first.is_pending());

            event_loop::advance_by(16.0);
            assert_eq!(first.state(), PromiseState::Fulfilled(()));
            let state = manager.get_component_state(ID).unwrap();
            assert_eq!(state.flush_count, 1);
            assert!(state.batched_updates.is_empty());
            assert!(!state.has_pending_flush);
        }

        #[test]
        fn should_flush_early_at_batch_limit() {
            event_loop::reset();
            let manager = ReactiveManager::new(BatchConfig {
                debounce_time: 16.0,
                max_batch_size: 2,
            });
            let element = Node::new_element("x-counter");
            manager.register_component(ID, &element);

            manager.queue_batch_update(ID, "a");
            assert_eq!(manager.get_component_state(ID).unwrap().flush_count, 0);
            let promise = manager.queue_batch_update(ID, "b").unwrap();
            assert_eq!(manager.get_component_state(ID).unwrap().flush_count, 1);
            assert!(!promise.is_pending());
            assert_eq!(event_loop::pending_timers(), 0);
        }

        #[test]
        fn should_group_writes_in_batch_update() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            let other = ReactivePropertyConfig::new(json!("")).with_type(PropType::String);
            manager.create_reactive_property(&element, "label", other, ID);

            let promise = manager
                .batch_update(ID, || {
                    manager.set_property(ID, "count", json!(1));
                    manager.set_property(ID, "label", json!("one"));
                })
                .unwrap();

            let state = manager.get_component_state(ID).unwrap();
            assert!(!state.is_updating);
            assert_eq!(state.batched_updates, vec!["count".to_string(), "label".to_string()]);

            event_loop::run_until_idle();
            assert!(!promise.is_pending());
            assert_eq!(manager.get_component_state(ID).unwrap().flush_count, 1);
        }

        #[test]
        fn should_flush_on_demand() {
            let (manager, _) = setup();
            manager.queue_batch_update(ID, "a");
            assert_eq!(manager.flush_batch_updates(ID), 1);
            assert_eq!(manager.flush_batch_updates("x-gone-1"), 0);
            assert_eq!(event_loop::pending_timers(), 0);
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn should_drop_state_on_cleanup() {
            let (manager, element) = setup();
            let accessor = manager.create_reactive_property(&element, "count", count_config(), ID);
            manager.queue_batch_update(ID, "count");

            assert!(manager.cleanup_component(ID));
            assert!(!manager.has_component(ID));
            assert!(accessor.get().is_none());
            assert_eq!(accessor.set(json!(1)), SetOutcome::Missing);
            assert!(!manager.cleanup_component(ID));

            // The pending timer still fires harmlessly
            event_loop::run_until_idle();
        }

        #[test]
        fn should_replace_state_on_same_id_registration() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            assert_eq!(manager.get_property(ID, "count"), Some(json!(0)));

            let replacement = Node::new_element("x-counter");
            manager.register_component(ID, &replacement);
            assert_eq!(manager.get_property(ID, "count"), None);
            assert!(manager.property_names(ID).is_empty());
            assert!(manager.has_component(ID));
        }

        #[test]
        fn should_snapshot_state() {
            let (manager, element) = setup();
            manager.create_reactive_property(&element, "count", count_config(), ID);
            manager.set_property(ID, "count", json!(2));

            let state = manager.get_component_state(ID).unwrap();
            assert!(state.element_alive);
            let json = serde_json::to_value(&state).unwrap();
            assert_eq!(json["componentId"], json!(ID));
            assert_eq!(json["properties"]["count"]["value"], json!(2));
            assert_eq!(json["properties"]["count"]["type"], json!("number"));
            assert_eq!(json["properties"]["count"]["attribute"], json!("count"));
            assert_eq!(json["batchedUpdates"], json!(["count"]));
            assert_eq!(json["hasPendingFlush"], json!(true));
        }
    }
}
