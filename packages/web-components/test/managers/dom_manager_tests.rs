//! DOM Manager Tests
//!
//! Shadow roots, the component registry, element trees, mutation observing
//! and the extension bundle.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;
    use web_components::managers::{
        BasicDomManager, DomOps, Extensible, Extension, WebComponentDomManager,
        WEB_COMPONENTS_EXTENSION,
    };
    use web_components::wc_dom::{event_loop, MutationObserverInit, Node, ShadowRootMode};
    use web_components::ManagerError;

    fn manager() -> WebComponentDomManager {
        event_loop::reset();
        WebComponentDomManager::new(Rc::new(BasicDomManager::default()))
    }

    mod shadow_roots {
        use super::*;

        #[test]
        fn should_attach_shadow_root() {
            let dom = manager();
            let host = Node::new_element("x-card");
            let root = dom.create_shadow_root(&host, ShadowRootMode::Open).unwrap();
            assert!(host.shadow_root().unwrap().ptr_eq(&root));
        }

        #[test]
        fn should_reuse_existing_shadow_root() {
            let dom = manager();
            let host = Node::new_element("x-card");
            let first = dom.create_shadow_root(&host, ShadowRootMode::Open).unwrap();
            let second = dom.create_shadow_root(&host, ShadowRootMode::Closed).unwrap();
            assert!(first.ptr_eq(&second));
        }

        #[test]
        fn should_refuse_shadow_root_on_text() {
            let dom = manager();
            let text = Node::new_text("x");
            let err = dom.create_shadow_root(&text, ShadowRootMode::Open).unwrap_err();
            assert!(matches!(err, ManagerError::Dom(_)));
        }
    }

    mod registry {
        use super::*;

        #[test]
        fn should_register_and_stamp_id() {
            let dom = manager();
            let host = Node::new_element("x-card");
            dom.register_component("x-card-1", &host, None);

            assert_eq!(host.get_attribute("data-component-id").as_deref(), Some("x-card-1"));
            let registration = dom.get_component("x-card-1").unwrap();
            assert!(registration.element.upgrade().unwrap().ptr_eq(&host));
            assert!(registration.last_update.is_none());
            assert!(dom.base().get_element("x-card-1").is_some());
        }

        #[test]
        fn should_keep_last_registration_for_same_id() {
            let dom = manager();
            let first = Node::new_element("x-card");
            let second = Node::new_element("x-card");
            dom.register_component("x-card-1", &first, None);
            dom.register_component("x-card-1", &second, None);

            assert_eq!(dom.registered_components(), vec!["x-card-1".to_string()]);
            let registration = dom.get_component("x-card-1").unwrap();
            assert!(registration.element.upgrade().unwrap().ptr_eq(&second));
        }

        #[test]
        fn should_unregister() {
            let dom = manager();
            let host = Node::new_element("x-card");
            dom.register_component("x-card-1", &host, None);

            assert!(dom.unregister_component("x-card-1"));
            assert!(!dom.unregister_component("x-card-1"));
            assert!(dom.get_component("x-card-1").is_none());
            assert!(dom.base().get_element("x-card-1").is_none());
        }

        #[test]
        fn should_record_renders() {
            let dom = manager();
            let host = Node::new_element("x-card");
            dom.register_component("x-card-1", &host, None);
            event_loop::advance_by(40.0);

            let template = dom.create_template("<p>x</p>", None, None);
            assert!(dom.touch_component("x-card-1", Some(template)));
            let registration = dom.get_component("x-card-1").unwrap();
            assert_eq!(registration.last_update, Some(40.0));
            assert!(registration.template.is_some());
            assert!(!dom.touch_component("x-missing-1", None));
        }
    }

    mod templates {
        use super::*;

        #[test]
        fn should_create_template_with_styles() {
            let dom = manager();
            let template = dom.create_template("<p>hi</p>", Some("p { margin: 0; }"), Some("dom-key"));
            assert_eq!(template.tag_name().as_deref(), Some("template"));
            assert_eq!(template.inner_html(), "<style>p { margin: 0; }</style><p>hi</p>");

            let again = dom.create_template("<p>hi</p>", Some("p { margin: 0; }"), Some("dom-key"));
            assert!(!template.ptr_eq(&again));
        }
    }

    mod element_tree {
        use super::*;

        #[test]
        fn should_describe_subtree() {
            let dom = manager();
            let root = Node::new_element("div");
            root.set_inner_html(r#"<ul id="list" class="a b"><li>1</li><li>2</li></ul>"#);

            let tree = dom.get_element_tree(&root, None);
            assert_eq!(tree.tag_name, "div");
            let list = &tree.children[0];
            assert_eq!(list.id.as_deref(), Some("list"));
            assert_eq!(list.classes, vec!["a".to_string(), "b".to_string()]);
            assert_eq!(list.children.len(), 2);
            assert!(!list.truncated);
        }

        #[test]
        fn should_truncate_at_depth() {
            let dom = manager();
            let root = Node::new_element("div");
            root.set_inner_html("<section><p><b>deep</b></p></section>");

            let tree = dom.get_element_tree(&root, Some(1));
            let section = &tree.children[0];
            assert!(section.children.is_empty());
            assert!(section.truncated);

            let json = serde_json::to_value(&tree).unwrap();
            assert_eq!(json["tagName"], json!("div"));
            assert_eq!(json["children"][0]["hasShadowRoot"], json!(false));
        }
    }

    mod observer {
        use super::*;

        #[test]
        fn should_deliver_records_and_stop() {
            let dom = manager();
            let target = Node::new_element("div");
            let batches = Rc::new(Cell::new(0));
            let seen = batches.clone();
            dom.start_mutation_observer(&target, MutationObserverInit::CHILD_LIST, move |records| {
                assert!(!records.is_empty());
                seen.set(seen.get() + 1);
            });
            assert!(dom.is_observing());

            target.append_child(&Node::new_element("p")).unwrap();
            event_loop::run_microtasks();
            assert_eq!(batches.get(), 1);

            assert!(dom.stop_mutation_observer());
            assert!(!dom.is_observing());
            target.append_child(&Node::new_element("p")).unwrap();
            event_loop::run_microtasks();
            assert_eq!(batches.get(), 1);
            assert!(!dom.stop_mutation_observer());
        }
    }

    mod extensions {
        use super::*;

        #[test]
        fn should_expose_web_components_bundle() {
            let dom = manager();
            assert!(dom.has_extension(WEB_COMPONENTS_EXTENSION));
            let capabilities = dom
                .call_extension(WEB_COMPONENTS_EXTENSION, "capabilities", &[])
                .unwrap();
            assert!(capabilities
                .as_array()
                .unwrap()
                .contains(&json!("shadowRoot")));
        }

        #[test]
        fn should_report_missing_extension_and_method() {
            let dom = manager();
            dom.extend("custom", Extension::new().property("answer", json!(42)));

            assert_eq!(
                dom.call_extension("nope", "x", &[]),
                Err(ManagerError::ExtensionNotFound("nope".to_string()))
            );
            assert!(matches!(
                dom.call_extension("custom", "answer", &[]),
                Err(ManagerError::NotAFunction { .. })
            ));
        }
    }
}
