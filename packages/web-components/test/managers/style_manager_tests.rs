//! Style Manager Tests
//!
//! Style object generation, scoping, component style elements, CSS variables
//! and themes.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use std::rc::Rc;
    use web_components::managers::{
        BasicStyleManager, CssScope, Extensible, StyleOps, Theme, WebComponentStyleManager,
        WEB_COMPONENTS_EXTENSION,
    };
    use web_components::wc_dom::{Document, Node, ShadowRootMode};
    use web_components::ManagerError;

    fn manager() -> WebComponentStyleManager {
        Document::reset();
        WebComponentStyleManager::new(Rc::new(BasicStyleManager::default()))
    }

    mod generation {
        use super::*;

        #[test]
        fn should_generate_nested_rules() {
            let styles = manager();
            let css = styles.generate_css(
                &json!({ "color": "red", "&:hover": { "color": "blue" } }),
                Some(".btn"),
            );
            assert_eq!(css, ".btn { color: red; }\n.btn:hover { color: blue; }");
        }

        #[test]
        fn should_default_to_host_selector() {
            let styles = manager();
            let css = styles.generate_css(&json!({ "display": "block", "marginTop": 4 }), None);
            assert_eq!(css, ":host { display: block; margin-top: 4; }");
        }

        #[test]
        fn should_nest_descendants_and_at_rules() {
            let styles = manager();
            let css = styles.generate_css(
                &json!({
                    "span": { "fontWeight": "bold" },
                    "@media (max-width: 600px)": { "fontSize": "12px" }
                }),
                Some(".card"),
            );
            assert_eq!(
                css,
                ".card span { font-weight: bold; }\n@media (max-width: 600px) { .card { font-size: 12px; } }"
            );
        }

        #[test]
        fn should_skip_empty_objects() {
            let styles = manager();
            assert_eq!(styles.generate_css(&json!({}), Some(".x")), "");
            assert_eq!(styles.generate_css(&json!("color: red"), Some(".x")), "");
        }
    }

    mod scoping {
        use super::*;

        #[test]
        fn should_scope_host_and_descendants() {
            let styles = manager();
            let css = styles.scope_css(":host { display: block; }\n.title, :host(.on) p { color: red; }", "x-card-1");
            assert_eq!(
                css,
                "[data-component-id=\"x-card-1\"] { display: block; }\n\
                 [data-component-id=\"x-card-1\"] .title, [data-component-id=\"x-card-1\"].on p { color: red; }"
            );
        }

        #[test]
        fn should_scope_inside_media_and_keep_keyframes() {
            let styles = manager();
            let css = styles.scope_css(
                "@media print { p { color: black; } } @keyframes spin { from { opacity: 0; } }",
                "x-a-1",
            );
            assert_eq!(
                css,
                "@media print { [data-component-id=\"x-a-1\"] p { color: black; } }\n\
                 @keyframes spin { from { opacity: 0; } }"
            );
        }
    }

    mod component_styles {
        use super::*;

        #[test]
        fn should_insert_style_first_and_reuse_it() {
            let styles = manager();
            let host = Node::new_element("x-card");
            let root = host.attach_shadow(ShadowRootMode::Open).unwrap();
            root.append_child(&Node::new_element("p")).unwrap();

            let style = styles.add_component_styles("x-card-1", "p { color: red; }", &root, false).unwrap();
            assert!(root.first_child().unwrap().ptr_eq(&style));
            assert_eq!(style.get_attribute("data-component-id").as_deref(), Some("x-card-1"));

            let again = styles.add_component_styles("x-card-1", "p { color: blue; }", &root, false).unwrap();
            assert!(again.ptr_eq(&style));
            assert_eq!(root.elements_by_tag_name("style").len(), 1);
            assert_eq!(style.text_content(), "p { color: blue; }");
        }

        #[test]
        fn should_merge_style_text() {
            let styles = manager();
            let root = Node::new_element("div");
            styles.add_component_styles("x-a-1", "a {}", &root, false);
            let style = styles.add_component_styles("x-a-1", "b {}", &root, true).unwrap();
            assert_eq!(style.text_content(), "a {}\nb {}");
        }

        #[test]
        fn should_remove_component_styles() {
            let styles = manager();
            let root = Node::new_element("div");
            styles.add_component_styles("x-a-1", "a {}", &root, false);

            assert!(styles.remove_component_styles("x-a-1"));
            assert_eq!(root.child_count(), 0);
            assert!(styles.get_component_styles("x-a-1").is_none());
            assert!(!styles.remove_component_styles("x-a-1"));
        }
    }

    mod variables {
        use super::*;

        #[test]
        fn should_set_variable_on_component_host() {
            let styles = manager();
            let host = Node::new_element("x-card");
            let root = host.attach_shadow(ShadowRootMode::Open).unwrap();
            styles.add_component_styles("x-card-1", "", &root, false);
            let scope = CssScope::Component("x-card-1".to_string());

            styles.set_css_variable("primary", "#f00", &scope).unwrap();
            assert_eq!(host.get_style_property("--primary").as_deref(), Some("#f00"));
            assert_eq!(styles.get_css_variable("--primary", &scope).as_deref(), Some("#f00"));

            let registration = styles.get_component_styles("x-card-1").unwrap();
            assert_eq!(registration.css_variables.get("--primary").map(String::as_str), Some("#f00"));
        }

        #[test]
        fn should_set_global_variable() {
            let styles = manager();
            styles.set_css_variable("--gap", "4px", &CssScope::Global).unwrap();
            let html = Document::current().document_element().clone();
            assert_eq!(html.get_style_property("--gap").as_deref(), Some("4px"));
            assert!(html.get_attribute("style").unwrap().contains("--gap"));
        }

        #[test]
        fn should_reject_unknown_component_scope() {
            let styles = manager();
            let scope: CssScope = "component:x-none-1".parse().unwrap();
            assert_eq!(
                styles.set_css_variable("a", "1", &scope),
                Err(ManagerError::UnknownComponent("x-none-1".to_string()))
            );
            assert!(styles.get_css_variable("a", &scope).is_none());
        }

        #[test]
        fn should_parse_scopes() {
            assert_eq!("global".parse::<CssScope>(), Ok(CssScope::Global));
            assert_eq!(
                "component:x-a-1".parse::<CssScope>(),
                Ok(CssScope::Component("x-a-1".to_string()))
            );
            assert!("component:".parse::<CssScope>().is_err());
            assert_eq!(CssScope::Component("x-a-1".to_string()).to_string(), "component:x-a-1");
        }
    }

    mod themes {
        use super::*;

        #[test]
        fn should_apply_registered_theme() {
            let styles = manager();
            let root = Node::new_element("div");
            styles.add_component_styles("x-a-1", "", &root, false);

            let mut dark = Theme::new();
            dark.insert("bg".to_string(), "#000".to_string());
            dark.insert("--fg".to_string(), "#fff".to_string());
            styles.register_theme("dark", dark);
            assert!(styles.has_theme("dark"));

            let scope = CssScope::Component("x-a-1".to_string());
            styles.apply_theme("dark", &scope).unwrap();
            assert_eq!(root.get_style_property("--bg").as_deref(), Some("#000"));
            assert_eq!(root.get_style_property("--fg").as_deref(), Some("#fff"));

            let info = styles.get_style_debug_info();
            assert_eq!(info.component_count, 1);
            assert_eq!(info.components[0].theme.as_deref(), Some("dark"));
            assert_eq!(info.themes, vec!["dark".to_string()]);
        }

        #[test]
        fn should_reject_unknown_theme() {
            let styles = manager();
            assert_eq!(
                styles.apply_theme("missing", &CssScope::Global),
                Err(ManagerError::UnknownTheme("missing".to_string()))
            );
        }
    }

    #[test]
    fn should_expose_web_components_bundle() {
        let styles = manager();
        assert!(styles.has_extension(WEB_COMPONENTS_EXTENSION));
        assert_eq!(
            styles.extensions().property(WEB_COMPONENTS_EXTENSION, "manager"),
            Some(json!("style"))
        );
    }
}
