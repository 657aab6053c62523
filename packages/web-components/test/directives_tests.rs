//! Directive Tests
//!
//! Conditionals, loops, async placeholders and the attribute helpers.

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use std::rc::Rc;
    use web_components::html;
    use web_components::template::{
        async_template, choose, class_map, escape_html, if_defined, join, repeat, style_map,
        switch_case, when, when_else, ErrorTemplate, TemplateValue,
    };
    use web_components::wc_dom::{event_loop, Promise};

    mod conditionals {
        use super::*;

        #[test]
        fn should_render_when_true() {
            let result = html!(["<div>", "</div>"], when(true, html!(["<b>on</b>"])));
            assert_eq!(result.html(), "<div><b>on</b></div>");
            assert!(result.metadata().has_conditionals);
        }

        #[test]
        fn should_render_empty_when_false() {
            let result = html!(["<div>", "</div>"], when(false, html!(["<b>on</b>"])));
            assert_eq!(result.html(), "<div></div>");
        }

        #[test]
        fn should_pick_branch_with_when_else() {
            let on = html!(["<p>", "</p>"], when_else(true, "yes", "no"));
            let off = html!(["<p>", "</p>"], when_else(false, "yes", "no"));
            assert_eq!(on.html(), "<p>yes</p>");
            assert_eq!(off.html(), "<p>no</p>");
        }

        #[test]
        fn should_choose_first_matching_case() {
            let picked = choose(vec![
                (false, TemplateValue::from("a")),
                (true, TemplateValue::from("b")),
                (true, TemplateValue::from("c")),
            ]);
            assert_eq!(picked, TemplateValue::from("b"));
            assert_eq!(choose(vec![(false, "a".into())]).to_string(), "");
        }

        #[test]
        fn should_switch_on_value() {
            let mut cases = IndexMap::new();
            cases.insert("1".to_string(), TemplateValue::from("one"));
            cases.insert("2".to_string(), TemplateValue::from("two"));

            assert_eq!(switch_case(2, cases.clone(), None).to_string(), "two");
            assert_eq!(
                switch_case(3, cases.clone(), Some("other".into())).to_string(),
                "other"
            );
            assert_eq!(switch_case(3, cases, None).to_string(), "");
        }
    }

    mod loops {
        use super::*;

        #[test]
        fn should_repeat_items_in_order() {
            let items = repeat(vec!["a", "b", "c"], |item, index| {
                html!(["<li>", ":", "</li>"], index, item)
            });
            assert_eq!(items.len(), 3);
            assert!(items.is_template());

            let result = html!(["<ul>", "</ul>"], items);
            assert_eq!(result.html(), "<ul><li>0:a</li><li>1:b</li><li>2:c</li></ul>");
            assert!(result.metadata().has_loops);
        }

        #[test]
        fn should_repeat_empty_list() {
            let items = repeat(Vec::<&str>::new(), |item, _| item);
            assert!(items.is_empty());
            assert_eq!(html!(["<ul>", "</ul>"], items).html(), "<ul></ul>");
        }

        #[test]
        fn should_suffix_listener_ids_per_item() {
            let items = repeat(0..2, |_, _| {
                html!(["<button @click=", ">x</button>"], TemplateValue::listener(|_| {}))
            });
            let result = html!(["<div>", "</div>"], items);
            assert!(result.listener("__event_click_0#0#0").is_some());
            assert!(result.listener("__event_click_0#1#0").is_some());
            assert_eq!(result.event_listeners().len(), 2);
        }

        #[test]
        fn should_join_with_separator() {
            let joined = join(vec!["a".into(), "b".into(), "c".into()], ", ");
            assert_eq!(joined.html(), "a, b, c");
            assert_eq!(join(Vec::new(), ", ").html(), "");
        }
    }

    mod async_values {
        use super::*;

        #[test]
        fn should_show_placeholder_until_resolved() {
            event_loop::reset();
            let (promise, resolver) = Promise::new();
            let view = async_template(&promise, Some("loading".into()), None);

            assert_eq!(view.render().to_string(), "loading");

            resolver.resolve(TemplateValue::from("done"));
            event_loop::run_microtasks();
            assert_eq!(view.render().to_string(), "done");
        }

        #[test]
        fn should_render_settled_promise_immediately() {
            let promise = Promise::resolved(TemplateValue::from(7));
            let view = async_template(&promise, None, None);
            assert_eq!(view.render(), TemplateValue::Number(7.0));
        }

        #[test]
        fn should_render_error_template_on_rejection() {
            event_loop::reset();
            let (promise, resolver) = Promise::<TemplateValue>::new();
            let on_error: ErrorTemplate = Rc::new(|reason| format!("failed: {}", reason).into());
            let view = async_template(&promise, None, Some(on_error));

            assert!(view.render().is_null());
            resolver.reject("timeout");
            event_loop::run_microtasks();
            assert_eq!(view.render().to_string(), "failed: timeout");
        }
    }

    mod helpers {
        use super::*;

        #[test]
        fn should_build_class_list() {
            assert_eq!(
                class_map(&[("active", true), ("hidden", false), ("big", true)]),
                "active big"
            );
            assert_eq!(class_map(&[("hidden", false)]), "");
        }

        #[test]
        fn should_build_style_text() {
            assert_eq!(
                style_map(&[("backgroundColor", "red"), ("width", ""), ("font-size", "12px")]),
                "background-color: red; font-size: 12px"
            );
        }

        #[test]
        fn should_map_undefined_to_null() {
            assert!(if_defined::<&str>(None).is_null());
            assert_eq!(if_defined(Some("x")), TemplateValue::from("x"));
        }

        #[test]
        fn should_escape_markup() {
            assert_eq!(
                escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
                "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
            );
        }
    }
}
