//! Template Engine Tests
//!
//! Covers `html` / `css` interpolation, event markers, nested templates and
//! the template cache.

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use web_components::template::{
        clear_template_cache, create_template, process_template, render_template, repeat,
        template_cache_contains, template_cache_size, TemplateValue,
    };
    use web_components::wc_dom::{Event, Node};
    use web_components::{css, html};

    fn counter() -> (Rc<Cell<u32>>, TemplateValue) {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let listener = TemplateValue::listener(move |_| seen.set(seen.get() + 1));
        (count, listener)
    }

    mod interpolation {
        use super::*;

        #[test]
        fn should_stringify_plain_values() {
            assert_eq!(html!(["<div>", "</div>"], 42).html(), "<div>42</div>");
            assert_eq!(html!(["<div>", "</div>"], 2.5).html(), "<div>2.5</div>");
            assert_eq!(html!(["<div>", "</div>"], "text").html(), "<div>text</div>");
            assert_eq!(html!(["<div>", "</div>"], true).html(), "<div>true</div>");

            let result = html!(["<div>", "</div>"], "x");
            assert!(!result.metadata().has_events);
            assert!(!result.metadata().has_conditionals);
            assert!(!result.metadata().has_loops);
        }

        #[test]
        fn should_render_null_as_empty() {
            let missing: Option<&str> = None;
            assert_eq!(html!(["<div>", "</div>"], missing).html(), "<div></div>");
            assert_eq!(
                html!(["<div>", "</div>"], serde_json::Value::Null).html(),
                "<div></div>"
            );
        }

        #[test]
        fn should_keep_raw_values() {
            let result = html!(["<p>", " and ", "</p>"], "a", 1);
            assert_eq!(result.values().len(), 2);
            assert_eq!(result.values()[0], TemplateValue::from("a"));
            assert_eq!(result.values()[1], TemplateValue::Number(1.0));
        }

        #[test]
        fn should_stringify_listener_outside_event_position() {
            let (_, listener) = counter();
            let result = html!(["<p>", "</p>"], listener);
            assert_eq!(result.html(), "<p>[function]</p>");
            assert!(result.event_listeners().is_empty());
        }

        #[test]
        fn should_interpolate_css() {
            let color = "red";
            assert_eq!(
                css!([".a { color: ", "; width: ", "px; }"], color, 10),
                ".a { color: red; width: 10px; }"
            );
        }
    }

    mod events {
        use super::*;

        #[test]
        fn should_register_event_listener() {
            let (_, listener) = counter();
            let result = html!(["<button @click=", ">Go</button>"], listener);

            assert_eq!(
                result.html(),
                r#"<button data-event-id="__event_click_0">Go</button>"#
            );
            assert!(result.metadata().has_events);
            assert_eq!(result.event_listeners().len(), 1);
            assert_eq!(result.listener("__event_click_0").unwrap().event, "click");
        }

        #[test]
        fn should_number_ids_by_interpolation_index() {
            let (_, a) = counter();
            let (_, b) = counter();
            let result = html!(
                ["<span>", "</span><button @click=", "></button><input @input=", " />"],
                "label",
                a,
                b
            );
            assert!(result.listener("__event_click_1").is_some());
            assert!(result.listener("__event_input_2").is_some());
        }

        #[test]
        fn should_merge_nested_template_listeners() {
            let (_, listener) = counter();
            let inner = html!(["<button @click=", ">x</button>"], listener);
            let outer = html!(["<div>", "</div>"], inner);

            assert_eq!(
                outer.html(),
                r#"<div><button data-event-id="__event_click_0#0">x</button></div>"#
            );
            assert!(outer.listener("__event_click_0#0").is_some());
            assert!(outer.metadata().has_events);
        }

        #[test]
        fn should_keep_nested_ids_distinct_from_event_names() {
            let (_, listener) = counter();
            let (_, other) = counter();
            let inner = html!(["<b @x=", ">"], listener);
            let outer = html!(["<p @x_0=", ">", "</p>"], other, inner);

            assert!(outer.listener("__event_x_0_0").is_some());
            assert!(outer.listener("__event_x_0#1").is_some());
            assert_eq!(outer.event_listeners().len(), 2);
        }

        #[test]
        fn should_keep_repeat_and_nested_paths_apart() {
            let button = || {
                let (_, listener) = counter();
                html!(["<b @x=", ">"], listener)
            };
            let wrapped = html!(["<i>", "", "</i>"], "a", button());
            let items = repeat(0..1, move |_, _| button());
            let outer = html!(["<div>", "", "</div>"], wrapped, items);

            assert!(outer.listener("__event_x_0#1#0").is_some());
            assert!(outer.listener("__event_x_0#0#1").is_some());
            assert_eq!(outer.event_listeners().len(), 2);
        }
    }

    mod cache {
        use super::*;

        #[test]
        fn should_return_distinct_clones_for_same_key() {
            clear_template_cache();
            let result = html!(["<p>", "</p>"], "cached");

            let first = create_template(&result, Some("key"), None);
            let second = create_template(&result, Some("key"), None);

            assert!(!first.ptr_eq(&second));
            assert_eq!(first.inner_html(), second.inner_html());
            assert_eq!(second.inner_html(), "<p>cached</p>");
            assert_eq!(template_cache_size(), 1);
            assert!(template_cache_contains("key"));
        }

        #[test]
        fn should_rebuild_when_markup_changes() {
            clear_template_cache();
            let first = create_template(&html!(["<p>", "</p>"], 1), Some("counter"), None);
            let second = create_template(&html!(["<p>", "</p>"], 2), Some("counter"), None);

            assert_eq!(first.inner_html(), "<p>1</p>");
            assert_eq!(second.inner_html(), "<p>2</p>");
            assert_eq!(template_cache_size(), 1);
        }

        #[test]
        fn should_prefix_styles() {
            let template = create_template(&html!(["<b>x</b>"]), None, Some("b { color: red; }"));
            assert_eq!(
                template.inner_html(),
                "<style>b { color: red; }</style><b>x</b>"
            );
        }

        #[test]
        fn should_not_cache_without_key() {
            clear_template_cache();
            create_template(&html!(["<i>", "</i>"], "x"), None, None);
            assert_eq!(template_cache_size(), 0);
        }
    }

    mod processing {
        use super::*;

        #[test]
        fn should_bind_listeners_and_stamp_component() {
            let (count, listener) = counter();
            let result = html!(["<button @click=", ">Go</button>"], listener);
            let template = create_template(&result, None, None);
            let fragment = process_template(&template, &result, Some("x-demo-1"));

            let button = fragment.first_child().unwrap();
            assert_eq!(button.get_attribute("data-component").as_deref(), Some("x-demo-1"));
            assert!(!button.has_attribute("data-event-id"));

            button.dispatch_event(&Event::new("click"));
            button.dispatch_event(&Event::new("click"));
            assert_eq!(count.get(), 2);
        }

        #[test]
        fn should_bind_every_listener_on_one_element() {
            let (inputs, on_input) = counter();
            let (changes, on_change) = counter();
            let result = html!(["<input @input=", " @change=", " />"], on_input, on_change);
            let fragment = render_template(&result, None, None);

            let input = fragment.first_child().unwrap();
            input.dispatch_event(&Event::new("input"));
            input.dispatch_event(&Event::new("change"));
            assert_eq!(inputs.get(), 1);
            assert_eq!(changes.get(), 1);
            assert!(!input.has_attribute("data-component"));
        }

        #[test]
        fn should_not_touch_the_template() {
            let (_, listener) = counter();
            let result = html!(["<a @click=", ">x</a>"], listener);
            let template = create_template(&result, None, None);
            let fragment = process_template(&template, &result, None);

            let host = Node::new_element("div");
            host.append_child(&fragment).unwrap();
            assert_eq!(host.inner_html(), "<a>x</a>");
            assert!(template.inner_html().contains("data-event-id"));
        }
    }
}
