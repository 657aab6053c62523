//! CSS Generation and Scoping
//!
//! `generate_css` turns a nested style object into rule text. `scope_css`
//! rewrites a stylesheet so it only matches inside one component, for hosts
//! that render without a shadow root.

use crate::util::camel_case_to_dash_case;
use crate::value::display_string;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

static HOST_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":host\(([^)]*)\)").unwrap());

static COLON_HOST_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":host").unwrap());

/// At-rules whose body is itself a list of rules
const NESTING_AT_RULES: &[&str] = &["@media", "@supports", "@container", "@layer", "@document"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssRule {
    pub selector: String,
    pub content: String,
}

impl CssRule {
    pub fn new(selector: String, content: String) -> Self {
        CssRule { selector, content }
    }
}

/// Render a style object under `selector`.
///
/// Scalar entries are declarations (camelCase keys become dash-case). Object
/// entries nest: `&` stands for the parent selector, a key without `&` is a
/// descendant selector, and `@` keys wrap their body in an at-rule.
pub fn generate_css(style: &Value, selector: &str) -> String {
    let mut rules = Vec::new();
    collect_rules(style, selector, &mut rules);
    rules.join("\n")
}

fn collect_rules(style: &Value, selector: &str, rules: &mut Vec<String>) {
    let Value::Object(entries) = style else {
        return;
    };

    let mut declarations = Vec::new();
    let mut nested = Vec::new();
    for (key, value) in entries {
        match value {
            Value::Object(_) => nested.push((key, value)),
            Value::Null => {}
            other => declarations.push(format!(
                "{}: {};",
                camel_case_to_dash_case(key),
                display_string(other)
            )),
        }
    }

    if !declarations.is_empty() {
        rules.push(format!("{} {{ {} }}", selector, declarations.join(" ")));
    }

    for (key, value) in nested {
        if key.starts_with('@') {
            let body = generate_css(value, selector);
            if !body.is_empty() {
                rules.push(format!("{} {{ {} }}", key, body));
            }
        } else {
            collect_rules(value, &nested_selector(selector, key), rules);
        }
    }
}

fn nested_selector(parent: &str, key: &str) -> String {
    key.split(',')
        .map(str::trim)
        .map(|part| {
            if part.contains('&') {
                part.replace('&', parent)
            } else {
                format!("{} {}", parent, part)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a stylesheet into top-level rules. Text outside any block is dropped.
pub fn parse_rules(css: &str) -> Vec<CssRule> {
    let css = COMMENT_RE.replace_all(css, "");
    let chars: Vec<char> = css.chars().collect();
    let mut rules = Vec::new();
    let mut selector_start = 0;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ';' => {
                // Statement at-rules such as @import carry no block
                selector_start = i + 1;
            }
            '{' => {
                let mut depth = 1;
                let mut j = i + 1;
                while j < chars.len() && depth > 0 {
                    match chars[j] {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    j += 1;
                }
                let selector: String = chars[selector_start..i].iter().collect();
                let content_end = if depth == 0 { j - 1 } else { j };
                let content: String = chars[i + 1..content_end].iter().collect();
                rules.push(CssRule::new(
                    selector.trim().to_string(),
                    content.trim().to_string(),
                ));
                selector_start = j;
                i = j;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    rules
}

/// Rewrite each rule through `rule_callback` and print the result
pub fn process_rules<F>(css: &str, mut rule_callback: F) -> String
where
    F: FnMut(CssRule) -> CssRule,
{
    parse_rules(css)
        .into_iter()
        .map(|rule| {
            let rule = rule_callback(rule);
            format!("{} {{ {} }}", rule.selector, rule.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Confine a stylesheet to `[data-component-id="<id>"]`. `:host` becomes the
/// component element itself; every other selector is prefixed with it.
pub fn scope_css(css: &str, component_id: &str) -> String {
    let scope = format!("[data-component-id=\"{}\"]", component_id);
    scope_stylesheet(css, &scope)
}

fn scope_stylesheet(css: &str, scope: &str) -> String {
    process_rules(css, |rule| {
        if NESTING_AT_RULES
            .iter()
            .any(|at_rule| rule.selector.starts_with(at_rule))
        {
            let content = scope_stylesheet(&rule.content, scope);
            CssRule::new(rule.selector, content)
        } else if rule.selector.starts_with('@') {
            // @keyframes, @font-face: bodies are not selectors
            rule
        } else {
            CssRule::new(scope_selector(&rule.selector, scope), rule.content)
        }
    })
}

fn scope_selector(selector: &str, scope: &str) -> String {
    selector
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            if part.starts_with(":host") {
                let replaced = HOST_FUNCTION_RE.replace_all(part, |caps: &regex::Captures| {
                    format!("{}{}", scope, &caps[1])
                });
                COLON_HOST_RE.replace_all(&replaced, scope).to_string()
            } else {
                format!("{} {}", scope, part)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
