//! Utility Functions

use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

/// Regex for dash-case to camelCase conversion
static DASH_CASE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+([a-z0-9])").unwrap());

static CAMEL_CASE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

thread_local! {
    static ID_COUNTERS: RefCell<HashMap<String, u64>> = RefCell::new(HashMap::new());
}

/// Convert dash-case to camelCase
pub fn dash_case_to_camel_case(input: &str) -> String {
    DASH_CASE_REGEXP
        .replace_all(input, |caps: &regex::Captures| {
            caps[1].to_uppercase()
        })
        .to_string()
}

/// Convert camelCase to dash-case. Custom properties (`--x`) are left alone.
pub fn camel_case_to_dash_case(input: &str) -> String {
    if input.starts_with("--") {
        return input.to_string();
    }
    CAMEL_CASE_REGEXP
        .replace_all(input, "$1-$2")
        .to_lowercase()
}

/// `<prefix>-<n>`, unique per prefix within this thread
pub fn generate_component_id(prefix: &str) -> String {
    ID_COUNTERS.with(|counters| {
        let mut counters = counters.borrow_mut();
        let next = counters.entry(prefix.to_string()).or_insert(0);
        *next += 1;
        format!("{}-{}", prefix, next)
    })
}

/// Prefix a CSS custom property name with `--` when missing
pub fn normalize_css_variable_name(name: &str) -> String {
    if name.starts_with("--") {
        name.to_string()
    } else {
        format!("--{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversions() {
        assert_eq!(dash_case_to_camel_case("max-value"), "maxValue");
        assert_eq!(camel_case_to_dash_case("backgroundColor"), "background-color");
        assert_eq!(camel_case_to_dash_case("--brandColor"), "--brandColor");
        assert_eq!(camel_case_to_dash_case("color"), "color");
    }

    #[test]
    fn test_generate_component_id_increments() {
        let a = generate_component_id("x-id-test");
        let b = generate_component_id("x-id-test");
        assert_ne!(a, b);
        assert!(a.starts_with("x-id-test-"));
    }

    #[test]
    fn test_normalize_css_variable_name() {
        assert_eq!(normalize_css_variable_name("primary"), "--primary");
        assert_eq!(normalize_css_variable_name("--primary"), "--primary");
    }
}
