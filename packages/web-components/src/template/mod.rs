//! Template Module
//!
//! Tagged-template style rendering: `html` builds a `TemplateResult`,
//! `create_template` turns it into a cached `<template>`, and
//! `process_template` clones and binds it into a fragment.

pub mod cache;
pub mod directives;
pub mod engine;
pub mod result;

pub use cache::{
    clear_template_cache, create_template, process_template, render_template,
    template_cache_contains, template_cache_size, template_from_markup,
};
pub use directives::{
    async_template, choose, class_map, escape_html, if_defined, join, repeat, style_map,
    switch_case, when, when_else, ErrorTemplate,
};
pub use engine::{css, html, EVENT_ID_ATTR};
pub use result::{
    Conditional, EventBinding, Repeat, TemplateMetadata, TemplateResult, TemplateValue,
};
