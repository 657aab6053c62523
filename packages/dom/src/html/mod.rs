//! HTML Module
//!
//! Tokenizer, tree builder and serializer backing `innerHTML`.

pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod tags;

pub use lexer::{decode_entities, tokenize, Token};
pub use parser::parse_fragment;
pub use serializer::{escape_attribute, escape_text, serialize_children, serialize_node};
pub use tags::{get_html_tag_definition, is_raw_text_element, is_void_element, TagContentType};
