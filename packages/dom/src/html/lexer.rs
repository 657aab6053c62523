//! HTML Lexer
//!
//! Converts markup into a flat token stream. The lexer never fails: anything
//! it cannot make sense of becomes text.

use super::tags::{get_html_tag_definition, TagContentType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(source: &str) -> Self {
        Cursor {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| {
            self.peek_at(i)
                .map_or(false, |p| p.to_ascii_lowercase() == c.to_ascii_lowercase())
        })
    }

    fn skip_whitespace(&mut self) {
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn is_attr_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut text = String::new();

    fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
        if !text.is_empty() {
            tokens.push(Token::Text(decode_entities(text)));
            text.clear();
        }
    }

    while !cursor.at_end() {
        if cursor.starts_with("<!--") {
            flush_text(&mut text, &mut tokens);
            cursor.pos += 4;
            let start = cursor.pos;
            while !cursor.at_end() && !cursor.starts_with("-->") {
                cursor.pos += 1;
            }
            let value = cursor.slice(start, cursor.pos);
            cursor.pos = (cursor.pos + 3).min(cursor.chars.len());
            tokens.push(Token::Comment(value));
        } else if cursor.starts_with("<!") {
            flush_text(&mut text, &mut tokens);
            cursor.pos += 2;
            let start = cursor.pos;
            while cursor.peek().map_or(false, |c| c != '>') {
                cursor.pos += 1;
            }
            let value = cursor.slice(start, cursor.pos);
            cursor.advance();
            tokens.push(Token::Doctype(value));
        } else if cursor.starts_with("</") && cursor.peek_at(2).map_or(false, is_name_start) {
            flush_text(&mut text, &mut tokens);
            cursor.pos += 2;
            let name = read_name(&mut cursor);
            while cursor.peek().map_or(false, |c| c != '>') {
                cursor.pos += 1;
            }
            cursor.advance();
            tokens.push(Token::EndTag { name });
        } else if cursor.peek() == Some('<') && cursor.peek_at(1).map_or(false, is_name_start) {
            flush_text(&mut text, &mut tokens);
            cursor.pos += 1;
            let name = read_name(&mut cursor);
            let (attrs, self_closing) = read_attributes(&mut cursor);
            let content_type = get_html_tag_definition(&name).content_type;
            tokens.push(Token::StartTag {
                name: name.clone(),
                attrs,
                self_closing,
            });
            if !self_closing && content_type != TagContentType::ParsableData {
                let raw = read_raw_text(&mut cursor, &name);
                if !raw.is_empty() {
                    let value = match content_type {
                        TagContentType::EscapableRawText => decode_entities(&raw),
                        _ => raw,
                    };
                    tokens.push(Token::Text(value));
                }
            }
        } else if let Some(c) = cursor.advance() {
            text.push(c);
        }
    }
    flush_text(&mut text, &mut tokens);
    tokens
}

fn read_name(cursor: &mut Cursor) -> String {
    let start = cursor.pos;
    while cursor.peek().map_or(false, is_name_char) {
        cursor.pos += 1;
    }
    cursor.slice(start, cursor.pos).to_ascii_lowercase()
}

fn read_attributes(cursor: &mut Cursor) -> (Vec<(String, String)>, bool) {
    let mut attrs = Vec::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => return (attrs, false),
            Some('>') => {
                cursor.advance();
                return (attrs, false);
            }
            Some('/') if cursor.peek_at(1) == Some('>') => {
                cursor.pos += 2;
                return (attrs, true);
            }
            Some(c) if is_attr_name_char(c) => {
                let start = cursor.pos;
                while cursor.peek().map_or(false, is_attr_name_char) {
                    cursor.pos += 1;
                }
                let name = cursor.slice(start, cursor.pos).to_ascii_lowercase();
                cursor.skip_whitespace();
                let value = if cursor.peek() == Some('=') {
                    cursor.advance();
                    cursor.skip_whitespace();
                    read_attribute_value(cursor)
                } else {
                    String::new()
                };
                attrs.push((name, value));
            }
            Some(_) => {
                // Stray character inside a tag
                cursor.advance();
            }
        }
    }
}

fn read_attribute_value(cursor: &mut Cursor) -> String {
    match cursor.peek() {
        Some(quote @ ('"' | '\'')) => {
            cursor.advance();
            let start = cursor.pos;
            while cursor.peek().map_or(false, |c| c != quote) {
                cursor.pos += 1;
            }
            let raw = cursor.slice(start, cursor.pos);
            cursor.advance();
            decode_entities(&raw)
        }
        _ => {
            let start = cursor.pos;
            while cursor
                .peek()
                .map_or(false, |c| !c.is_whitespace() && c != '>')
            {
                if cursor.peek() == Some('/') && cursor.peek_at(1) == Some('>') {
                    break;
                }
                cursor.pos += 1;
            }
            decode_entities(&cursor.slice(start, cursor.pos))
        }
    }
}

fn read_raw_text(cursor: &mut Cursor, tag_name: &str) -> String {
    let closing = format!("</{}", tag_name);
    let start = cursor.pos;
    while !cursor.at_end() && !cursor.starts_with_ignore_case(&closing) {
        cursor.pos += 1;
    }
    cursor.slice(start, cursor.pos)
}

/// Decode the character references templates actually produce
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').and_then(|semi| {
            let entity = &after[..semi];
            decode_entity(entity).map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}
