use std::path::Path;

use super::syntax::{Array, ArrayItem, Dict, DictEntry, Lead, PlistString, Span, Value};
use crate::domain::AppError;

/// Parsed document: the root dictionary plus the text around it.
pub(super) struct ParsedDocument {
    pub prefix: Span,
    pub root: Dict,
    pub suffix: Span,
}

pub(super) fn parse(source: &str, path: &Path) -> Result<ParsedDocument, AppError> {
    let mut parser = Parser { source, bytes: source.as_bytes(), pos: 0, path };
    parser.skip_trivia()?;
    let prefix = Span::new(0, parser.pos);
    if parser.peek() != Some(b'{') {
        return Err(parser.error("expected '{' at start of property list"));
    }
    let root = parser.parse_dict()?;
    let suffix_start = parser.pos;
    parser.skip_trivia()?;
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("unexpected content after root dictionary"));
    }
    Ok(ParsedDocument { prefix, root, suffix: Span::new(suffix_start, parser.pos) })
}

/// Characters allowed in an unquoted string.
pub(super) fn is_unquoted_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'/' | b':' | b'.' | b'-')
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl Parser<'_> {
    fn error(&self, details: impl Into<String>) -> AppError {
        AppError::parse_error(self.path, self.source, self.pos, details)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, pattern: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(pattern)
    }

    fn expect(&mut self, byte: u8) -> Result<(), AppError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), AppError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.starts_with(b"//") => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.starts_with(b"/*") => {
                    let Some(end) = self.source[self.pos + 2..].find("*/") else {
                        return Err(self.error("unterminated comment"));
                    };
                    self.pos += 2 + end + 2;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, AppError> {
        match self.peek() {
            Some(b'{') => self.parse_dict().map(Value::Dict),
            Some(b'(') => self.parse_array().map(Value::Array),
            Some(b'"' | b'\'') | Some(b'<') => self.parse_string().map(Value::String),
            Some(c) if is_unquoted_char(c) => self.parse_string().map(Value::String),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_dict(&mut self) -> Result<Dict, AppError> {
        let start = self.pos;
        self.expect(b'{')?;
        let mut dict = Dict::new();
        loop {
            let lead_start = self.pos;
            self.skip_trivia()?;
            let lead = Lead::parsed(&self.source[lead_start..self.pos]);
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    dict.close_lead = lead;
                    dict.raw = Some(Span::new(start, self.pos));
                    return Ok(dict);
                }
                None => return Err(self.error("unterminated dictionary")),
                _ => {}
            }

            let key_start = self.pos;
            let key = self.parse_string()?;
            self.skip_trivia()?;
            self.expect(b'=')?;
            self.skip_trivia()?;
            let value_start = self.pos;
            let value = self.parse_value()?;
            let tail_start = self.pos;
            self.skip_trivia()?;
            let tail = self.source[tail_start..self.pos].to_string();
            self.expect(b';')?;

            dict.entries.push(DictEntry {
                lead,
                key,
                value,
                head: Some(Span::new(key_start, value_start)),
                tail,
                raw: Some(Span::new(key_start, self.pos)),
            });
        }
    }

    fn parse_array(&mut self) -> Result<Array, AppError> {
        let start = self.pos;
        self.expect(b'(')?;
        let mut array = Array::new();
        loop {
            let lead_start = self.pos;
            self.skip_trivia()?;
            let lead = Lead::parsed(&self.source[lead_start..self.pos]);
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    array.close_lead = lead;
                    array.raw = Some(Span::new(start, self.pos));
                    return Ok(array);
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }

            let value_start = self.pos;
            let value = self.parse_value()?;
            let value_end = self.pos;
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => {
                    let tail = self.source[value_end..self.pos].to_string();
                    self.pos += 1;
                    array.items.push(ArrayItem {
                        lead,
                        value,
                        tail,
                        comma: true,
                        raw: Some(Span::new(value_start, self.pos)),
                    });
                }
                Some(b')') => {
                    // Trivia before ')' belongs to the closing lead.
                    self.pos = value_end;
                    array.items.push(ArrayItem {
                        lead,
                        value,
                        tail: String::new(),
                        comma: false,
                        raw: Some(Span::new(value_start, value_end)),
                    });
                }
                _ => return Err(self.error("expected ',' or ')' in array")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<PlistString, AppError> {
        let start = self.pos;
        let text = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => self.parse_quoted(quote)?,
            Some(b'<') => {
                let Some(end) = self.source[self.pos..].find('>') else {
                    return Err(self.error("unterminated data literal"));
                };
                self.pos += end + 1;
                self.source[start..self.pos].to_string()
            }
            Some(c) if is_unquoted_char(c) => {
                while let Some(c) = self.peek() {
                    if !is_unquoted_char(c) || self.starts_with(b"//") || self.starts_with(b"/*") {
                        break;
                    }
                    self.pos += 1;
                }
                self.source[start..self.pos].to_string()
            }
            _ => return Err(self.error("expected string")),
        };
        Ok(PlistString::parsed(text, Span::new(start, self.pos)))
    }

    fn parse_quoted(&mut self, quote: u8) -> Result<String, AppError> {
        self.pos += 1;
        let mut text = String::new();
        let mut chars = self.source[self.pos..].char_indices();
        while let Some((idx, c)) = chars.next() {
            match c {
                c if c as u32 == quote as u32 => {
                    self.pos += idx + 1;
                    return Ok(text);
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else { break };
                    match escaped {
                        'n' => text.push('\n'),
                        't' => text.push('\t'),
                        'r' => text.push('\r'),
                        'a' => text.push('\u{07}'),
                        'b' => text.push('\u{08}'),
                        'f' => text.push('\u{0C}'),
                        'v' => text.push('\u{0B}'),
                        'U' => {
                            let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                            let decoded =
                                u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32);
                            match decoded {
                                Some(ch) => text.push(ch),
                                None => {
                                    self.pos += idx;
                                    return Err(self.error("invalid \\U escape"));
                                }
                            }
                        }
                        other => text.push(other),
                    }
                }
                c => text.push(c),
            }
        }
        Err(self.error("unterminated quoted string"))
    }
}
