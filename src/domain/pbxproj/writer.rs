use super::parser::is_unquoted_char;
use super::syntax::{Array, ArrayItem, Dict, DictEntry, PlistString, Value};

/// Emits a (possibly edited) tree back to text.
///
/// Clean nodes copy their source bytes; dirty nodes are rebuilt with
/// tab indentation derived from nesting depth.
pub(super) struct Writer<'a> {
    source: &'a str,
    out: String,
}

impl<'a> Writer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, out: String::with_capacity(source.len() + 1024) }
    }

    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn value(&mut self, value: &Value, depth: usize) {
        if let Some(span) = value.raw() {
            self.out.push_str(span.slice(self.source));
            return;
        }
        match value {
            Value::String(s) => self.string(s),
            Value::Dict(dict) => self.dict(dict, depth),
            Value::Array(array) => self.array(array, depth),
        }
    }

    pub fn dict(&mut self, dict: &Dict, depth: usize) {
        if let Some(span) = dict.raw {
            self.out.push_str(span.slice(self.source));
            return;
        }
        self.out.push('{');
        for entry in &dict.entries {
            entry.lead.render(&mut self.out, depth + 1);
            self.entry(entry, depth + 1);
        }
        dict.close_lead.render(&mut self.out, depth);
        self.out.push('}');
    }

    fn entry(&mut self, entry: &DictEntry, depth: usize) {
        if let Some(span) = entry.raw {
            self.out.push_str(span.slice(self.source));
            return;
        }
        match entry.head {
            Some(head) => self.out.push_str(head.slice(self.source)),
            None => {
                self.string(&entry.key);
                self.out.push_str(" = ");
            }
        }
        self.value(&entry.value, depth);
        self.out.push_str(&entry.tail);
        self.out.push(';');
    }

    fn array(&mut self, array: &Array, depth: usize) {
        self.out.push('(');
        for item in &array.items {
            item.lead.render(&mut self.out, depth + 1);
            self.item(item, depth + 1);
        }
        array.close_lead.render(&mut self.out, depth);
        self.out.push(')');
    }

    fn item(&mut self, item: &ArrayItem, depth: usize) {
        if let Some(span) = item.raw {
            self.out.push_str(span.slice(self.source));
            return;
        }
        self.value(&item.value, depth);
        self.out.push_str(&item.tail);
        if item.comma {
            self.out.push(',');
        }
    }

    fn string(&mut self, value: &PlistString) {
        if let Some(span) = value.raw {
            self.out.push_str(span.slice(self.source));
        } else {
            self.out.push_str(&quote(&value.text));
        }
        if let Some(annotation) = &value.annotation {
            self.out.push_str(" /* ");
            self.out.push_str(annotation);
            self.out.push_str(" */");
        }
    }
}

/// Render a string as Xcode would: bare when it only contains safe
/// characters, quoted and escaped otherwise.
pub fn quote(text: &str) -> String {
    let bare = !text.is_empty()
        && text.bytes().all(|c| is_unquoted_char(c) && c != b'-')
        && !text.contains("//")
        && !text.contains("/*");
    if bare {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\U{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
