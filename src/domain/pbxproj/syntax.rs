//! Lossless syntax tree for OpenStep-style property lists.
//!
//! Every parsed node remembers the byte span it came from. A node stays
//! *clean* until it is reached through a mutable accessor; clean nodes are
//! re-emitted by copying their original bytes, dirty nodes are rebuilt from
//! their children. Whitespace and comments between siblings are kept as
//! [`Lead`] trivia so removals and insertions touch only their own lines.

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn slice(self, source: &str) -> &str {
        &source[self.start..self.end]
    }
}

/// Trivia preceding a dictionary entry, array item, or closing bracket.
///
/// `pre` holds everything up to the last line break (section comments and
/// blank lines); `indent` is the final line break plus indentation. A `None`
/// indent is rendered from the nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lead {
    pub pre: String,
    pub indent: Option<String>,
}

impl Lead {
    pub fn parsed(text: &str) -> Self {
        match text.rfind('\n') {
            Some(idx) => {
                Self { pre: text[..idx].to_string(), indent: Some(text[idx..].to_string()) }
            }
            None => Self { pre: String::new(), indent: Some(text.to_string()) },
        }
    }

    /// Lead rendered from depth, with no preceding trivia.
    pub fn auto() -> Self {
        Self::default()
    }

    /// Lead sharing another lead's indentation but none of its trivia.
    pub fn like(other: &Lead) -> Self {
        Self { pre: String::new(), indent: other.indent.clone() }
    }

    pub fn render(&self, out: &mut String, depth: usize) {
        out.push_str(&self.pre);
        match &self.indent {
            Some(indent) => out.push_str(indent),
            None => {
                out.push('\n');
                out.extend(std::iter::repeat_n('\t', depth));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    String(PlistString),
    Dict(Dict),
    Array(Array),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.text()),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn raw(&self) -> Option<Span> {
        match self {
            Value::String(s) => s.raw,
            Value::Dict(d) => d.raw,
            Value::Array(a) => a.raw,
        }
    }
}

impl From<PlistString> for Value {
    fn from(value: PlistString) -> Self {
        Value::String(value)
    }
}

impl From<Dict> for Value {
    fn from(value: Dict) -> Self {
        Value::Dict(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

/// Scalar string (quoted, unquoted, or `<data>`).
#[derive(Debug, Clone)]
pub struct PlistString {
    pub(super) text: String,
    pub(super) annotation: Option<String>,
    pub(super) raw: Option<Span>,
}

impl PlistString {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), annotation: None, raw: None }
    }

    /// Object reference followed by a `/* name */` annotation.
    pub fn reference(id: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self { text: id.into(), annotation: Some(annotation.into()), raw: None }
    }

    pub(super) fn parsed(text: String, raw: Span) -> Self {
        Self { text, annotation: None, raw: Some(raw) }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> Option<usize> {
        self.raw.map(|span| span.start)
    }
}

#[derive(Debug, Clone)]
pub struct DictEntry {
    pub(super) lead: Lead,
    pub(super) key: PlistString,
    pub(super) value: Value,
    /// From the key through the trivia that precedes the value.
    pub(super) head: Option<Span>,
    /// Trivia between the value and `;`.
    pub(super) tail: String,
    pub(super) raw: Option<Span>,
}

impl DictEntry {
    pub fn new(key: PlistString, value: impl Into<Value>) -> Self {
        Self {
            lead: Lead::auto(),
            key,
            value: value.into(),
            head: None,
            tail: String::new(),
            raw: None,
        }
    }

    pub fn key(&self) -> &str {
        self.key.text()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dict {
    pub(super) entries: Vec<DictEntry>,
    pub(super) close_lead: Lead,
    pub(super) raw: Option<Span>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|entry| entry.key() == key).map(|entry| &entry.value)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Mutable access to a value; marks the entry and this dictionary dirty.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let idx = self.position(key)?;
        self.raw = None;
        let entry = &mut self.entries[idx];
        entry.raw = None;
        Some(&mut entry.value)
    }

    /// Replace the value for `key`, keeping the entry's position and trivia,
    /// or append a new entry when the key is absent.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.get_mut(key) {
            Some(slot) => *slot = value,
            None => self.push(DictEntry::new(PlistString::new(key), value)),
        }
    }

    pub fn push(&mut self, entry: DictEntry) {
        self.insert_entry(self.entries.len(), entry);
    }

    /// Insert a new entry at `index`. A lead left as [`Lead::auto`] adopts the
    /// indentation of its neighbours.
    pub fn insert_entry(&mut self, index: usize, mut entry: DictEntry) {
        if entry.lead == Lead::auto()
            && let Some(sibling) = self.entries.get(index).or_else(|| self.entries.last())
        {
            entry.lead = Lead::like(&sibling.lead);
        }
        self.raw = None;
        self.entries.insert(index, entry);
    }

    /// Remove the entry at `index`, handing its leading comments to the next sibling.
    pub fn remove_at(&mut self, index: usize) -> DictEntry {
        self.raw = None;
        let removed = self.entries.remove(index);
        let next_lead = match self.entries.get_mut(index) {
            Some(next) => &mut next.lead,
            None => &mut self.close_lead,
        };
        next_lead.pre.insert_str(0, &removed.lead.pre);
        removed
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.position(key)?;
        Some(self.remove_at(idx).value)
    }

    pub(super) fn entries_mut(&mut self) -> &mut Vec<DictEntry> {
        self.raw = None;
        &mut self.entries
    }
}

#[derive(Debug, Clone)]
pub struct ArrayItem {
    pub(super) lead: Lead,
    pub(super) value: Value,
    /// Trivia between the value and its comma.
    pub(super) tail: String,
    pub(super) comma: bool,
    pub(super) raw: Option<Span>,
}

impl ArrayItem {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            lead: Lead::auto(),
            value: value.into(),
            tail: String::new(),
            comma: true,
            raw: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct Array {
    pub(super) items: Vec<ArrayItem>,
    pub(super) close_lead: Lead,
    pub(super) raw: Option<Span>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut array = Self::new();
        for value in values {
            array.push(PlistString::new(value));
        }
        array
    }

    pub fn items(&self) -> &[ArrayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| item.value.as_str())
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.insert(self.items.len(), value);
    }

    pub fn insert(&mut self, index: usize, value: impl Into<Value>) {
        let index = index.min(self.items.len());
        let mut item = ArrayItem::new(value);
        if let Some(sibling) = self.items.get(index).or_else(|| self.items.last()) {
            item.lead = Lead::like(&sibling.lead);
        }
        // A parsed final item may lack the optional trailing comma.
        if index == self.items.len()
            && let Some(last) = self.items.last_mut()
            && !last.comma
        {
            last.comma = true;
            last.raw = None;
        }
        self.raw = None;
        self.items.insert(index, item);
    }

    pub fn remove(&mut self, index: usize) -> Value {
        self.raw = None;
        let removed = self.items.remove(index);
        let next_lead = match self.items.get_mut(index) {
            Some(next) => &mut next.lead,
            None => &mut self.close_lead,
        };
        next_lead.pre.insert_str(0, &removed.lead.pre);
        removed.value
    }
}
