use std::path::{Path, PathBuf};

use super::parser;
use super::syntax::{Dict, DictEntry, Lead, PlistString, Span, Value};
use super::writer::Writer;
use crate::domain::AppError;

/// A parsed `project.pbxproj` that re-renders byte-for-byte until edited.
#[derive(Debug, Clone)]
pub struct PbxDocument {
    path: PathBuf,
    source: String,
    prefix: Span,
    root: Dict,
    suffix: Span,
}

impl PbxDocument {
    pub fn parse(source: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let source = source.into();
        let path = path.into();
        let parsed = parser::parse(&source, &path)?;
        let document =
            Self { path, prefix: parsed.prefix, root: parsed.root, suffix: parsed.suffix, source };
        if document.objects().is_none() {
            return Err(document.error_at(0, "missing 'objects' dictionary"));
        }
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Dict {
        &self.root
    }

    pub fn is_modified(&self) -> bool {
        self.root.raw.is_none()
    }

    pub fn render(&self) -> String {
        let mut writer = Writer::new(&self.source);
        writer.raw(self.prefix.slice(&self.source));
        writer.dict(&self.root, 0);
        writer.raw(self.suffix.slice(&self.source));
        writer.finish()
    }

    /// Parse error located at a byte offset of the original source.
    pub fn error_at(&self, offset: usize, details: impl Into<String>) -> AppError {
        AppError::parse_error(&self.path, &self.source, offset, details)
    }

    pub fn objects(&self) -> Option<&Dict> {
        self.root.get("objects").and_then(Value::as_dict)
    }

    fn objects_mut(&mut self) -> Result<&mut Dict, AppError> {
        let path = self.path.clone();
        self.root.get_mut("objects").and_then(Value::as_dict_mut).ok_or_else(|| {
            AppError::Parse { path, line: 1, column: 1, details: "missing 'objects'".into() }
        })
    }

    pub fn object(&self, id: &str) -> Option<&Dict> {
        self.objects()?.get(id).and_then(Value::as_dict)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut Dict> {
        self.objects_mut().ok()?.get_mut(id).and_then(Value::as_dict_mut)
    }

    pub fn contains_object(&self, id: &str) -> bool {
        self.objects().is_some_and(|objects| objects.get(id).is_some())
    }

    pub fn root_object_id(&self) -> Option<&str> {
        self.root.get_str("rootObject")
    }

    /// Add an object to the `objects` dictionary, keeping Xcode's layout:
    /// objects grouped into `/* Begin <isa> section */` blocks ordered by
    /// isa, and sorted by id inside a block.
    pub fn insert_object(
        &mut self,
        id: &str,
        annotation: &str,
        body: Dict,
    ) -> Result<(), AppError> {
        if self.contains_object(id) {
            return Err(AppError::Internal(format!("object id {id} already in use")));
        }
        let isa = body.get_str("isa").unwrap_or_default().to_string();
        let objects = self.objects_mut()?;
        let mut entry = DictEntry::new(PlistString::reference(id, annotation), body);

        let same_isa: Vec<usize> = objects
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| object_isa(e) == Some(isa.as_str()))
            .map(|(idx, _)| idx)
            .collect();

        if let (Some(&first), Some(&last)) = (same_isa.first(), same_isa.last()) {
            let before = same_isa.iter().copied().find(|&idx| objects.entries[idx].key() > id);
            let index = match before {
                Some(idx) if idx == first => {
                    // New first member of the block takes over the section header.
                    let next = &mut objects.entries_mut()[idx].lead;
                    let pre = std::mem::take(&mut next.pre);
                    entry.lead = Lead { pre, indent: next.indent.clone() };
                    idx
                }
                Some(idx) => {
                    entry.lead = Lead::like(&objects.entries[idx].lead);
                    idx
                }
                None => {
                    entry.lead = Lead::like(&objects.entries[last].lead);
                    last + 1
                }
            };
            objects.entries_mut().insert(index, entry);
            return Ok(());
        }

        let indent = objects.entries.last().map(|e| e.lead.indent.clone()).unwrap_or_default();
        let begin = section_begin(&isa);
        let end = section_end(&isa);

        // First later section, located through its header comment.
        let later = objects.entries.iter().enumerate().find_map(|(idx, e)| {
            let other = object_isa(e)?;
            let marker = e.lead.pre.find(&section_begin(other))?;
            (other > isa.as_str()).then_some((idx, marker))
        });

        if let Some((idx, marker)) = later {
            let next = &mut objects.entries_mut()[idx].lead;
            let head = next.pre[..marker].to_string();
            let rest = next.pre[marker..].to_string();
            entry.lead = Lead { pre: format!("{head}{begin}"), indent: next.indent.clone() };
            next.pre = format!("\n{end}\n\n{rest}");
            objects.entries_mut().insert(idx, entry);
        } else if objects.close_lead.pre.contains("/* End ") {
            let close = &mut objects.close_lead;
            entry.lead = Lead { pre: format!("{}\n\n{begin}", close.pre), indent };
            close.pre = format!("\n{end}");
            objects.entries_mut().push(entry);
        } else {
            entry.lead = Lead { pre: String::new(), indent };
            objects.entries_mut().push(entry);
        }
        Ok(())
    }

    /// Remove an object, dropping its section block when it was the last member.
    pub fn remove_object(&mut self, id: &str) -> Result<Option<Dict>, AppError> {
        let objects = self.objects_mut()?;
        let Some(idx) = objects.position(id) else {
            return Ok(None);
        };
        let removed = objects.remove_at(idx);
        let isa = object_isa(&removed).unwrap_or_default().to_string();
        let merged = match objects.entries.get_mut(idx) {
            Some(next) => &mut next.lead.pre,
            None => &mut objects.close_lead.pre,
        };
        drop_empty_section(merged, &isa);
        match removed.value {
            Value::Dict(dict) => Ok(Some(dict)),
            _ => Ok(None),
        }
    }
}

fn object_isa(entry: &DictEntry) -> Option<&str> {
    entry.value().as_dict()?.get_str("isa")
}

fn section_begin(isa: &str) -> String {
    format!("/* Begin {isa} section */")
}

fn section_end(isa: &str) -> String {
    format!("/* End {isa} section */")
}

/// Strip a `Begin`/`End` comment pair with nothing between them, together
/// with the blank line that separated it from its neighbours.
fn drop_empty_section(text: &mut String, isa: &str) {
    if isa.is_empty() {
        return;
    }
    let pair = format!("{}\n{}", section_begin(isa), section_end(isa));
    let Some(start) = text.find(&pair) else {
        return;
    };
    let end = start + pair.len();
    if text[end..].starts_with("\n\n") {
        text.replace_range(start..end + 2, "");
    } else if text[..start].ends_with("\n\n") {
        text.replace_range(start - 2..end, "");
    } else {
        text.replace_range(start..end, "");
    }
}
