use std::cmp::Ordering;
use std::fmt;

/// A dotted numeric tool version (e.g. "1.2.3") as stamped into phase scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u32>,
}

impl Version {
    /// Parse a version string into a `Version` object.
    ///
    /// Returns `None` if the string is empty or contains non-numeric segments.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let parts = s
            .split('.')
            .map(|segment| segment.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        Some(Self { parts })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.parts.iter().map(u32::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = *self.parts.get(idx).unwrap_or(&0);
            let right_value = *other.parts.get(idx).unwrap_or(&0);
            match left_value.cmp(&right_value) {
                Ordering::Less => return Ordering::Less,
                Ordering::Greater => return Ordering::Greater,
                Ordering::Equal => {}
            }
        }
        Ordering::Equal
    }
}

/// Whether a phase stamped with `installed` should be rewritten for `requested`.
///
/// A missing stamp is always outdated. Stamps that are not dotted numbers are
/// outdated whenever they differ textually from the requested version.
pub fn is_outdated(installed: Option<&str>, requested: &str) -> bool {
    let Some(installed) = installed else {
        return true;
    };
    match (Version::parse(installed), Version::parse(requested)) {
        (Some(installed), Some(requested)) => installed < requested,
        _ => installed != requested,
    }
}
