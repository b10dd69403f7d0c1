//! Recognized names of the managed run-script phase and the version marker
//! embedded in its body.

/// Line prefix carrying the tool version inside a rendered script body.
pub const VERSION_MARKER: &str = "# Version:";

/// Prefix of the script invocation line; the scripts directory follows it.
pub const SCRIPTS_ROOT: &str = "${SRCROOT}/";

/// Shapes of the managed phase, current and historical.
///
/// A phase is recognized only by its display name, so user edits to the
/// script body never make it disappear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedPhase {
    /// Lint/fix phase written by the current tool.
    Current,
    /// Bootstrap phase written by releases before the lint phase existed.
    LegacyBootstrap,
}

impl ManagedPhase {
    /// Every recognized variant, current first.
    pub const ALL: [ManagedPhase; 2] = [ManagedPhase::Current, ManagedPhase::LegacyBootstrap];

    pub fn name(self) -> &'static str {
        match self {
            ManagedPhase::Current => "[LintPhase] Code Style Lint",
            ManagedPhase::LegacyBootstrap => "[LintPhase] Package Manager",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.name() == name)
    }

    /// Variant a phase of this shape migrates to, if it is outdated.
    pub fn successor(self) -> Option<Self> {
        match self {
            ManagedPhase::Current => None,
            ManagedPhase::LegacyBootstrap => Some(ManagedPhase::Current),
        }
    }

    pub fn is_legacy(self) -> bool {
        self.successor().is_some()
    }

    /// All display names the integrator treats as its own phase.
    pub fn recognized_names() -> Vec<&'static str> {
        Self::ALL.into_iter().map(Self::name).collect()
    }

    /// Display names of every outdated shape.
    pub fn legacy_names() -> Vec<&'static str> {
        Self::ALL.into_iter().filter(|phase| phase.is_legacy()).map(Self::name).collect()
    }
}

/// Phase name and script body produced for a tool version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPhase {
    pub variant: ManagedPhase,
    pub name: String,
    pub body: String,
}

/// Read the version a script body was rendered with.
///
/// Returns `None` when the body carries no (or an empty) version marker.
pub fn extract_version(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix(VERSION_MARKER))
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .map(str::to_string)
}

/// Read the scripts directory a body invokes its script from.
///
/// Takes the first `"${SRCROOT}/<dir>/<script>"` reference and returns `<dir>`.
pub fn extract_scripts_path(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        let (_, rest) = line.split_once(SCRIPTS_ROOT)?;
        let reference = rest.split('"').next().unwrap_or(rest);
        let (dir, _) = reference.rsplit_once('/')?;
        Some(dir.to_string()).filter(|dir| !dir.is_empty())
    })
}
