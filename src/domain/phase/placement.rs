use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::pbxproj::{BuildPhase, PhaseKind};

/// Where a newly created managed phase goes in a target's phase list.
///
/// Only applied when the phase is first inserted; existing phases keep
/// whatever position the user gave them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementPolicy {
    /// After the last compile-sources phase, or at the end when there is none.
    #[default]
    AfterCompileSources,
    /// Before the first compile-sources phase, or at the end when there is none.
    BeforeCompileSources,
    Start,
    End,
}

impl PlacementPolicy {
    pub const ALL: [PlacementPolicy; 4] = [
        PlacementPolicy::AfterCompileSources,
        PlacementPolicy::BeforeCompileSources,
        PlacementPolicy::Start,
        PlacementPolicy::End,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlacementPolicy::AfterCompileSources => "after-compile-sources",
            PlacementPolicy::BeforeCompileSources => "before-compile-sources",
            PlacementPolicy::Start => "start",
            PlacementPolicy::End => "end",
        }
    }

    /// Insertion index for a new phase within `phases`.
    pub fn resolve(self, phases: &[BuildPhase]) -> usize {
        let is_sources = |phase: &BuildPhase| phase.kind == PhaseKind::Sources;
        match self {
            PlacementPolicy::AfterCompileSources => {
                phases.iter().rposition(is_sources).map_or(phases.len(), |idx| idx + 1)
            }
            PlacementPolicy::BeforeCompileSources => {
                phases.iter().position(is_sources).unwrap_or(phases.len())
            }
            PlacementPolicy::Start => 0,
            PlacementPolicy::End => phases.len(),
        }
    }

    /// Whether a phase already sitting at `index` agrees with this policy.
    pub fn is_satisfied(self, phases: &[BuildPhase], index: usize) -> bool {
        let sources: Vec<usize> = phases
            .iter()
            .enumerate()
            .filter(|(_, phase)| phase.kind == PhaseKind::Sources)
            .map(|(idx, _)| idx)
            .collect();
        match self {
            PlacementPolicy::AfterCompileSources if sources.is_empty() => {
                index + 1 == phases.len()
            }
            PlacementPolicy::AfterCompileSources => sources.iter().all(|&idx| idx < index),
            PlacementPolicy::BeforeCompileSources if sources.is_empty() => {
                index + 1 == phases.len()
            }
            PlacementPolicy::BeforeCompileSources => sources.iter().all(|&idx| idx > index),
            PlacementPolicy::Start => index == 0,
            PlacementPolicy::End => index + 1 == phases.len(),
        }
    }
}

impl fmt::Display for PlacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|policy| policy.as_str() == s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
            format!("Unknown placement '{s}'. Expected one of: {}", known.join(", "))
        })
    }
}
