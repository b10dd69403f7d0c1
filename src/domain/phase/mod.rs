mod naming;
mod placement;

pub use naming::{
    ManagedPhase, RenderedPhase, SCRIPTS_ROOT, VERSION_MARKER, extract_scripts_path,
    extract_version,
};
pub use placement::PlacementPolicy;
