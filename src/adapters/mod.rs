pub mod embedded_phase_templates;
pub mod json_store;
pub mod memory_store;
pub mod project_locator;

pub use embedded_phase_templates::EmbeddedPhaseTemplates;
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
pub use project_locator::{LocatedProject, list_projects, locate, workspace_projects};
