mod identity_store;
mod phase_templates;

pub use identity_store::IdentityStore;
pub use phase_templates::PhaseTemplates;
