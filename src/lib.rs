//! lintphase: install and keep current a version-stamped lint Run Script
//! phase in Xcode projects, and remember where each target's lint scripts live.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::api::{
    CheckOutcome, CheckReport, CheckRequest, IntegrateRequest, IntegrationOutcome,
    IntegrationReport, ManualRequest, ManualSteps, RemoveOutcome, RemoveReport, RemoveRequest,
    StoredProject, TOOL_VERSION, TargetSummary, check, identity_for, integrate, integrate_in,
    integrate_with, manual, manual_with, projects, remove, store_forget, store_forget_in,
    store_list, store_list_in, store_show, store_show_in, targets,
};
pub use app::Settings;
pub use domain::{AppError, ErrorKind, ManagedPhase, PlacementPolicy, ProjectIdentity, make_key};
