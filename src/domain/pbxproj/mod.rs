//! Xcode `project.pbxproj` reading and editing.
//!
//! [`PbxDocument`] is the lossless property-list layer; [`ProjectFile`] adds
//! the target and build-phase view the integrator works with.

mod document;
mod model;
mod object_id;
mod parser;
mod syntax;
mod writer;

pub use document::PbxDocument;
pub use model::{BuildPhase, PhaseKind, ProjectFile, ScriptPhase, Target};
pub use object_id::{OBJECT_ID_LEN, generate_object_id};
pub use syntax::{Array, Dict, PlistString, Value};
pub use writer::quote;
