use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::document::PbxDocument;
use super::object_id::generate_object_id;
use super::syntax::{Array, Dict, PlistString, Value};
use crate::domain::AppError;
use crate::domain::phase::PlacementPolicy;

/// Object types that own a `buildPhases` list.
const TARGET_ISAS: [&str; 3] = ["PBXNativeTarget", "PBXAggregateTarget", "PBXLegacyTarget"];

/// Build phase kinds, keyed by their `isa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Sources,
    Frameworks,
    Resources,
    Headers,
    CopyFiles,
    RunScript,
    Rez,
    Other,
}

impl PhaseKind {
    pub fn from_isa(isa: &str) -> Self {
        match isa {
            "PBXSourcesBuildPhase" => PhaseKind::Sources,
            "PBXFrameworksBuildPhase" => PhaseKind::Frameworks,
            "PBXResourcesBuildPhase" => PhaseKind::Resources,
            "PBXHeadersBuildPhase" => PhaseKind::Headers,
            "PBXCopyFilesBuildPhase" => PhaseKind::CopyFiles,
            "PBXShellScriptBuildPhase" => PhaseKind::RunScript,
            "PBXRezBuildPhase" => PhaseKind::Rez,
            _ => PhaseKind::Other,
        }
    }

    /// Name Xcode displays for an unnamed phase of this kind.
    pub fn default_name(self) -> Option<&'static str> {
        match self {
            PhaseKind::Sources => Some("Sources"),
            PhaseKind::Frameworks => Some("Frameworks"),
            PhaseKind::Resources => Some("Resources"),
            PhaseKind::Headers => Some("Headers"),
            PhaseKind::CopyFiles => Some("CopyFiles"),
            PhaseKind::RunScript => Some("ShellScript"),
            PhaseKind::Rez => Some("Rez"),
            PhaseKind::Other => None,
        }
    }
}

/// Snapshot of one entry of a target's phase list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPhase {
    pub id: String,
    pub kind: PhaseKind,
    /// Display name: the explicit `name`, or the kind's default.
    pub name: String,
    pub explicit_name: Option<String>,
    pub script: Option<String>,
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
    pub input_file_list_paths: Vec<String>,
    pub output_file_list_paths: Vec<String>,
    /// Index in the owning target's `buildPhases`.
    pub position: usize,
}

/// Snapshot of a build target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub name: String,
    pub isa: String,
    pub product_type: Option<String>,
    pub phases: Vec<BuildPhase>,
}

impl Target {
    pub fn is_native(&self) -> bool {
        self.isa == "PBXNativeTarget"
    }

    pub fn is_application(&self) -> bool {
        self.product_type.as_deref().is_some_and(|ty| ty.contains("application"))
    }

    /// First phase, in declared order, whose display name is one of `names`.
    pub fn find_phase(&self, names: &[&str]) -> Option<&BuildPhase> {
        self.phases.iter().find(|phase| names.contains(&phase.name.as_str()))
    }
}

/// Definition of a run-script phase to add to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPhase {
    pub name: String,
    pub script: String,
    pub shell_path: String,
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
    pub input_file_list_paths: Vec<String>,
    pub output_file_list_paths: Vec<String>,
}

impl ScriptPhase {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
            shell_path: "/bin/sh".to_string(),
            input_paths: Vec::new(),
            output_paths: Vec::new(),
            input_file_list_paths: Vec::new(),
            output_file_list_paths: Vec::new(),
        }
    }

    /// Carry the input/output declarations of an existing phase over.
    pub fn with_io_from(mut self, phase: &BuildPhase) -> Self {
        self.input_paths.clone_from(&phase.input_paths);
        self.output_paths.clone_from(&phase.output_paths);
        self.input_file_list_paths.clone_from(&phase.input_file_list_paths);
        self.output_file_list_paths.clone_from(&phase.output_file_list_paths);
        self
    }

    /// Object body in the key order Xcode writes.
    fn into_dict(self) -> Dict {
        let mut dict = Dict::new();
        dict.insert("isa", PlistString::new("PBXShellScriptBuildPhase"));
        dict.insert("buildActionMask", PlistString::new("2147483647"));
        dict.insert("files", Array::new());
        dict.insert("inputFileListPaths", Array::from_strings(self.input_file_list_paths));
        dict.insert("inputPaths", Array::from_strings(self.input_paths));
        dict.insert("name", PlistString::new(self.name));
        dict.insert("outputFileListPaths", Array::from_strings(self.output_file_list_paths));
        dict.insert("outputPaths", Array::from_strings(self.output_paths));
        dict.insert("runOnlyForDeploymentPostprocessing", PlistString::new("0"));
        dict.insert("shellPath", PlistString::new(self.shell_path));
        dict.insert("shellScript", PlistString::new(self.script));
        dict
    }
}

/// A loaded Xcode project file and the operations the integrator performs on it.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    document: PbxDocument,
}

impl ProjectFile {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let source = fs::read_to_string(path).map_err(|err| AppError::Parse {
            path: path.to_path_buf(),
            line: 0,
            column: 0,
            details: format!("cannot read project file: {err}"),
        })?;
        Self::parse(source, path)
    }

    pub fn parse(source: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let project = Self { document: PbxDocument::parse(source, path)? };
        project.validate()?;
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        self.document.path()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn render(&self) -> String {
        self.document.render()
    }

    /// Reject files whose project, target, or phase references point nowhere.
    fn validate(&self) -> Result<(), AppError> {
        let root = self
            .document
            .root()
            .get("rootObject")
            .ok_or_else(|| self.document.error_at(0, "missing rootObject"))?;
        let project_id = self.reference(root, "rootObject")?;
        let Some(project) = self.document.object(project_id) else {
            return Err(self.document.error_at(0, "rootObject is not a dictionary"));
        };
        let Some(targets) = project.get("targets").and_then(Value::as_array) else {
            return Ok(());
        };
        for item in targets.items() {
            let target_id = self.reference(item.value(), "project targets")?;
            let Some(target) = self.document.object(target_id) else { continue };
            if let Some(phases) = target.get("buildPhases").and_then(Value::as_array) {
                for phase in phases.items() {
                    self.reference(phase.value(), "buildPhases")?;
                }
            }
        }
        Ok(())
    }

    fn reference<'a>(&self, value: &'a Value, context: &str) -> Result<&'a str, AppError> {
        let offset = value.raw().map_or(0, |span| span.start);
        let id = value.as_str().ok_or_else(|| {
            self.document.error_at(offset, format!("{context} entry is not an object reference"))
        })?;
        if !self.document.contains_object(id) {
            let details = format!("dangling reference {id} in {context}");
            return Err(self.document.error_at(offset, details));
        }
        Ok(id)
    }

    fn target_ids(&self) -> Vec<String> {
        self.document
            .root_object_id()
            .and_then(|id| self.document.object(id))
            .and_then(|project| project.get("targets"))
            .and_then(Value::as_array)
            .map(|targets| targets.strings().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Targets in the order the project declares them.
    pub fn targets(&self) -> Vec<Target> {
        self.target_ids().iter().filter_map(|id| self.read_target(id)).collect()
    }

    pub fn target_names(&self) -> Vec<String> {
        self.targets().into_iter().map(|target| target.name).collect()
    }

    pub fn find_target(&self, name: &str) -> Option<Target> {
        self.targets().into_iter().find(|target| target.name == name)
    }

    /// Like [`find_target`](Self::find_target), failing with the known names.
    pub fn require_target(&self, name: &str) -> Result<Target, AppError> {
        self.find_target(name).ok_or_else(|| AppError::TargetNotFound {
            name: name.to_string(),
            available: self.target_names(),
        })
    }

    /// Pick a target when the caller did not name one: the first native
    /// application target, else the first native target, else the first target.
    pub fn default_target(&self) -> Option<Target> {
        let targets = self.targets();
        let pick = targets
            .iter()
            .position(|t| t.is_native() && t.is_application())
            .or_else(|| targets.iter().position(Target::is_native))
            .unwrap_or(0);
        targets.into_iter().nth(pick)
    }

    fn read_target(&self, id: &str) -> Option<Target> {
        let object = self.document.object(id)?;
        let isa = object.get_str("isa")?;
        let name = object.get_str("name").or_else(|| object.get_str("productName")).unwrap_or(id);
        let phases = object
            .get("buildPhases")
            .and_then(Value::as_array)
            .map(|list| {
                list.strings()
                    .enumerate()
                    .filter_map(|(position, phase_id)| self.read_phase(phase_id, position))
                    .collect()
            })
            .unwrap_or_default();
        Some(Target {
            id: id.to_string(),
            name: name.to_string(),
            isa: isa.to_string(),
            product_type: object.get_str("productType").map(str::to_string),
            phases,
        })
    }

    fn read_phase(&self, id: &str, position: usize) -> Option<BuildPhase> {
        let object = self.document.object(id)?;
        let isa = object.get_str("isa").unwrap_or_default();
        let kind = PhaseKind::from_isa(isa);
        let explicit_name = object.get_str("name").map(str::to_string);
        let name = explicit_name.clone().or_else(|| kind.default_name().map(str::to_string));
        let strings = |key: &str| -> Vec<String> {
            object
                .get(key)
                .and_then(Value::as_array)
                .map(|list| list.strings().map(str::to_string).collect())
                .unwrap_or_default()
        };
        Some(BuildPhase {
            id: id.to_string(),
            kind,
            name: name.unwrap_or_else(|| isa.to_string()),
            explicit_name,
            script: object.get_str("shellScript").map(str::to_string),
            input_paths: strings("inputPaths"),
            output_paths: strings("outputPaths"),
            input_file_list_paths: strings("inputFileListPaths"),
            output_file_list_paths: strings("outputFileListPaths"),
            position,
        })
    }

    fn phase_snapshot(&self, target_id: &str, phase_id: &str) -> Result<BuildPhase, AppError> {
        self.read_target(target_id)
            .and_then(|target| target.phases.into_iter().find(|phase| phase.id == phase_id))
            .ok_or_else(|| AppError::Internal(format!("phase {phase_id} missing after edit")))
    }

    fn phase_list_mut(&mut self, target_id: &str) -> Result<&mut Array, AppError> {
        let target = self
            .document
            .object_mut(target_id)
            .ok_or_else(|| AppError::Internal(format!("target {target_id} vanished")))?;
        if target.get("buildPhases").is_none() {
            target.insert("buildPhases", Array::new());
        }
        target
            .get_mut("buildPhases")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| AppError::Internal(format!("buildPhases of {target_id} is not a list")))
    }

    /// Insert a new run-script phase where `policy` places it.
    pub fn insert_phase(
        &mut self,
        target: &Target,
        phase: ScriptPhase,
        policy: PlacementPolicy,
    ) -> Result<BuildPhase, AppError> {
        let index = policy.resolve(&target.phases);
        self.insert_phase_at(target, phase, index)
    }

    /// Insert a new run-script phase at `index` of the target's phase list.
    pub fn insert_phase_at(
        &mut self,
        target: &Target,
        phase: ScriptPhase,
        index: usize,
    ) -> Result<BuildPhase, AppError> {
        let name = phase.name.clone();
        let id = generate_object_id(&target.id, &name, |id| self.document.contains_object(id));
        debug!(target = %target.name, phase = %name, %id, index, "inserting build phase");

        self.document.insert_object(&id, &name, phase.into_dict())?;
        self.phase_list_mut(&target.id)?.insert(index, PlistString::reference(&id, &name));
        self.phase_snapshot(&target.id, &id)
    }

    /// Swap the script body of an existing phase, leaving everything else alone.
    pub fn replace_phase_body(&mut self, phase: &BuildPhase, body: &str) -> Result<(), AppError> {
        let current =
            self.document.object(&phase.id).and_then(|object| object.get_str("shellScript"));
        if current == Some(body) {
            return Ok(());
        }
        let object = self
            .document
            .object_mut(&phase.id)
            .ok_or_else(|| AppError::Internal(format!("phase {} vanished", phase.id)))?;
        object.insert("shellScript", PlistString::new(body));
        Ok(())
    }

    /// Detach a phase from a target, deleting the phase object once no
    /// target lists it any more.
    pub fn remove_phase(&mut self, target: &Target, phase: &BuildPhase) -> Result<(), AppError> {
        let list = self.phase_list_mut(&target.id)?;
        let at_position = list.items().get(phase.position).and_then(|item| item.value().as_str());
        let index = if at_position == Some(phase.id.as_str()) {
            Some(phase.position)
        } else {
            list.strings().position(|id| id == phase.id)
        };
        if let Some(index) = index {
            list.remove(index);
        }

        if self.is_referenced(&phase.id) {
            debug!(phase = %phase.id, "phase object still shared, keeping it");
        } else {
            self.document.remove_object(&phase.id)?;
        }
        Ok(())
    }

    fn is_referenced(&self, phase_id: &str) -> bool {
        let Some(objects) = self.document.objects() else {
            return false;
        };
        objects.entries().iter().filter_map(|entry| entry.value().as_dict()).any(|object| {
            object.get_str("isa").is_some_and(|isa| TARGET_ISAS.contains(&isa))
                && object
                    .get("buildPhases")
                    .and_then(Value::as_array)
                    .is_some_and(|list| list.strings().any(|id| id == phase_id))
        })
    }

    /// Write the project back in place when it was modified.
    ///
    /// Returns whether anything was written.
    pub fn save(&self) -> Result<bool, AppError> {
        if !self.is_modified() {
            return Ok(false);
        }
        self.save_to(self.path())?;
        Ok(true)
    }

    /// Render, re-parse to make sure the output is well-formed, then replace
    /// `path` through a sibling temporary file.
    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let rendered = self.render();
        verify_rendered(&rendered, path)?;

        let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned());
        let temp = path.with_file_name(format!(".{}.tmp", file_name.unwrap_or_default()));
        fs::write(&temp, &rendered)
            .map_err(|source| AppError::Write { path: path.to_path_buf(), source })?;
        fs::rename(&temp, path).map_err(|source| {
            let _ = fs::remove_file(&temp);
            AppError::Write { path: path.to_path_buf(), source }
        })?;
        debug!(path = %path.display(), "project file written");
        Ok(())
    }
}

/// Reject rendered text that would not load back.
fn verify_rendered(rendered: &str, path: &Path) -> Result<(), AppError> {
    ProjectFile::parse(rendered, path).map(drop).map_err(|err| AppError::Write {
        path: path.to_path_buf(),
        source: io::Error::other(format!("refusing to write malformed project: {err}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use crate::testing::fixtures;

    fn basic() -> ProjectFile {
        ProjectFile::parse(fixtures::BASIC_PROJECT, "App.xcodeproj/project.pbxproj").unwrap()
    }

    #[test]
    fn reads_targets_in_declared_order() {
        let project = basic();
        assert_eq!(project.target_names(), vec!["App", "AppTests"]);
        let app = project.find_target("App").unwrap();
        let names: Vec<&str> = app.phases.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Dependencies", "Sources", "Frameworks", "Resources"]);
        assert_eq!(app.phases[1].kind, PhaseKind::Sources);
        assert_eq!(app.phases[1].explicit_name, None);
        assert_eq!(app.phases[0].input_paths, vec!["$(SRCROOT)/Package.resolved"]);
    }

    #[test]
    fn unknown_target_lists_available_names() {
        let err = basic().require_target("Missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TargetNotFound);
        assert!(err.to_string().contains("App, AppTests"));
    }

    #[test]
    fn default_target_prefers_native_application() {
        assert_eq!(basic().default_target().map(|t| t.name), Some("App".to_string()));
    }

    #[test]
    fn find_phase_returns_first_match() {
        let app = basic().find_target("App").unwrap();
        let found = app.find_phase(&["Resources", "Sources"]).unwrap();
        assert_eq!(found.name, "Sources");
        assert!(app.find_phase(&["Nope"]).is_none());
    }

    #[test]
    fn unmodified_project_renders_identically() {
        let project = basic();
        assert!(!project.is_modified());
        assert_eq!(project.render(), fixtures::BASIC_PROJECT);
    }

    #[test]
    fn inserted_phase_is_listed_and_annotated() {
        let mut project = basic();
        let app = project.find_target("App").unwrap();
        let phase = ScriptPhase::new("Lint", "echo lint\n");
        let inserted =
            project.insert_phase(&app, phase, PlacementPolicy::AfterCompileSources).unwrap();
        assert_eq!(inserted.position, 2);
        assert_eq!(inserted.script.as_deref(), Some("echo lint\n"));

        let rendered = project.render();
        assert!(rendered.contains(&format!("\t\t\t\t{} /* Lint */,\n", inserted.id)));
        assert!(rendered.contains("\t\t\tshellScript = \"echo lint\\n\";\n"));
        assert!(rendered.contains("/* Begin PBXShellScriptBuildPhase section */"));

        let reparsed = ProjectFile::parse(rendered, "p").unwrap();
        let names = reparsed.find_target("App").unwrap().phases.into_iter().map(|p| p.name);
        assert_eq!(
            names.collect::<Vec<_>>(),
            ["Dependencies", "Sources", "Lint", "Frameworks", "Resources"]
        );
    }

    #[test]
    fn insert_then_remove_restores_original_bytes() {
        let mut project = basic();
        let app = project.find_target("App").unwrap();
        let inserted = project.insert_phase_at(&app, ScriptPhase::new("Lint", "x"), 4).unwrap();
        let app = project.find_target("App").unwrap();
        project.remove_phase(&app, &inserted).unwrap();
        assert_eq!(project.render(), fixtures::BASIC_PROJECT);
    }

    #[test]
    fn replace_body_touches_only_the_script() {
        let mut project = basic();
        let app = project.find_target("App").unwrap();
        let deps = app.phases[0].clone();
        project.replace_phase_body(&deps, "echo changed\n").unwrap();

        let reparsed = ProjectFile::parse(project.render(), "p").unwrap();
        let updated = reparsed.find_target("App").unwrap().phases[0].clone();
        assert_eq!(updated.script.as_deref(), Some("echo changed\n"));
        assert_eq!(updated.input_paths, deps.input_paths);
        assert_eq!(updated.position, 0);
    }

    #[test]
    fn replacing_with_identical_body_keeps_file_clean() {
        let mut project = basic();
        let deps = project.find_target("App").unwrap().phases[0].clone();
        let body = deps.script.clone().unwrap();
        project.replace_phase_body(&deps, &body).unwrap();
        assert!(!project.is_modified());
    }

    #[test]
    fn shared_phase_objects_survive_removal_from_one_target() {
        let source = fixtures::BASIC_PROJECT.replace(
            "\t\t\t\t1A0000000000000000000C01 /* Sources */,",
            concat!(
                "\t\t\t\t1A0000000000000000000C01 /* Sources */,\n",
                "\t\t\t\t1A0000000000000000000B01 /* Dependencies */,"
            ),
        );
        let mut project = ProjectFile::parse(source, "p").unwrap();
        let tests_target = project.find_target("AppTests").unwrap();
        let shared = tests_target.find_phase(&["Dependencies"]).unwrap().clone();
        project.remove_phase(&tests_target, &shared).unwrap();

        assert!(project.render().contains("1A0000000000000000000B01 /* Dependencies */ = {"));
        let app = project.find_target("App").unwrap();
        assert!(app.find_phase(&["Dependencies"]).is_some());
    }

    #[test]
    fn dangling_phase_reference_is_a_parse_error() {
        let source = fixtures::BASIC_PROJECT.replace(
            "\t\t\t\t1A0000000000000000000C01 /* Sources */,",
            "\t\t\t\tMISSING00000000000000001 /* Ghost */,",
        );
        let err = ProjectFile::parse(source, "p").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("MISSING00000000000000001"));
    }

    #[test]
    fn save_skips_unmodified_and_writes_modified() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("project.pbxproj");
        fs::write(&path, fixtures::BASIC_PROJECT).unwrap();

        let mut project = ProjectFile::load(&path).unwrap();
        assert!(!project.save().unwrap());

        let app = project.find_target("App").unwrap();
        project.insert_phase(&app, ScriptPhase::new("Lint", "x"), PlacementPolicy::End).unwrap();
        assert!(project.save().unwrap());

        let reloaded = ProjectFile::load(&path).unwrap();
        assert_eq!(reloaded.find_target("App").unwrap().phases.len(), 5);
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn unreadable_file_is_a_parse_error() {
        let err = ProjectFile::load(Path::new("/definitely/missing/project.pbxproj")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn malformed_render_is_a_write_error() {
        let path = Path::new("App.xcodeproj/project.pbxproj");
        let err = verify_rendered("// !$*UTF8*$!\n{ objects = {", path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(err.to_string().contains("refusing to write malformed project"));
        assert!(verify_rendered(fixtures::BASIC_PROJECT, path).is_ok());
    }
}
