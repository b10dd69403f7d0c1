//! Shared testing harness for `lintphase` integration tests.

use assert_cmd::Command;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use lintphase::Settings;
use lintphase::domain::ProjectFile;

pub(crate) const LINT_PHASE: &str = "[LintPhase] Code Style Lint";

/// Isolated `$HOME` plus a work directory holding one copied fixture project.
pub(crate) struct TestContext {
    root: TempDir,
    home: PathBuf,
    work_dir: PathBuf,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let home = root.path().join("home");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&home).expect("Failed to create test home directory");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");
        Self { root, home, work_dir }
    }

    /// Create an environment with `tests/fixtures/<name>` copied into the work directory.
    pub(crate) fn with_fixture(name: &str) -> Self {
        let ctx = Self::new();
        ctx.write_pbxproj(&Self::fixture_text(name));
        ctx
    }

    /// Raw text of a fixture project file.
    pub(crate) fn fixture_text(name: &str) -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
            .join("App.xcodeproj/project.pbxproj");
        fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("Failed to read fixture {}: {err}", path.display()))
    }

    /// Absolute path to the emulated `$HOME` directory.
    pub(crate) fn home(&self) -> &Path {
        &self.home
    }

    /// Settings directory the binary resolves from `$HOME`.
    pub(crate) fn lintphase_home(&self) -> PathBuf {
        self.home.join(".lintphase")
    }

    pub(crate) fn settings(&self) -> Settings {
        Settings::new(self.lintphase_home())
    }

    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path to `App.xcodeproj` in the work directory.
    pub(crate) fn project_path(&self) -> PathBuf {
        self.work_dir.join("App.xcodeproj")
    }

    pub(crate) fn pbxproj_path(&self) -> PathBuf {
        self.project_path().join("project.pbxproj")
    }

    pub(crate) fn read_pbxproj(&self) -> String {
        fs::read_to_string(self.pbxproj_path()).expect("Failed to read project file")
    }

    pub(crate) fn write_pbxproj(&self, text: &str) {
        fs::create_dir_all(self.project_path()).expect("Failed to create project bundle");
        fs::write(self.pbxproj_path(), text).expect("Failed to write project file");
    }

    /// Phase names of `target`, in order.
    pub(crate) fn phase_names(&self, target: &str) -> Vec<String> {
        let project = ProjectFile::load(&self.pbxproj_path()).expect("Failed to load project");
        let target = project.require_target(target).expect("target should exist");
        target.phases.into_iter().map(|phase| phase.name).collect()
    }

    /// Store key of the bare project for `target`.
    pub(crate) fn store_key(&self, target: &str) -> String {
        let canonical = self.project_path().canonicalize().expect("project should exist");
        format!("{}||{}", canonical.display(), target)
    }

    /// Decoded `paths.json`, empty when absent.
    pub(crate) fn stored_paths(&self) -> BTreeMap<String, String> {
        match fs::read_to_string(self.lintphase_home().join("paths.json")) {
            Ok(text) => serde_json::from_str(&text).expect("paths.json should be valid JSON"),
            Err(_) => BTreeMap::new(),
        }
    }

    /// Write `config.toml` into the settings directory.
    pub(crate) fn write_config(&self, content: &str) {
        fs::create_dir_all(self.lintphase_home()).expect("Failed to create settings directory");
        fs::write(self.lintphase_home().join("config.toml"), content)
            .expect("Failed to write config.toml");
    }

    /// Write a workspace in the work directory referencing `locations`.
    pub(crate) fn write_workspace(&self, name: &str, locations: &[&str]) -> PathBuf {
        let workspace = self.work_dir.join(format!("{name}.xcworkspace"));
        fs::create_dir_all(&workspace).expect("Failed to create workspace");
        let refs: String = locations
            .iter()
            .map(|location| format!("   <FileRef location = \"{location}\">\n   </FileRef>\n"))
            .collect();
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Workspace\n   version = \"1.0\">\n\
             {refs}</Workspace>\n"
        );
        fs::write(workspace.join("contents.xcworkspacedata"), xml)
            .expect("Failed to write workspace data");
        workspace
    }

    /// Build a command for invoking the compiled `lintphase` binary in the work directory.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("lintphase").expect("Failed to locate lintphase binary");
        cmd.current_dir(&self.work_dir)
            .env("HOME", &self.home)
            .env_remove("LINTPHASE_HOME")
            .env_remove("LINTPHASE_LOG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `lintphase integrate` on the work project with `extra` arguments and assert success.
    pub(crate) fn integrate(&self, extra: &[&str]) {
        self.cli().arg("integrate").arg(self.project_path()).args(extra).assert().success();
    }
}
