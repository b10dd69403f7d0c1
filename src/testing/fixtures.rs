//! Project files shared with the integration tests under `tests/fixtures`.

use std::fs;
use std::path::{Path, PathBuf};

/// Two native targets; `App` has phases Dependencies, Sources, Frameworks, Resources.
pub const BASIC_PROJECT: &str =
    include_str!("../../tests/fixtures/basic/App.xcodeproj/project.pbxproj");

/// Like [`BASIC_PROJECT`], with a legacy bootstrap phase after `App`'s Sources.
pub const LEGACY_PROJECT: &str =
    include_str!("../../tests/fixtures/legacy/App.xcodeproj/project.pbxproj");

/// Write `text` as `<dir>/App.xcodeproj/project.pbxproj` and return the bundle path.
pub fn write_project(dir: &Path, text: &str) -> PathBuf {
    let bundle = dir.join("App.xcodeproj");
    fs::create_dir_all(&bundle).expect("create project bundle");
    fs::write(bundle.join("project.pbxproj"), text).expect("write project file");
    bundle
}
