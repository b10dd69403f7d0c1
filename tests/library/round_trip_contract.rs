use crate::harness::{LINT_PHASE, TestContext};
use lintphase::PlacementPolicy;
use lintphase::domain::{ProjectFile, ScriptPhase};

#[test]
fn unmodified_projects_render_byte_identical() {
    for name in ["basic", "legacy"] {
        let text = TestContext::fixture_text(name);
        let project = ProjectFile::parse(text.as_str(), "project.pbxproj").unwrap();
        assert!(!project.is_modified());
        assert_eq!(project.render(), text, "fixture {name}");
    }
}

#[test]
fn edits_touch_only_the_managed_phase() {
    let text = TestContext::fixture_text("basic");
    let mut project = ProjectFile::parse(text.as_str(), "project.pbxproj").unwrap();
    let target = project.require_target("App").unwrap();

    let phase = ScriptPhase::new(LINT_PHASE, "#!/bin/bash\n# Version: 1.0\n");
    project.insert_phase(&target, phase, PlacementPolicy::AfterCompileSources).unwrap();
    let rendered = project.render();

    let removed: Vec<&str> =
        text.lines().filter(|line| !rendered.lines().any(|other| other == *line)).collect();
    assert!(removed.is_empty(), "lines lost: {removed:?}");
    assert!(rendered.contains("/* Begin PBXShellScriptBuildPhase section */"));

    let reparsed = ProjectFile::parse(rendered, "project.pbxproj").unwrap();
    let names: Vec<String> =
        reparsed.require_target("App").unwrap().phases.into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["Dependencies", "Sources", LINT_PHASE, "Frameworks", "Resources"]);
    let tests_target = reparsed.require_target("AppTests").unwrap();
    assert_eq!(tests_target.phases.len(), 2);
}

#[test]
fn insert_then_remove_restores_the_original_bytes() {
    let text = TestContext::fixture_text("basic");
    let mut project = ProjectFile::parse(text.as_str(), "project.pbxproj").unwrap();
    let target = project.require_target("AppTests").unwrap();

    let inserted = project
        .insert_phase(&target, ScriptPhase::new(LINT_PHASE, "lint\n"), PlacementPolicy::End)
        .unwrap();
    let target = project.require_target("AppTests").unwrap();
    project.remove_phase(&target, &inserted).unwrap();

    assert_eq!(project.render(), text);
}
