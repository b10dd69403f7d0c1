use crate::harness::{LINT_PHASE, TestContext};
use predicates::prelude::*;

#[test]
fn integrate_inserts_then_reports_no_change() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("integrate")
        .arg(ctx.project_path())
        .args(["-t", "App", "--scripts-path", "Scripts/Lint", "--tool-version", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted '[LintPhase] Code Style Lint' into App"));
    let after_first = ctx.read_pbxproj();

    ctx.cli()
        .args(["i"])
        .arg(ctx.project_path())
        .args(["-t", "App", "--tool-version", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already at version 2.0"));

    assert_eq!(ctx.read_pbxproj(), after_first);
    assert_eq!(
        ctx.stored_paths().get(&ctx.store_key("App")).map(String::as_str),
        Some("Scripts/Lint")
    );
}

#[test]
fn integrate_without_any_scripts_path_fails() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("integrate")
        .arg(ctx.project_path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error: No scripts path stored"));

    assert_eq!(ctx.read_pbxproj(), TestContext::fixture_text("basic"));
}

#[test]
fn integrate_rejects_unknown_target() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("integrate")
        .arg(ctx.project_path())
        .args(["-t", "Widget", "-s", "Scripts/Lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target 'Widget' not found. Available: App, AppTests"));
}

#[test]
fn integrate_dry_run_leaves_everything_untouched() {
    let ctx = TestContext::with_fixture("legacy");

    ctx.cli()
        .arg("integrate")
        .arg(ctx.project_path())
        .args(["-s", "Scripts/Lint", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Migrated").and(predicate::str::contains("(dry run)")));

    assert_eq!(ctx.read_pbxproj(), TestContext::fixture_text("legacy"));
    assert!(ctx.stored_paths().is_empty());
}

#[test]
fn placement_comes_from_config_and_flag() {
    let ctx = TestContext::with_fixture("basic");
    ctx.write_config("[integration]\nplacement = \"start\"\n");

    ctx.integrate(&["-t", "App", "-s", "Scripts/Lint"]);
    assert_eq!(ctx.phase_names("App")[0], LINT_PHASE);

    ctx.integrate(&["-t", "AppTests", "-s", "Scripts/Lint", "--placement", "end"]);
    assert_eq!(ctx.phase_names("AppTests").last().map(String::as_str), Some(LINT_PHASE));
}

#[test]
fn invalid_placement_is_rejected_by_the_parser() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("integrate")
        .arg(ctx.project_path())
        .args(["-s", "Scripts/Lint", "--placement", "middle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown placement 'middle'"));
}

#[test]
fn missing_project_is_reported() {
    let ctx = TestContext::new();

    ctx.cli()
        .args(["integrate", "Nowhere.xcodeproj", "-s", "Scripts/Lint"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Xcode project not found"));
}
