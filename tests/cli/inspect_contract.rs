use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn targets_marks_default_and_managed_phase() {
    let ctx = TestContext::with_fixture("legacy");

    ctx.cli()
        .arg("targets")
        .arg(ctx.project_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("App (default) [[LintPhase] Package Manager @ unknown]"))
        .stdout(predicate::str::contains("AppTests"));
}

#[test]
fn targets_accepts_a_directory() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli().args(["targets", "."]).assert().success().stdout(predicate::str::contains("App"));
}

#[test]
fn projects_lists_workspace_members() {
    let ctx = TestContext::with_fixture("basic");
    let workspace = ctx.write_workspace("App", &["group:App.xcodeproj", "group:Missing.xcodeproj"]);

    ctx.cli()
        .arg("projects")
        .arg(&workspace)
        .assert()
        .success()
        .stdout(predicate::eq("App\n"));
}

#[test]
fn manual_prints_the_phase_without_touching_the_project() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("manual")
        .arg(ctx.project_path())
        .args(["-t", "App", "-s", "Scripts/Lint", "--tool-version", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("named: [LintPhase] Code Style Lint"))
        .stdout(predicate::str::contains("right after 'Sources' (after-compile-sources)"))
        .stdout(predicate::str::contains("# Version: 2.0"))
        .stdout(predicate::str::contains("\"${SRCROOT}/Scripts/Lint/code_style_check.sh\""));

    assert_eq!(ctx.read_pbxproj(), TestContext::fixture_text("basic"));
    assert!(ctx.stored_paths().is_empty());
}
