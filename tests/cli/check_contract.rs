use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn check_reports_not_installed_with_exit_code_one() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .arg("check")
        .arg(ctx.project_path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No lint phase in App"));
}

#[test]
fn check_is_clean_after_integrating_the_current_version() {
    let ctx = TestContext::with_fixture("basic");
    ctx.integrate(&["-s", "Scripts/Lint"]);

    ctx.cli()
        .arg("check")
        .arg(ctx.project_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn check_flags_older_phases_with_exit_code_two() {
    let ctx = TestContext::with_fixture("basic");
    ctx.integrate(&["-s", "Scripts/Lint", "--tool-version", "0.1"]);

    ctx.cli()
        .arg("check")
        .arg(ctx.project_path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("is at 0.1"));
}

#[test]
fn check_flags_legacy_phases() {
    let ctx = TestContext::with_fixture("legacy");

    ctx.cli()
        .arg("check")
        .arg(ctx.project_path())
        .args(["-t", "App"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("legacy phase '[LintPhase] Package Manager'"));
}
