use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn remove_undoes_an_integration() {
    let ctx = TestContext::with_fixture("basic");
    ctx.integrate(&["-t", "App", "-s", "Scripts/Lint"]);

    ctx.cli()
        .arg("remove")
        .arg(ctx.project_path())
        .args(["-t", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 lint phase(s) from App"));

    assert_eq!(ctx.read_pbxproj(), TestContext::fixture_text("basic"));
    assert!(!ctx.stored_paths().is_empty());
}

#[test]
fn remove_without_phase_is_informational() {
    let ctx = TestContext::with_fixture("basic");

    ctx.cli()
        .args(["rm"])
        .arg(ctx.project_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No lint phase in App"));
}
