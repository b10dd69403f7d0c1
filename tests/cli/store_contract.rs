use crate::harness::TestContext;
use predicates::prelude::*;

#[test]
fn store_lists_shows_and_forgets_entries() {
    let ctx = TestContext::with_fixture("basic");
    ctx.cli().args(["store", "list"]).assert().success().stdout(predicate::str::contains(
        "Nothing stored yet",
    ));
    ctx.integrate(&["-t", "App", "-s", "Scripts/Lint"]);
    let key = ctx.store_key("App");

    ctx.cli()
        .args(["store", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(key.as_str()))
        .stdout(predicate::str::contains("scripts: Scripts/Lint"));

    ctx.cli()
        .args(["store", "show"])
        .arg(ctx.project_path())
        .args(["-t", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scripts: Scripts/Lint"));

    ctx.cli()
        .args(["store", "forget"])
        .arg(ctx.project_path())
        .args(["-t", "App"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forgot"));

    assert!(ctx.stored_paths().is_empty());
}
