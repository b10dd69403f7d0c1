use std::fs;

use crate::harness::TestContext;
use lintphase::adapters::JsonFileStore;
use lintphase::ports::IdentityStore;
use lintphase::{
    IntegrateRequest, IntegrationOutcome, ProjectIdentity, integrate_with, make_key,
    store_forget_in, store_list_in,
};

#[test]
fn corrupt_path_store_reads_as_empty_and_is_rewritten() {
    let ctx = TestContext::new();
    fs::create_dir_all(ctx.lintphase_home()).unwrap();
    let file = ctx.lintphase_home().join("paths.json");
    fs::write(&file, "{ not json").unwrap();

    let store: JsonFileStore<String> = JsonFileStore::new(&file);
    let identity = ProjectIdentity::new("/missing/App.xcodeproj", None, "App");
    assert_eq!(store.get(&identity), None);

    store.save(&identity, &"Scripts/Lint".to_string()).unwrap();
    let text = fs::read_to_string(&file).unwrap();
    let decoded: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(decoded["/missing/App.xcodeproj||App"], "Scripts/Lint");
}

#[test]
fn integration_survives_a_corrupt_store() {
    let ctx = TestContext::with_fixture("basic");
    fs::create_dir_all(ctx.lintphase_home()).unwrap();
    fs::write(ctx.lintphase_home().join("paths.json"), "[1, 2").unwrap();

    let request = IntegrateRequest::new(ctx.project_path(), "2.0")
        .target("App")
        .scripts_path("Scripts/Lint");
    let report = integrate_with(ctx.settings(), &request).unwrap();

    assert_eq!(report.outcome, IntegrationOutcome::Inserted);
    assert!(report.warnings.is_empty());
    assert_eq!(ctx.stored_paths().get(&ctx.store_key("App")).unwrap(), "Scripts/Lint");
}

#[test]
fn corrupt_store_between_runs_still_moves_the_scripts_path() {
    let ctx = TestContext::with_fixture("basic");
    let first = IntegrateRequest::new(ctx.project_path(), "2.0")
        .target("App")
        .scripts_path("Scripts/Lint");
    integrate_with(ctx.settings(), &first).unwrap();
    fs::write(ctx.lintphase_home().join("paths.json"), "{ corrupt").unwrap();

    let moved =
        IntegrateRequest::new(ctx.project_path(), "2.0").target("App").scripts_path("Tools");
    let report = integrate_with(ctx.settings(), &moved).unwrap();

    assert_eq!(report.outcome, IntegrationOutcome::Updated);
    let text = ctx.read_pbxproj();
    assert!(text.contains("${SRCROOT}/Tools/code_style_check.sh"));
    assert!(!text.contains("Scripts/Lint"));
    assert_eq!(ctx.stored_paths().get(&ctx.store_key("App")).unwrap(), "Tools");
}

#[test]
fn stored_path_is_reused_and_can_be_forgotten() {
    let ctx = TestContext::with_fixture("basic");
    let first = IntegrateRequest::new(ctx.project_path(), "1.0")
        .target("App")
        .scripts_path("Scripts/Lint");
    integrate_with(ctx.settings(), &first).unwrap();

    let second = IntegrateRequest::new(ctx.project_path(), "1.1").target("App");
    let report = integrate_with(ctx.settings(), &second).unwrap();
    assert_eq!(report.scripts_path, "Scripts/Lint");

    let listed = store_list_in(ctx.lintphase_home()).unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].config.is_some());

    assert!(store_forget_in(ctx.lintphase_home(), &report.identity).unwrap());
    assert!(store_list_in(ctx.lintphase_home()).unwrap().is_empty());
}

#[test]
fn empty_and_absent_project_names_share_a_key() {
    let absent = make_key("/p/App.xcodeproj", None, "App");
    assert_eq!(absent, make_key("/p/App.xcodeproj", Some(""), "App"));
    assert_eq!(absent, "/p/App.xcodeproj||App");
}
