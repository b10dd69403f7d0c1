use crate::harness::{LINT_PHASE, TestContext};
use lintphase::domain::{ProjectFile, extract_version};
use lintphase::{AppError, ErrorKind, IntegrateRequest, IntegrationOutcome, integrate_with};

fn request(ctx: &TestContext, version: &str) -> IntegrateRequest {
    IntegrateRequest::new(ctx.project_path(), version).target("App").scripts_path("Scripts/Lint")
}

#[test]
fn inserting_into_dependencies_and_sources_appends_the_phase() {
    let basic = TestContext::fixture_text("basic");
    let trimmed = basic
        .replace("\t\t\t\t1A0000000000000000000B03 /* Frameworks */,\n", "")
        .replace("\t\t\t\t1A0000000000000000000B04 /* Resources */,\n", "");
    let ctx = TestContext::new();
    ctx.write_pbxproj(&trimmed);
    assert_eq!(ctx.phase_names("App"), ["Dependencies", "Sources"]);

    let report = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap();

    assert_eq!(report.outcome, IntegrationOutcome::Inserted);
    assert_eq!(ctx.phase_names("App"), ["Dependencies", "Sources", LINT_PHASE]);
    let stored = ctx.stored_paths();
    assert_eq!(stored.get(&ctx.store_key("App")).map(String::as_str), Some("Scripts/Lint"));
}

#[test]
fn repeated_integration_is_byte_stable() {
    let ctx = TestContext::with_fixture("basic");
    let first = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap();
    let after_first = ctx.read_pbxproj();

    let second = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap();

    assert_eq!(first.outcome, IntegrationOutcome::Inserted);
    assert_eq!(second.outcome, IntegrationOutcome::NoChangeNeeded);
    assert_eq!(ctx.read_pbxproj(), after_first);
}

#[test]
fn version_bump_updates_without_duplicating() {
    let ctx = TestContext::with_fixture("basic");

    let first = integrate_with(ctx.settings(), &request(&ctx, "1.0")).unwrap();
    let second = integrate_with(ctx.settings(), &request(&ctx, "1.1")).unwrap();

    assert_eq!(first.outcome, IntegrationOutcome::Inserted);
    assert_eq!(second.outcome, IntegrationOutcome::Updated);
    let phases = ctx.phase_names("App");
    assert_eq!(phases.iter().filter(|name| *name == LINT_PHASE).count(), 1);

    let project = ProjectFile::load(&ctx.pbxproj_path()).unwrap();
    let target = project.require_target("App").unwrap();
    let script = target.find_phase(&[LINT_PHASE]).and_then(|phase| phase.script.clone());
    assert_eq!(script.as_deref().and_then(extract_version).as_deref(), Some("1.1"));
}

#[test]
fn legacy_phase_is_migrated_exactly_once() {
    let ctx = TestContext::with_fixture("legacy");

    let first = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap();
    let after_first = ctx.read_pbxproj();
    let second = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap();

    assert_eq!(first.outcome, IntegrationOutcome::Migrated);
    assert_eq!(second.outcome, IntegrationOutcome::NoChangeNeeded);
    assert_eq!(ctx.read_pbxproj(), after_first);
    let phases = ctx.phase_names("App");
    assert_eq!(phases, ["Dependencies", "Sources", LINT_PHASE, "Frameworks", "Resources"]);
    assert!(!after_first.contains("[LintPhase] Package Manager"));
}

#[test]
fn unknown_target_fails_and_leaves_the_file_alone() {
    let ctx = TestContext::with_fixture("basic");
    let before = ctx.read_pbxproj();

    let request = IntegrateRequest::new(ctx.project_path(), "2.0")
        .target("Missing")
        .scripts_path("Scripts/Lint");
    let err = integrate_with(ctx.settings(), &request).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TargetNotFound);
    assert!(err.to_string().contains("App, AppTests"));
    assert_eq!(ctx.read_pbxproj(), before);
}

#[test]
fn malformed_project_is_a_parse_error() {
    let ctx = TestContext::new();
    ctx.write_pbxproj("// !$*UTF8*$!\n{\n\tobjects = {\n");

    let err = integrate_with(ctx.settings(), &request(&ctx, "2.0")).unwrap_err();

    assert!(matches!(err, AppError::Parse { .. }));
    assert_eq!(ctx.read_pbxproj(), "// !$*UTF8*$!\n{\n\tobjects = {\n");
}

#[test]
fn workspace_input_resolves_the_member_project() {
    let ctx = TestContext::with_fixture("basic");
    let workspace = ctx.write_workspace("App", &["group:App.xcodeproj"]);

    let request = IntegrateRequest::new(&workspace, "2.0").target("App").scripts_path("Lint");
    let report = integrate_with(ctx.settings(), &request).unwrap();

    assert_eq!(report.outcome, IntegrationOutcome::Inserted);
    assert_eq!(report.identity.project_name(), Some("App"));
    assert!(ctx.phase_names("App").iter().any(|name| name == LINT_PHASE));
}
