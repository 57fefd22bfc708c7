//! Property-based tests for project generation
//!
//! Determinism, absence of unresolved actions in substituted output, and the
//! all-or-nothing write policy.

use std::{collections::BTreeMap, fs, path::Path};

use chrono::{DateTime, TimeZone, Utc};
use healthgen_generation::{
    ContextBuilder, GenerationConfig, GenerationError, ProjectGenerator, TemplateDescriptor,
    TemplateRegistry, Tier,
};
use proptest::prelude::*;
use tempfile::TempDir;
use walkdir::WalkDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn tier_strategy() -> impl Strategy<Value = Tier> {
    prop::sample::select(Tier::ALL.to_vec())
}

fn project_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,12}"
}

fn generate(name: &str, tier: Tier, root: &Path) -> healthgen_generation::GenerationReport {
    let config = GenerationConfig::new(name, format!("example.com/{name}"), tier);
    let context = ContextBuilder::new().build_at(&config, fixed_time()).unwrap();
    ProjectGenerator::new()
        .unwrap()
        .generate(&context, root)
        .unwrap()
}

/// Relative path -> contents for every file under `root`
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned();
            (relative, fs::read(entry.path()).unwrap())
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Identical inputs produce byte-identical trees
    #[test]
    fn prop_generation_is_deterministic(name in project_name_strategy(), tier in tier_strategy()) {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        generate(&name, tier, first.path());
        generate(&name, tier, second.path());

        prop_assert_eq!(snapshot(first.path()), snapshot(second.path()));
    }

    /// Substituted files never contain unresolved actions
    #[test]
    fn prop_no_unresolved_actions(name in project_name_strategy(), tier in tier_strategy()) {
        let temp_dir = TempDir::new().unwrap();
        let report = generate(&name, tier, temp_dir.path());

        for file in report.files.iter().filter(|file| file.was_templated) {
            let contents = fs::read_to_string(temp_dir.path().join(&file.path)).unwrap();
            let path = file.path.display();
            prop_assert!(!contents.contains("{{"), "{} has unresolved actions", path);
            prop_assert!(!contents.contains("}}"), "{} has unresolved actions", path);
        }
    }

    /// The tree holds exactly the files the report lists
    #[test]
    fn prop_report_matches_tree(tier in tier_strategy()) {
        let temp_dir = TempDir::new().unwrap();
        let report = generate("svc", tier, temp_dir.path());

        let on_disk: Vec<String> = snapshot(temp_dir.path()).into_keys().collect();
        let mut reported: Vec<String> = report
            .paths()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        reported.sort();
        prop_assert_eq!(on_disk, reported);
    }
}

#[test]
fn test_basic_tier_has_no_security_files() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    generate("svc-a", Tier::Basic, temp_dir.path());

    assert!(temp_dir.path().join("go.mod").is_file());
    assert!(temp_dir.path().join("cmd/server/main.go").is_file());
    assert!(!temp_dir.path().join("internal/security").exists());
    assert!(!temp_dir.path().join("internal/compliance").exists());
}

#[test]
fn test_enterprise_tier_substitutes_module_everywhere() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let report = generate("svc-b", Tier::Enterprise, temp_dir.path());

    for path in [
        "internal/security/mtls.go",
        "internal/security/rbac.go",
        "internal/compliance/audit.go",
    ] {
        assert!(temp_dir.path().join(path).is_file(), "{path} missing");
    }

    let go_mod = fs::read_to_string(temp_dir.path().join("go.mod")).unwrap();
    assert!(go_mod.starts_with("module example.com/svc-b"));

    for (path, contents) in snapshot(temp_dir.path()) {
        let text = String::from_utf8_lossy(&contents);
        assert!(!text.contains("{{.Config.GoModule}}"), "{path} kept a raw action");
    }
    assert!(report.files.iter().all(|file| !file.path.starts_with("..")));
}

#[test]
fn test_server_timing_gates_content_not_files() {
    let basic = TempDir::new().unwrap();
    let intermediate = TempDir::new().unwrap();
    generate("svc", Tier::Basic, basic.path());
    generate("svc", Tier::Intermediate, intermediate.path());

    let handler =
        |root: &Path| fs::read_to_string(root.join("internal/handlers/health.go")).unwrap();
    assert!(!handler(basic.path()).contains("Server-Timing"));
    assert!(handler(intermediate.path()).contains("Server-Timing"));
}

#[test]
fn test_undefined_variable_writes_nothing() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();

    let mut registry = TemplateRegistry::new();
    registry
        .register(TemplateDescriptor::new(
            "go-mod",
            "go.mod",
            b"module {{.Config.GoModule}}\n".as_slice(),
        ))
        .unwrap();
    registry
        .register(TemplateDescriptor::new(
            "broken",
            "internal/broken.go",
            b"package broken // {{.Config.NonExistentField}}\n".as_slice(),
        ))
        .unwrap();

    let config = GenerationConfig::new("svc-c", "example.com/svc-c", Tier::Basic);
    let context = ContextBuilder::new().build(&config).unwrap();
    let err = ProjectGenerator::with_registry(registry)
        .unwrap()
        .generate(&context, temp_dir.path())
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::UndefinedVariable { ref variable, .. }
            if variable == ".Config.NonExistentField"
    ));
    assert!(snapshot(temp_dir.path()).is_empty());
}

#[test]
fn test_undefined_variable_in_untaken_branch_is_rejected() {
    let mut registry = TemplateRegistry::new();
    registry
        .register(TemplateDescriptor::new(
            "gated",
            "main.go",
            b"{{if .Features.mtls}}{{.Config.Missing}}{{end}}".as_slice(),
        ))
        .unwrap();

    let config = GenerationConfig::new("svc", "example.com/svc", Tier::Basic);
    let context = ContextBuilder::new().build(&config).unwrap();
    let generator = ProjectGenerator::with_registry(registry).unwrap();
    let descriptors: Vec<_> = generator.registry().iter().collect();

    assert!(matches!(
        generator.render(&descriptors, &context),
        Err(GenerationError::UndefinedVariable { .. })
    ));
}
