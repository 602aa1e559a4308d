//! End-to-end scenarios across the full pipeline: harvest -> graph ->
//! reachability -> classification.

use deadwood::AnalyzerConfig;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn go_unused_private_function_is_reported_dead() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "main.go",
        "package main\n\nfunc unusedHelper() {}\n\nfunc main() {}\n",
    );

    let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
    let (analysis, _errors) = deadwood::analyze(&config, vec![path]);

    assert!(analysis.dead_functions.iter().any(|f| f.name == "unusedHelper"));
    assert!(!analysis.dead_functions.iter().any(|f| f.name == "main"));
}

#[test]
fn go_code_after_return_is_flagged_unreachable() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "main.go",
        "package main\n\nfunc doWork() {\n\treturn\n\tfmt.Println(\"never runs\")\n}\n\nfunc main() {\n\tdoWork()\n}\n",
    );

    let config = AnalyzerConfig::new();
    let (analysis, _errors) = deadwood::analyze(&config, vec![path]);

    assert_eq!(analysis.unreachable_blocks.len(), 1);
    assert!(analysis.unreachable_blocks[0].reason.contains("line 4"));
}

#[test]
fn python_exported_class_survives_underscore_class_does_not() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "models.py",
        "class PublicModel:\n    pass\n\nclass _InternalHelper:\n    pass\n",
    );

    let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
    let (analysis, _errors) = deadwood::analyze(&config, vec![path]);

    // `PublicModel` has no leading underscore so it's treated as exported
    // and assumed to be part of the public API surface (an entry point);
    // `_InternalHelper` gets no such pass and nothing references it.
    assert!(!analysis.dead_classes.iter().any(|c| c.name == "PublicModel"));
    assert!(analysis.dead_classes.iter().any(|c| c.name == "_InternalHelper"));
}

#[test]
fn typescript_interface_dispatch_keeps_both_implementors_alive() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "handlers.ts",
        "interface Handler {\n  handle(): void;\n}\n\nclass A implements Handler {\n  handle() {}\n}\n\nclass B implements Handler {\n  handle() {}\n}\n\nexport function run(h: Handler) {\n  h.handle();\n}\n",
    );

    let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
    let (analysis, _errors) = deadwood::analyze(&config, vec![path]);

    // Direct name resolution only lands `run`'s dynamic-dispatch call on
    // one of the two `handle` methods (last-write-wins); the vtable-driven
    // widening pass must add an indirect-call edge to the other one too,
    // so neither implementation is reported dead even though no call site
    // names `A` or `B` directly.
    assert!(!analysis.dead_functions.iter().any(|f| f.name == "handle" && f.receiver_type.as_deref() == Some("A")));
    assert!(!analysis.dead_functions.iter().any(|f| f.name == "handle" && f.receiver_type.as_deref() == Some("B")));
}

#[test]
fn rust_ffi_export_is_treated_as_entry_point() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "ffi.rs",
        "#[no_mangle]\npub extern \"C\" fn exported_symbol() {}\n\nfn main() {}\n",
    );

    let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
    let (analysis, _errors) = deadwood::analyze(&config, vec![path]);

    // FFI exports are entry points (never reported dead), but the harvested
    // definition should still carry the FFI flag for downstream consumers.
    assert!(!analysis.dead_functions.iter().any(|f| f.name == "exported_symbol"));
}

#[test]
fn cancellation_mid_run_is_recorded_as_per_file_errors() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<PathBuf> = (0..10)
        .map(|i| write_file(&dir, &format!("f{i}.go"), "package main\n\nfunc main() {}\n"))
        .collect();

    let ctx = deadwood::processor::Context::new();
    ctx.cancellation.cancel();
    let results = deadwood::processor::map_files(&ctx, paths, |p| deadwood::ast::harvest_file(p));

    assert!(results.len() <= 10);
    assert!(!ctx.errors.is_empty());
}
