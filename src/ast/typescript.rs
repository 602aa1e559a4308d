//! TypeScript / JavaScript language profile. The spec treats both under one
//! table row (§4.2); `ast::detect_language` picks the grammar by extension
//! and both resolve to this same profile shape via `ts_profile`/`js_profile`.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| n.utf8_text(source).ok())
        .map(|s| s.to_string())
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let source_node = node.child_by_field_name("source")?;
    let text = source_node.utf8_text(source).ok()?;
    let trimmed = text.trim_matches(|c| c == '"' || c == '\'' || c == '`');
    Some(trimmed.rsplit('/').next().unwrap_or(trimmed).to_string())
}

fn visibility_of(_name: &str, node: &Node, _source: &[u8]) -> (Visibility, bool) {
    let exported = node
        .parent()
        .map(|p| matches!(p.kind(), "export_statement" | "export_default_declaration"))
        .unwrap_or(false);
    if exported {
        (Visibility::Public, true)
    } else {
        (Visibility::Private, false)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("ffi-napi") || preceding.contains("N-API") || preceding.contains("napi::")
}

fn profile_for(id: LanguageId, language: fn() -> tree_sitter::Language) -> LanguageProfile {
    LanguageProfile {
        id,
        language,
        function_like: &[
            "function_declaration",
            "method_definition",
            "arrow_function",
            "function_expression",
        ],
        variable_kinds: &["variable_declarator"],
        class_kinds: &["class_declaration", "interface_declaration"],
        import_kinds: &["import_statement"],
        call_kinds: &["call_expression"],
        block_kinds: &["statement_block"],
        terminator_kinds: &["return_statement", "throw_statement"],
        exit_sinks: &["process.exit("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 200,
        is_ffi_marker,
        test_file_suffixes: &[".test.ts", ".spec.ts", ".test.js", ".spec.js", ".test.tsx", ".spec.tsx"],
        heritage_kinds: &["class_heritage"],
    }
}

pub fn ts_profile() -> LanguageProfile {
    profile_for(LanguageId::TypeScript, || {
        tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
    })
}

pub fn js_profile() -> LanguageProfile {
    profile_for(LanguageId::JavaScript, || tree_sitter_javascript::LANGUAGE.into())
}
