//! PHP language profile.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("left")
        .and_then(|n| n.utf8_text(source).ok())
        .map(|s| s.trim_start_matches('$').to_string())
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let name_node = node
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "qualified_name" | "name"))?;
    let text = name_node.utf8_text(source).ok()?;
    Some(text.rsplit('\\').next().unwrap_or(text).to_string())
}

fn visibility_of(_name: &str, node: &Node, source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let keywords: Vec<&str> = node
        .children(&mut cursor)
        .filter(|c| c.kind() == "visibility_modifier")
        .filter_map(|c| c.utf8_text(source).ok())
        .collect();
    if keywords.contains(&"public") {
        (Visibility::Public, true)
    } else if keywords.contains(&"protected") {
        (Visibility::Internal, false)
    } else if keywords.contains(&"private") {
        (Visibility::Private, false)
    } else {
        (Visibility::Public, true)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("FFI::") || preceding.contains("\\FFI\\")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Php,
        language: || tree_sitter_php::LANGUAGE_PHP.into(),
        function_like: &["function_definition", "method_declaration"],
        variable_kinds: &["assignment_expression"],
        class_kinds: &["class_declaration", "interface_declaration", "trait_declaration"],
        import_kinds: &["namespace_use_declaration"],
        call_kinds: &["function_call_expression", "member_call_expression", "scoped_call_expression"],
        block_kinds: &["compound_statement"],
        terminator_kinds: &["return_statement"],
        exit_sinks: &["exit(", "die("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &["Test.php"],
        heritage_kinds: &["base_clause", "class_interface_clause"],
    }
}
