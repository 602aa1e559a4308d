//! C language profile.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn declarator_name(node: &Node, source: &[u8]) -> Option<String> {
    // Declarators nest: pointer_declarator -> identifier, array_declarator ->
    // identifier, etc. Walk down to the innermost identifier.
    let mut current = *node;
    loop {
        if current.kind() == "identifier" || current.kind() == "field_identifier" {
            return current.utf8_text(source).ok().map(|s| s.to_string());
        }
        let next = current
            .child_by_field_name("declarator")
            .or_else(|| current.child(current.child_count().saturating_sub(1)));
        match next {
            Some(n) if n.id() != current.id() => current = n,
            _ => return None,
        }
    }
}

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let declarator = node.children(&mut cursor).find(|c| {
        matches!(c.kind(), "init_declarator" | "identifier" | "pointer_declarator" | "array_declarator")
    })?;
    declarator_name(&declarator, source)
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let path = node
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "string_literal" | "system_lib_string"))?;
    let text = path.utf8_text(source).ok()?;
    let trimmed = text.trim_matches(|c| c == '"' || c == '<' || c == '>');
    Some(trimmed.rsplit('/').next().unwrap_or(trimmed).to_string())
}

fn visibility_of(_name: &str, node: &Node, source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let is_static = node.children(&mut cursor).any(|c| {
        c.kind() == "storage_class_specifier" && c.utf8_text(source).map(|t| t == "static").unwrap_or(false)
    });
    if is_static {
        (Visibility::Private, false)
    } else {
        (Visibility::Public, true)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("__declspec(dllexport)") || preceding.contains("visibility(\"default\")")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::C,
        language: || tree_sitter_c::LANGUAGE.into(),
        function_like: &["function_definition"],
        variable_kinds: &["declaration"],
        class_kinds: &["struct_specifier", "enum_specifier", "union_specifier"],
        import_kinds: &["preproc_include"],
        call_kinds: &["call_expression"],
        block_kinds: &["compound_statement"],
        terminator_kinds: &["return_statement"],
        exit_sinks: &["exit(", "abort(", "_exit("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &["_test.c"],
        heritage_kinds: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ffi_marker() {
        assert!(is_ffi_marker("__declspec(dllexport) void foo();"));
        assert!(!is_ffi_marker("void foo();"));
    }
}
