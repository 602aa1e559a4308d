//! C++ language profile.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn declarator_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut current = *node;
    loop {
        if matches!(current.kind(), "identifier" | "field_identifier" | "destructor_name") {
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
        matches!(c.kind(), "init_declarator" | "identifier" | "pointer_declarator" | "reference_declarator")
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

/// Walks backward over preceding siblings within the enclosing class body
/// looking for the nearest `access_specifier` (`public:`/`private:`/...).
/// Free functions outside a class have none; fall back to the C rule.
fn visibility_of(_name: &str, node: &Node, source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let is_static = node.children(&mut cursor).any(|c| {
        c.kind() == "storage_class_specifier" && c.utf8_text(source).map(|t| t == "static").unwrap_or(false)
    });

    let mut sibling = node.prev_sibling();
    while let Some(s) = sibling {
        if s.kind() == "access_specifier" {
            return match s.utf8_text(source).unwrap_or("") {
                "public" => (Visibility::Public, true),
                "protected" => (Visibility::Internal, false),
                _ => (Visibility::Private, false),
            };
        }
        sibling = s.prev_sibling();
    }

    if is_static {
        (Visibility::Private, false)
    } else {
        (Visibility::Public, true)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("extern \"C\"") || preceding.contains("__declspec(dllexport)")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Cpp,
        language: || tree_sitter_cpp::LANGUAGE.into(),
        function_like: &["function_definition"],
        variable_kinds: &["declaration"],
        class_kinds: &["class_specifier", "struct_specifier", "enum_specifier", "union_specifier"],
        import_kinds: &["preproc_include"],
        call_kinds: &["call_expression"],
        block_kinds: &["compound_statement"],
        terminator_kinds: &["return_statement", "throw_statement"],
        exit_sinks: &["exit(", "abort(", "std::exit("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &["_test.cpp", "_test.cc"],
        heritage_kinds: &["base_class_clause"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ffi_marker_extern_c() {
        assert!(is_ffi_marker("extern \"C\" {\nvoid foo();\n}"));
        assert!(!is_ffi_marker("void foo() {}"));
    }
}
