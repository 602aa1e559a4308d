//! Java language profile.

use super::profile::{name_field, LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let declarator = node
        .children(&mut cursor)
        .find(|c| c.kind() == "variable_declarator")?;
    name_field(&declarator, source)
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    let text = text.trim_start_matches("import").trim().trim_end_matches(';').trim();
    Some(text.rsplit('.').next().unwrap_or(text).to_string())
}

fn visibility_of(_name: &str, node: &Node, source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let modifiers = node.children(&mut cursor).find(|c| c.kind() == "modifiers");
    let text = modifiers.and_then(|m| m.utf8_text(source).ok()).unwrap_or("");
    if text.contains("public") {
        (Visibility::Public, true)
    } else if text.contains("protected") {
        (Visibility::Internal, false)
    } else if text.contains("private") {
        (Visibility::Private, false)
    } else {
        (Visibility::Internal, false)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("native ") || preceding.contains("@Native")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Java,
        language: || tree_sitter_java::LANGUAGE.into(),
        function_like: &["method_declaration", "constructor_declaration"],
        variable_kinds: &["local_variable_declaration"],
        class_kinds: &["class_declaration", "interface_declaration", "enum_declaration"],
        import_kinds: &["import_declaration"],
        call_kinds: &["method_invocation"],
        block_kinds: &["block"],
        terminator_kinds: &["return_statement", "throw_statement"],
        exit_sinks: &["System.exit("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &["Test.java", "Tests.java"],
        heritage_kinds: &["super_interfaces", "superclass"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ffi_marker_native() {
        assert!(is_ffi_marker("public native void foo();"));
        assert!(!is_ffi_marker("public void foo() {}"));
    }
}
