//! Rust language profile. Named `rust_lang` to avoid colliding with the
//! `rust` crate-local shadowing that `mod rust;` would otherwise invite.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("pattern")
        .and_then(|n| n.utf8_text(source).ok())
        .map(|s| s.to_string())
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let text = node.utf8_text(source).ok()?;
    let text = text.trim_start_matches("use").trim().trim_end_matches(';').trim();
    let last_segment = text.rsplit("::").next().unwrap_or(text);
    Some(last_segment.trim_matches(|c| c == '{' || c == '}' || c == ' ').to_string())
}

fn visibility_of(_name: &str, node: &Node, _source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let has_pub = node
        .children(&mut cursor)
        .any(|c| c.kind() == "visibility_modifier");
    if has_pub {
        (Visibility::Public, true)
    } else {
        (Visibility::Private, false)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("#[no_mangle]") || preceding.contains("extern \"C\"")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Rust,
        language: || tree_sitter_rust::LANGUAGE.into(),
        function_like: &["function_item"],
        variable_kinds: &["let_declaration"],
        class_kinds: &["struct_item", "enum_item", "trait_item"],
        import_kinds: &["use_declaration"],
        call_kinds: &["call_expression", "macro_invocation"],
        block_kinds: &["block"],
        terminator_kinds: &["return_expression"],
        exit_sinks: &[],
        terminator_macros: &["panic!", "unreachable!", "todo!", "unimplemented!"],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &[],
        heritage_kinds: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ffi_marker_no_mangle() {
        assert!(is_ffi_marker("#[no_mangle]\npub extern \"C\" fn foo() {}"));
        assert!(!is_ffi_marker("pub fn foo() {}"));
    }

    #[test]
    fn test_extract_import_target_strips_path() {
        let src = "use std::collections::HashMap;";
        assert_eq!(
            extract_import_target_from_str(src),
            "HashMap".to_string()
        );
    }

    fn extract_import_target_from_str(src: &str) -> String {
        let text = src.trim_start_matches("use").trim().trim_end_matches(';').trim();
        text.rsplit("::").next().unwrap_or(text).to_string()
    }
}
