//! C# language profile.

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
    let text = text.trim_start_matches("using").trim().trim_end_matches(';').trim();
    Some(text.rsplit('.').next().unwrap_or(text).to_string())
}

fn visibility_of(_name: &str, node: &Node, source: &[u8]) -> (Visibility, bool) {
    let mut cursor = node.walk();
    let mut saw_public = false;
    let mut saw_protected = false;
    let mut saw_private = false;
    for child in node.children(&mut cursor) {
        if let Ok(text) = child.utf8_text(source) {
            match text {
                "public" => saw_public = true,
                "protected" => saw_protected = true,
                "private" => saw_private = true,
                "internal" => {}
                _ => {}
            }
        }
    }
    if saw_public {
        (Visibility::Public, true)
    } else if saw_protected {
        (Visibility::Internal, false)
    } else if saw_private {
        (Visibility::Private, false)
    } else {
        (Visibility::Internal, false)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("[DllImport") || preceding.contains("DllImportAttribute")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::CSharp,
        language: || tree_sitter_c_sharp::LANGUAGE.into(),
        function_like: &["method_declaration", "local_function_statement", "constructor_declaration"],
        variable_kinds: &["local_declaration_statement"],
        class_kinds: &["class_declaration", "interface_declaration", "struct_declaration"],
        import_kinds: &["using_directive"],
        call_kinds: &["invocation_expression"],
        block_kinds: &["block"],
        terminator_kinds: &["return_statement", "throw_statement"],
        exit_sinks: &["Environment.Exit("],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 150,
        is_ffi_marker,
        test_file_suffixes: &["Tests.cs", "Test.cs"],
        heritage_kinds: &["base_list"],
    }
}
