//! Python language profile.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("left")
        .and_then(|n| n.utf8_text(source).ok())
        .map(|s| s.to_string())
}

fn extract_import_target(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let dotted = node.children(&mut cursor).find(|c| {
        matches!(c.kind(), "dotted_name" | "aliased_import" | "identifier")
    })?;
    let text = dotted.utf8_text(source).ok()?;
    Some(text.rsplit('.').next().unwrap_or(text).to_string())
}

fn visibility_of(name: &str, _node: &Node, _source: &[u8]) -> (Visibility, bool) {
    if name.starts_with('_') {
        (Visibility::Private, false)
    } else {
        (Visibility::Public, true)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("ctypes")
        || preceding.contains("@cython.cfunc")
        || preceding.contains("cffi")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Python,
        language: || tree_sitter_python::LANGUAGE.into(),
        function_like: &["function_definition"],
        variable_kinds: &["assignment"],
        class_kinds: &["class_definition"],
        import_kinds: &["import_statement", "import_from_statement"],
        call_kinds: &["call"],
        block_kinds: &["block"],
        terminator_kinds: &["return_statement", "raise_statement"],
        exit_sinks: &["sys.exit(", "os._exit(", "SystemExit"],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 200,
        is_ffi_marker,
        test_file_suffixes: &["_test.py"],
        heritage_kinds: &["argument_list"],
    }
}
