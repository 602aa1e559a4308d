//! Ruby language profile.
//!
//! `require`/`require_relative` are plain method calls in the Ruby grammar,
//! not a dedicated import node, so `import_kinds` is empty here — cross-file
//! import edges are not tracked for Ruby. Everything else (definitions,
//! calls, unreachable-block detection) works the same as other languages.

use super::profile::{LanguageId, LanguageProfile};
use crate::models::Visibility;
use tree_sitter::Node;

fn extract_variable_name(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("left")
        .and_then(|n| n.utf8_text(source).ok())
        .map(|s| s.to_string())
}

fn extract_import_target(_node: &Node, _source: &[u8]) -> Option<String> {
    None
}

fn visibility_of(name: &str, _node: &Node, _source: &[u8]) -> (Visibility, bool) {
    if name.starts_with('_') {
        (Visibility::Private, false)
    } else {
        (Visibility::Public, true)
    }
}

fn is_ffi_marker(preceding: &str) -> bool {
    preceding.contains("attach_function") || preceding.contains("Fiddle::Function")
}

pub fn profile() -> LanguageProfile {
    LanguageProfile {
        id: LanguageId::Ruby,
        language: || tree_sitter_ruby::LANGUAGE.into(),
        function_like: &["method", "singleton_method"],
        variable_kinds: &["assignment"],
        class_kinds: &["class", "module"],
        import_kinds: &[],
        call_kinds: &["call", "method_call"],
        block_kinds: &["body_statement"],
        terminator_kinds: &["return"],
        exit_sinks: &["exit", "abort", "Kernel.exit"],
        terminator_macros: &[],
        extract_variable_name,
        extract_import_target,
        visibility_of,
        ffi_window: 200,
        is_ffi_marker,
        test_file_suffixes: &["_test.rb", "_spec.rb"],
        heritage_kinds: &["superclass"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_underscore_is_private() {
        assert_eq!(visibility_of("_helper", &dummy(), &[]), (Visibility::Private, false));
        assert_eq!(visibility_of("run", &dummy(), &[]), (Visibility::Public, true));
    }

    #[test]
    fn test_is_ffi_marker() {
        assert!(is_ffi_marker("attach_function :foo, [:int], :int"));
        assert!(!is_ffi_marker("def foo; end"));
    }

    fn dummy() -> Node<'static> {
        use std::sync::OnceLock;
        static TREE: OnceLock<tree_sitter::Tree> = OnceLock::new();
        let tree = TREE.get_or_init(|| {
            let mut parser = tree_sitter::Parser::new();
            parser.set_language(&tree_sitter_ruby::LANGUAGE.into()).unwrap();
            parser.parse("x = 1", None).unwrap()
        });
        tree.root_node()
    }
}
