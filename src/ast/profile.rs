//! Per-language tables driving the generic harvesting walk (§4.2).

use crate::models::Visibility;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Go,
    Rust,
    Python,
    TypeScript,
    JavaScript,
    Java,
    CSharp,
    C,
    Cpp,
    Ruby,
    Php,
}

impl LanguageId {
    pub fn name(&self) -> &'static str {
        match self {
            LanguageId::Go => "Go",
            LanguageId::Rust => "Rust",
            LanguageId::Python => "Python",
            LanguageId::TypeScript => "TypeScript",
            LanguageId::JavaScript => "JavaScript",
            LanguageId::Java => "Java",
            LanguageId::CSharp => "C#",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Ruby => "Ruby",
            LanguageId::Php => "PHP",
        }
    }
}

pub type VariableNameFn = fn(&Node, &[u8]) -> Option<String>;
pub type ImportTargetFn = fn(&Node, &[u8]) -> Option<String>;
pub type VisibilityFn = fn(&str, &Node, &[u8]) -> (Visibility, bool);

/// Table of AST-node-kind sets and extraction hooks for one language.
/// Populated once per language in its own module and looked up by
/// `LanguageId` from `ast::profile_for`.
pub struct LanguageProfile {
    pub id: LanguageId,
    pub language: fn() -> tree_sitter::Language,

    pub function_like: &'static [&'static str],
    pub variable_kinds: &'static [&'static str],
    pub class_kinds: &'static [&'static str],
    pub import_kinds: &'static [&'static str],
    pub call_kinds: &'static [&'static str],

    /// Node kinds that mark a function body block.
    pub block_kinds: &'static [&'static str],

    /// Node kinds terminating a block unconditionally (return/raise/throw).
    pub terminator_kinds: &'static [&'static str],
    /// Substrings that, if found in a statement's text, mark it a
    /// terminating exit sink (`panic(`, `os.Exit(`, `sys.exit(`, ...).
    pub exit_sinks: &'static [&'static str],
    /// Rust-only: macro names that terminate a block (`panic!`, ...).
    pub terminator_macros: &'static [&'static str],

    pub extract_variable_name: VariableNameFn,
    pub extract_import_target: ImportTargetFn,
    pub visibility_of: VisibilityFn,

    /// Byte window scanned backwards from a definition's start byte for
    /// FFI / decorator markers.
    pub ffi_window: usize,
    pub is_ffi_marker: fn(&str) -> bool,

    pub test_file_suffixes: &'static [&'static str],

    /// Node kinds for Java/C#/TS "implements"/heritage clauses, used to
    /// collect `TypeImplementation` records. Empty for languages without
    /// nominal interface implementation.
    pub heritage_kinds: &'static [&'static str],
}

fn utf8<'a>(node: &Node, source: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(source).ok()
}

/// Shared helper: extract the plain `name` field as a string, used by the
/// majority of languages whose grammar exposes a `name` field uniformly.
pub fn name_field(node: &Node, source: &[u8]) -> Option<String> {
    node.child_by_field_name("name")
        .and_then(|n| utf8(&n, source))
        .map(|s| s.to_string())
}
