//! Per-file AST harvesting (§4.2): one generic pre-order walk driven by a
//! per-language `LanguageProfile` table, rather than ten bespoke
//! per-language extractors. Each language module under here only supplies
//! the node-kind tables and the handful of extraction hooks the walk can't
//! make generic (variable-name shape, import-target shape, visibility
//! rules, FFI markers).

pub mod c;
pub mod cpp;
pub mod csharp;
pub mod go;
pub mod java;
pub mod php;
pub mod profile;
pub mod python;
pub mod ruby;
pub mod rust_lang;
pub mod typescript;
pub mod unreachable;

use crate::error::EngineError;
use crate::models::{CallReference, Definition, DefinitionKind, RefType, TypeImplementation, UnreachableBlock};
use profile::{LanguageId, LanguageProfile};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Everything harvested from one source file, before aggregation assigns
/// node ids and merges it into the reference graph (§3, §4.3).
pub struct FileFindings {
    pub path: PathBuf,
    pub language: LanguageId,
    pub definitions: Vec<Definition>,
    pub usages: FxHashSet<String>,
    pub calls: Vec<CallReference>,
    pub type_impls: Vec<TypeImplementation>,
    pub unreachable_blocks: Vec<UnreachableBlock>,
    /// Line count of the source file, for the §4.8 dead-code percentage.
    pub line_count: usize,
}

pub fn profile_for(id: LanguageId) -> LanguageProfile {
    match id {
        LanguageId::Go => go::profile(),
        LanguageId::Rust => rust_lang::profile(),
        LanguageId::Python => python::profile(),
        LanguageId::TypeScript => typescript::ts_profile(),
        LanguageId::JavaScript => typescript::js_profile(),
        LanguageId::Java => java::profile(),
        LanguageId::CSharp => csharp::profile(),
        LanguageId::C => c::profile(),
        LanguageId::Cpp => cpp::profile(),
        LanguageId::Ruby => ruby::profile(),
        LanguageId::Php => php::profile(),
    }
}

const CPP_HEADER_MARKERS: &[&str] = &[
    "class ", "namespace ", "template<", "template <", "public:", "private:", "protected:", "::",
];

fn looks_like_cpp_header(source: &[u8]) -> bool {
    let text = String::from_utf8_lossy(source);
    CPP_HEADER_MARKERS.iter().any(|m| text.contains(m))
}

/// Extension-based dispatch, with a content sniff for the ambiguous `.h`
/// case (shared by C and C++).
pub fn detect_language(path: &Path, source: &[u8]) -> Option<LanguageId> {
    let ext = path.extension()?.to_str()?;
    Some(match ext {
        "go" => LanguageId::Go,
        "rs" => LanguageId::Rust,
        "py" | "pyi" => LanguageId::Python,
        "ts" | "tsx" | "mts" | "cts" => LanguageId::TypeScript,
        "js" | "jsx" | "mjs" | "cjs" => LanguageId::JavaScript,
        "java" => LanguageId::Java,
        "cs" => LanguageId::CSharp,
        "c" => LanguageId::C,
        "h" => {
            if looks_like_cpp_header(source) {
                LanguageId::Cpp
            } else {
                LanguageId::C
            }
        }
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => LanguageId::Cpp,
        "rb" => LanguageId::Ruby,
        "php" => LanguageId::Php,
        _ => return None,
    })
}

pub fn harvest_file(path: &Path) -> Result<FileFindings, EngineError> {
    let source = std::fs::read(path)?;
    let language = detect_language(path, &source)
        .ok_or_else(|| EngineError::ParseFailure("unrecognized file extension".to_string()))?;
    let profile = profile_for(language);
    harvest_source(&source, path, &profile)
}

pub fn harvest_source(
    source: &[u8],
    path: &Path,
    profile: &LanguageProfile,
) -> Result<FileFindings, EngineError> {
    let language = (profile.language)();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| EngineError::ParseFailure(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| EngineError::ParseFailure("tree-sitter produced no tree".to_string()))?;

    let is_test_file = profile.test_file_suffixes.iter().any(|suffix| {
        path.to_str().map(|p| p.ends_with(suffix)).unwrap_or(false)
    });
    let line_count = if source.is_empty() {
        0
    } else {
        source.iter().filter(|&&b| b == b'\n').count() + 1
    };

    let mut ctx = WalkCtx {
        file: path,
        source,
        profile,
        is_test_file,
        findings: FileFindings {
            path: path.to_path_buf(),
            language: profile.id,
            definitions: Vec::new(),
            usages: FxHashSet::default(),
            calls: Vec::new(),
            type_impls: Vec::new(),
            unreachable_blocks: Vec::new(),
            line_count,
        },
        function_stack: Vec::new(),
        class_stack: Vec::new(),
    };
    ctx.walk(tree.root_node());
    Ok(ctx.findings)
}

const MEMBER_CALL_KINDS: &[&str] = &[
    "field_expression",
    "member_expression",
    "selector_expression",
    "scoped_identifier",
    "attribute",
    "member_access_expression",
    "scoped_call_expression",
];

struct WalkCtx<'a> {
    file: &'a Path,
    source: &'a [u8],
    profile: &'a LanguageProfile,
    is_test_file: bool,
    findings: FileFindings,
    function_stack: Vec<String>,
    class_stack: Vec<String>,
}

impl<'a> WalkCtx<'a> {
    fn walk(&mut self, node: Node) {
        let kind = node.kind();

        if self.profile.block_kinds.contains(&kind) {
            if let Some(block) =
                unreachable::detect_in_block(&node, self.source, self.file, self.profile)
            {
                self.findings.unreachable_blocks.push(block);
            }
        }

        if self.profile.function_like.contains(&kind) {
            self.visit_function(&node);
            return;
        }
        if self.profile.class_kinds.contains(&kind) {
            self.visit_class(&node);
            return;
        }
        if self.profile.variable_kinds.contains(&kind) {
            self.visit_variable(&node);
        }
        if self.profile.import_kinds.contains(&kind) {
            self.visit_import(&node);
        }
        if self.profile.call_kinds.contains(&kind) {
            self.visit_call(&node);
        }

        self.walk_children(&node);
    }

    fn walk_children(&mut self, node: &Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child);
        }
    }

    fn line_range(node: &Node) -> (u32, u32) {
        (
            node.start_position().row as u32 + 1,
            node.end_position().row as u32 + 1,
        )
    }

    fn check_ffi(&self, node: &Node) -> bool {
        let start = node.start_byte();
        let window_start = start.saturating_sub(self.profile.ffi_window);
        match std::str::from_utf8(&self.source[window_start..start]) {
            Ok(text) => (self.profile.is_ffi_marker)(text),
            Err(_) => false,
        }
    }

    fn visit_function(&mut self, node: &Node) {
        let name = profile::name_field(node, self.source).unwrap_or_else(|| "<anonymous>".to_string());
        let (visibility, exported) = (self.profile.visibility_of)(&name, node, self.source);
        let kind = if self.class_stack.is_empty() {
            DefinitionKind::Function
        } else {
            DefinitionKind::Method
        };
        let (start, end) = Self::line_range(node);
        let mut def = Definition::new(name.clone(), kind, self.file.to_path_buf(), start, end, visibility, exported);
        def.is_test_file = self.is_test_file;
        def.is_ffi = self.check_ffi(node);
        def.receiver_type = self.class_stack.last().cloned();
        self.findings.definitions.push(def);

        self.function_stack.push(name);
        self.walk_children(node);
        self.function_stack.pop();
    }

    fn visit_class(&mut self, node: &Node) {
        let name = profile::name_field(node, self.source).unwrap_or_else(|| "<anonymous>".to_string());
        let (visibility, exported) = (self.profile.visibility_of)(&name, node, self.source);
        let (start, end) = Self::line_range(node);
        let mut def = Definition::new(
            name.clone(),
            DefinitionKind::Class,
            self.file.to_path_buf(),
            start,
            end,
            visibility,
            exported,
        );
        def.is_test_file = self.is_test_file;
        self.findings.definitions.push(def);

        let interfaces = self.extract_heritage(node);

        self.class_stack.push(name.clone());
        self.walk_children(node);
        self.class_stack.pop();

        if !interfaces.is_empty() {
            let methods: Vec<String> = self
                .findings
                .definitions
                .iter()
                .filter(|d| d.receiver_type.as_deref() == Some(name.as_str()))
                .map(|d| d.name.clone())
                .collect();
            for interface_name in interfaces {
                self.findings.type_impls.push(TypeImplementation {
                    type_name: name.clone(),
                    interface_name: Some(interface_name),
                    methods: Some(methods.clone()),
                });
            }
        }
    }

    fn extract_heritage(&self, node: &Node) -> Vec<String> {
        if self.profile.heritage_kinds.is_empty() {
            return Vec::new();
        }
        let mut cursor = node.walk();
        let mut names = Vec::new();
        for child in node.children(&mut cursor) {
            if self.profile.heritage_kinds.contains(&child.kind()) {
                collect_identifiers(&child, self.source, &mut names);
            }
        }
        names
    }

    fn visit_variable(&mut self, node: &Node) {
        let Some(name) = (self.profile.extract_variable_name)(node, self.source) else {
            return;
        };
        let (visibility, exported) = (self.profile.visibility_of)(&name, node, self.source);
        let (start, end) = Self::line_range(node);
        let mut def = Definition::new(name, DefinitionKind::Variable, self.file.to_path_buf(), start, end, visibility, exported);
        def.is_test_file = self.is_test_file;
        // Last write wins: a later assignment to the same name simply
        // overwrites the earlier `Definition` at aggregation time via
        // `context_hash`/insertion order — recorded here unconditionally.
        self.findings.definitions.push(def);
    }

    fn visit_import(&mut self, node: &Node) {
        if let Some(target) = (self.profile.extract_import_target)(node, self.source) {
            self.findings.usages.insert(target);
        }
    }

    fn visit_call(&mut self, node: &Node) {
        let Some(caller) = self.function_stack.last().cloned() else {
            return;
        };
        let line = node.start_position().row as u32 + 1;

        let fn_child = node
            .child_by_field_name("function")
            .or_else(|| node.child_by_field_name("method"))
            .or_else(|| node.child_by_field_name("macro"));
        let Some(fn_child) = fn_child else {
            return;
        };

        if MEMBER_CALL_KINDS.contains(&fn_child.kind()) {
            let receiver = fn_child
                .child_by_field_name("object")
                .or_else(|| fn_child.child_by_field_name("operand"))
                .or_else(|| fn_child.child_by_field_name("value"))
                .or_else(|| fn_child.child_by_field_name("expression"))
                .and_then(|n| n.utf8_text(self.source).ok())
                .map(|s| s.to_string());
            let callee = fn_child
                .child_by_field_name("field")
                .or_else(|| fn_child.child_by_field_name("property"))
                .or_else(|| fn_child.child_by_field_name("attribute"))
                .or_else(|| fn_child.child_by_field_name("name"));
            if let Some(callee) = callee.and_then(|n| n.utf8_text(self.source).ok()) {
                self.findings.usages.insert(callee.to_string());
                self.findings.calls.push(CallReference {
                    caller_name: caller,
                    callee_name: callee.to_string(),
                    line,
                    ref_type: RefType::DynamicDispatch,
                    receiver_name: receiver,
                });
            }
        } else if let Ok(text) = fn_child.utf8_text(self.source) {
            self.findings.usages.insert(text.to_string());
            self.findings.calls.push(CallReference {
                caller_name: caller,
                callee_name: text.to_string(),
                line,
                ref_type: RefType::DirectCall,
                receiver_name: None,
            });
        }
    }
}

fn collect_identifiers(node: &Node, source: &[u8], out: &mut Vec<String>) {
    if matches!(node.kind(), "identifier" | "type_identifier" | "constant") {
        if let Ok(text) = node.utf8_text(source) {
            out.push(text.to_string());
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_identifiers(&child, source, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language_by_extension() {
        assert_eq!(detect_language(Path::new("a.go"), b""), Some(LanguageId::Go));
        assert_eq!(detect_language(Path::new("a.rs"), b""), Some(LanguageId::Rust));
        assert_eq!(detect_language(Path::new("a.unknown"), b""), None);
    }

    #[test]
    fn test_detect_language_disambiguates_header() {
        assert_eq!(detect_language(Path::new("a.h"), b"int foo(void);"), Some(LanguageId::C));
        assert_eq!(
            detect_language(Path::new("a.h"), b"namespace ns { class Foo {}; }"),
            Some(LanguageId::Cpp)
        );
    }

    #[test]
    fn test_harvest_go_direct_call_and_entry_point() {
        let source = b"package main\n\nfunc helper() {}\n\nfunc main() {\n\thelper()\n}\n";
        let profile = go::profile();
        let findings = harvest_source(source, Path::new("main.go"), &profile).unwrap();

        let names: Vec<_> = findings.definitions.iter().map(|d| d.name.as_str()).collect();
        assert!(names.contains(&"helper"));
        assert!(names.contains(&"main"));

        let call = findings.calls.iter().find(|c| c.callee_name == "helper").unwrap();
        assert_eq!(call.caller_name, "main");
        assert_eq!(call.ref_type, RefType::DirectCall);
    }

    #[test]
    fn test_harvest_go_unreachable_after_return() {
        let source = b"package main\n\nfunc f() {\n\treturn\n\tprint(\"dead\")\n}\n";
        let profile = go::profile();
        let findings = harvest_source(source, Path::new("main.go"), &profile).unwrap();
        assert_eq!(findings.unreachable_blocks.len(), 1);
        assert_eq!(findings.unreachable_blocks[0].start_line, 5);
    }

    #[test]
    fn test_harvest_python_assignment_and_visibility() {
        let source = b"def outer():\n    _private = 1\n    public = 2\n";
        let profile = python::profile();
        let findings = harvest_source(source, Path::new("a.py"), &profile).unwrap();
        let private = findings.definitions.iter().find(|d| d.name == "_private").unwrap();
        let public = findings.definitions.iter().find(|d| d.name == "public").unwrap();
        assert!(!private.exported);
        assert!(public.exported);
    }

    #[test]
    fn test_harvest_typescript_dynamic_dispatch_call() {
        let source = b"class A {\n  run() {\n    this.handler.process();\n  }\n}\n";
        let profile = typescript::ts_profile();
        let findings = harvest_source(source, Path::new("a.ts"), &profile).unwrap();
        let call = findings.calls.iter().find(|c| c.callee_name == "process").unwrap();
        assert_eq!(call.ref_type, RefType::DynamicDispatch);
        assert_eq!(call.receiver_name.as_deref(), Some("this.handler"));
    }

    #[test]
    fn test_harvest_assigns_method_kind_and_receiver_type() {
        let source = b"class Foo {\n  bar() {}\n}\n";
        let profile = typescript::ts_profile();
        let findings = harvest_source(source, Path::new("a.ts"), &profile).unwrap();
        let method = findings.definitions.iter().find(|d| d.name == "bar").unwrap();
        assert_eq!(method.kind, DefinitionKind::Method);
        assert_eq!(method.receiver_type.as_deref(), Some("Foo"));
    }
}
