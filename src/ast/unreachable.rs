//! Unreachable-block detection (§4.2): a run of statements following an
//! unconditional terminator within the same block.
//!
//! Called once per `block_kinds` node encountered by the generic walker, so
//! nested blocks (inside `if`/`for`/etc.) are covered by the walker visiting
//! them separately rather than by recursing here.

use super::profile::LanguageProfile;
use crate::models::UnreachableBlock;
use std::path::Path;
use tree_sitter::Node;

const COMMENT_KINDS: &[&str] = &["comment", "line_comment", "block_comment"];

fn is_terminator(node: &Node, source: &[u8], profile: &LanguageProfile) -> bool {
    if profile.terminator_kinds.contains(&node.kind()) {
        return true;
    }
    let Ok(text) = node.utf8_text(source) else {
        return false;
    };
    if profile.exit_sinks.iter().any(|sink| text.contains(sink)) {
        return true;
    }
    profile.terminator_macros.iter().any(|m| text.contains(m))
}

/// Scans the direct (named) children of a block for a terminator followed
/// by more statements. Returns at most one block: everything after the
/// first terminator in a single block forms one contiguous unreachable run.
pub fn detect_in_block(
    block: &Node,
    source: &[u8],
    file: &Path,
    profile: &LanguageProfile,
) -> Option<UnreachableBlock> {
    let mut cursor = block.walk();
    let mut seen_terminator = false;
    let mut terminator_line = 0u32;
    let mut start_line: Option<u32> = None;
    let mut end_line = 0u32;

    for child in block.named_children(&mut cursor) {
        if COMMENT_KINDS.contains(&child.kind()) {
            continue;
        }
        if seen_terminator {
            if start_line.is_none() {
                start_line = Some(child.start_position().row as u32 + 1);
            }
            end_line = child.end_position().row as u32 + 1;
            continue;
        }
        if is_terminator(&child, source, profile) {
            seen_terminator = true;
            terminator_line = child.end_position().row as u32 + 1;
        }
    }

    start_line.map(|start_line| UnreachableBlock {
        file: file.to_path_buf(),
        start_line,
        end_line,
        reason: format!("Code after terminating statement at line {}", terminator_line),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::go;
    use std::path::PathBuf;
    use tree_sitter::Parser;

    fn parse_block(source: &str) -> (tree_sitter::Tree, tree_sitter::Language) {
        let profile = go::profile();
        let lang = (profile.language)();
        let mut parser = Parser::new();
        parser.set_language(&lang).unwrap();
        let tree = parser.parse(source, None).unwrap();
        (tree, lang)
    }

    #[test]
    fn test_detects_code_after_return() {
        let source = "package main\nfunc f() {\n\treturn\n\tprint(\"dead\")\n}\n";
        let (tree, _lang) = parse_block(source);
        let profile = go::profile();
        let root = tree.root_node();
        let func = root.named_child(1).unwrap();
        let body = func.child_by_field_name("body").unwrap();
        let found = detect_in_block(&body, source.as_bytes(), &PathBuf::from("a.go"), &profile);
        assert!(found.is_some());
        let block = found.unwrap();
        assert_eq!(block.start_line, 4);
    }

    #[test]
    fn test_no_unreachable_without_terminator() {
        let source = "package main\nfunc f() {\n\tprint(\"live\")\n}\n";
        let (tree, _lang) = parse_block(source);
        let profile = go::profile();
        let root = tree.root_node();
        let func = root.named_child(1).unwrap();
        let body = func.child_by_field_name("body").unwrap();
        let found = detect_in_block(&body, source.as_bytes(), &PathBuf::from("a.go"), &profile);
        assert!(found.is_none());
    }
}
