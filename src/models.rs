//! Core data model for the dead-code engine.
//!
//! These types flow from per-file AST harvesting (`ast`) through
//! aggregation and the four-phase pipeline (`engine`) to the final
//! `Analysis` value.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Function,
    Method,
    Class,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
    #[default]
    Unknown,
}

/// A symbol defined in source. See SPEC_FULL.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub kind: DefinitionKind,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    pub visibility: Visibility,
    pub exported: bool,
    pub is_ffi: bool,
    pub is_test_file: bool,
    pub receiver_type: Option<String>,
    pub context_hash: u64,
    /// Assigned during aggregation; 0 until then.
    #[serde(default)]
    pub node_id: u32,
}

impl Definition {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        kind: DefinitionKind,
        file: PathBuf,
        line: u32,
        end_line: u32,
        visibility: Visibility,
        exported: bool,
    ) -> Self {
        let name = name.into();
        let context_hash = context_hash(&name, &file, line, kind);
        Self {
            name,
            kind,
            file,
            line,
            end_line,
            visibility,
            exported,
            is_ffi: false,
            is_test_file: false,
            receiver_type: None,
            context_hash,
            node_id: 0,
        }
    }
}

/// 64-bit hash of `(name, file, line, kind)`, used for deduplication.
pub fn context_hash(name: &str, file: &std::path::Path, line: u32, kind: DefinitionKind) -> u64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    file.hash(&mut hasher);
    line.hash(&mut hasher);
    kind.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefType {
    DirectCall,
    IndirectCall,
    Import,
    Inheritance,
    TypeReference,
    DynamicDispatch,
}

/// `(caller_name, callee_name, line, ref_type, receiver_name?)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallReference {
    pub caller_name: String,
    pub callee_name: String,
    pub line: u32,
    pub ref_type: RefType,
    pub receiver_name: Option<String>,
}

/// `type implements interface` (Java/C#/TS) or `type has methods` (Go
/// receivers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeImplementation {
    pub type_name: String,
    pub interface_name: Option<String>,
    pub methods: Option<Vec<String>>,
}

/// A run of statements following an unconditional terminator in the same
/// block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreachableBlock {
    pub file: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_hash_stable_for_same_inputs() {
        let file = PathBuf::from("a.go");
        let h1 = context_hash("foo", &file, 3, DefinitionKind::Function);
        let h2 = context_hash("foo", &file, 3, DefinitionKind::Function);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_context_hash_differs_on_line() {
        let file = PathBuf::from("a.go");
        let h1 = context_hash("foo", &file, 3, DefinitionKind::Function);
        let h2 = context_hash("foo", &file, 4, DefinitionKind::Function);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_definition_new_defaults() {
        let def = Definition::new(
            "foo",
            DefinitionKind::Function,
            PathBuf::from("a.go"),
            1,
            3,
            Visibility::Public,
            true,
        );
        assert_eq!(def.node_id, 0);
        assert!(!def.is_ffi);
        assert!(def.receiver_type.is_none());
    }
}
