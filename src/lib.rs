//! Multi-language dead-code detection engine.
//!
//! Four phases turn a list of source files into a scored list of dead
//! definitions: harvest each file's AST into a reference graph (`ast`,
//! `graph`), expand dynamic-dispatch edges (`vtable`), run reachability
//! from a set of entry points (`entrypoints`, `bitset`), then classify and
//! score what's left (`confidence`). `engine` wires the phases together;
//! `processor` is the concurrent file-processing substrate they run on.

pub mod ast;
pub mod bitset;
pub mod config;
pub mod confidence;
pub mod engine;
pub mod entrypoints;
pub mod error;
pub mod graph;
pub mod models;
pub mod processor;
pub mod vtable;

pub use config::{AnalyzerConfig, ConfidenceLevel};
pub use engine::{analyze, Analysis, Summary};
pub use error::{EngineError, FileError};
pub use models::Visibility;
