//! The four-phase pipeline (§4.1-§4.8): harvest every file, build the
//! reference graph, expand dynamic-dispatch edges, run BFS reachability
//! from the entry-point set, then classify and score what's left.
//! `analyze` is the top-level entry point other crates are expected to call.

use crate::ast::{self, FileFindings};
use crate::bitset::HierarchicalBitSet;
use crate::config::{AnalyzerConfig, ConfidenceLevel, CoverageData};
use crate::confidence;
use crate::entrypoints;
use crate::error::FileError;
use crate::graph::{ReferenceEdge, ReferenceGraph, ReferenceNode};
use crate::models::{
    CallReference, Definition, DefinitionKind, RefType, TypeImplementation, UnreachableBlock, Visibility,
};
use crate::processor;
use crate::vtable::{VTable, VTableResolver};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DeadFunction {
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    pub visibility: Visibility,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reason: String,
    pub node_id: u32,
    pub is_method: bool,
    pub receiver_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeadClass {
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    pub visibility: Visibility,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reason: String,
    pub node_id: u32,
}

#[derive(Debug, Clone)]
pub struct DeadVariable {
    pub name: String,
    pub file: PathBuf,
    pub line: u32,
    pub end_line: u32,
    pub visibility: Visibility,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub reason: String,
    pub node_id: u32,
}

/// Static aggregate confidence reported alongside a whole `Analysis` (§4.8).
const AGGREGATE_CONFIDENCE: f64 = 0.85;

#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub files_analyzed: usize,
    pub lines_analyzed: usize,
    pub definitions_found: usize,
    pub dead_functions: usize,
    pub dead_classes: usize,
    pub dead_variables: usize,
    pub unreachable_blocks: usize,
    pub unreachable_lines: usize,
    pub estimated_dead_lines: usize,
    pub dead_code_percentage: f64,
    pub total_nodes: usize,
    pub reachable_nodes: usize,
    pub unreachable_nodes: usize,
    pub dead_items_by_file: FxHashMap<PathBuf, usize>,
    pub aggregate_confidence: f64,
    pub graph_mode: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub dead_functions: Vec<DeadFunction>,
    pub dead_classes: Vec<DeadClass>,
    pub dead_variables: Vec<DeadVariable>,
    pub unreachable_blocks: Vec<UnreachableBlock>,
    pub summary: Summary,
}

/// For `Variable` definitions, keeps only the last assignment per name
/// within a file (later overwrites earlier); functions/classes pass
/// through untouched (§9 — resolved open question).
fn dedupe_variables(defs: Vec<Definition>) -> Vec<Definition> {
    let mut last_index: FxHashMap<String, usize> = FxHashMap::default();
    for (i, def) in defs.iter().enumerate() {
        if def.kind == DefinitionKind::Variable {
            last_index.insert(def.name.clone(), i);
        }
    }
    let kept: FxHashSet<usize> = last_index.into_values().collect();
    defs.into_iter()
        .enumerate()
        .filter(|(i, def)| def.kind != DefinitionKind::Variable || kept.contains(i))
        .map(|(_, def)| def)
        .collect()
}

pub fn analyze(config: &AnalyzerConfig, files: Vec<PathBuf>) -> (Analysis, Option<Vec<FileError>>) {
    let span = tracing::info_span!("analyze", file_count = files.len(), build_graph = config.build_graph);
    let _enter = span.enter();

    let ctx = processor::Context::new();
    tracing::info!("harvesting files");
    let findings: Vec<FileFindings> = if config.max_file_size > 0 {
        let limit = config.max_file_size as u64;
        processor::map_files_with_size_limit(&ctx, files, limit, |p| ast::harvest_file(p))
    } else {
        processor::map_files(&ctx, files, |p| ast::harvest_file(p))
    };
    let files_analyzed = findings.len();
    let lines_analyzed: usize = findings.iter().map(|f| f.line_count).sum();
    tracing::info!(files_analyzed, lines_analyzed, "harvest complete");

    let mut graph = ReferenceGraph::new();
    let mut name_to_id: FxHashMap<String, u32> = FxHashMap::default();
    let mut node_key: FxHashMap<(PathBuf, String), u32> = FxHashMap::default();
    let mut all_defs: Vec<Definition> = Vec::new();
    let mut vtable_builders: FxHashMap<String, VTable> = FxHashMap::default();
    let mut type_impls: Vec<TypeImplementation> = Vec::new();
    let mut unreachable_blocks: Vec<UnreachableBlock> = Vec::new();
    let mut pending_calls: Vec<(PathBuf, CallReference)> = Vec::new();
    let mut global_usages: FxHashSet<String> = FxHashSet::default();
    let mut next_id: u32 = 0;

    for finding in findings {
        let path = finding.path.clone();
        global_usages.extend(finding.usages);

        for mut def in dedupe_variables(finding.definitions) {
            let id = next_id;
            next_id += 1;
            def.node_id = id;

            node_key.insert((def.file.clone(), def.name.clone()), id);
            // Last write wins on name collision, same as `all_defs` (§4.3).
            name_to_id.insert(def.name.clone(), id);

            if def.kind == DefinitionKind::Method {
                if let Some(receiver) = def.receiver_type.clone() {
                    vtable_builders
                        .entry(receiver.clone())
                        .or_insert_with(|| VTable::new(receiver))
                        .methods
                        .insert(def.name.clone(), id);
                }
            }

            let is_entry = entrypoints::is_entry_point(&def);
            graph.add_node(ReferenceNode {
                id,
                name: def.name.clone(),
                file: def.file.clone(),
                line: def.line,
                end_line: def.end_line,
                kind: def.kind,
                is_exported: def.exported,
                is_entry,
            });
            all_defs.push(def);
        }

        unreachable_blocks.extend(finding.unreachable_blocks);
        type_impls.extend(finding.type_impls);
        for call in finding.calls {
            pending_calls.push((path.clone(), call));
        }
    }

    let mut vtable = VTableResolver::new();
    for vt in vtable_builders.into_values() {
        vtable.register_vtable(vt);
    }
    for impl_ in &type_impls {
        if let Some(interface) = &impl_.interface_name {
            vtable.register_implementation(interface, &impl_.type_name);
        }
    }

    let total_nodes = graph.node_count();
    let (dead_functions, dead_classes, dead_variables, reachable_nodes) = if config.build_graph {
        build_reference_edges(&mut graph, &pending_calls, &node_key, &name_to_id);
        expand_dynamic_dispatch(&mut graph, &vtable);
        let reached = run_reachability(&graph, config.capacity);
        let reachable_nodes = reached.count_set();
        tracing::debug!(reachable_nodes, total_nodes, "reachability complete");
        let (dead_functions, dead_classes, dead_variables) = classify_graph_mode(all_defs, &reached, config);
        (dead_functions, dead_classes, dead_variables, reachable_nodes)
    } else {
        let (dead_functions, dead_classes, dead_variables) = classify_fallback_mode(all_defs, &global_usages, config);
        (dead_functions, dead_classes, dead_variables, 0)
    };
    let unreachable_nodes = total_nodes.saturating_sub(reachable_nodes);

    tracing::info!(
        dead_functions = dead_functions.len(),
        dead_classes = dead_classes.len(),
        dead_variables = dead_variables.len(),
        "classification complete"
    );

    let unreachable_lines: usize = unreachable_blocks
        .iter()
        .map(|b| (b.end_line - b.start_line + 1) as usize)
        .sum();
    let estimated_dead_lines =
        unreachable_lines + 10 * dead_functions.len() + 5 * dead_classes.len() + dead_variables.len();
    let dead_code_percentage = if lines_analyzed > 0 {
        estimated_dead_lines as f64 / lines_analyzed as f64 * 100.0
    } else if config.build_graph && total_nodes > 0 {
        unreachable_nodes as f64 / total_nodes as f64 * 100.0
    } else {
        0.0
    };

    let mut dead_items_by_file: FxHashMap<PathBuf, usize> = FxHashMap::default();
    for f in &dead_functions {
        *dead_items_by_file.entry(f.file.clone()).or_insert(0) += 1;
    }
    for c in &dead_classes {
        *dead_items_by_file.entry(c.file.clone()).or_insert(0) += 1;
    }
    for v in &dead_variables {
        *dead_items_by_file.entry(v.file.clone()).or_insert(0) += 1;
    }

    let summary = Summary {
        files_analyzed,
        lines_analyzed,
        definitions_found: dead_functions.len() + dead_classes.len() + dead_variables.len(),
        dead_functions: dead_functions.len(),
        dead_classes: dead_classes.len(),
        dead_variables: dead_variables.len(),
        unreachable_blocks: unreachable_blocks.len(),
        unreachable_lines,
        estimated_dead_lines,
        dead_code_percentage,
        total_nodes,
        reachable_nodes,
        unreachable_nodes,
        dead_items_by_file,
        aggregate_confidence: AGGREGATE_CONFIDENCE,
        graph_mode: config.build_graph,
    };

    let analysis = Analysis {
        dead_functions,
        dead_classes,
        dead_variables,
        unreachable_blocks,
        summary,
    };

    let errors = std::sync::Arc::try_unwrap(ctx.errors)
        .ok()
        .and_then(|log| log.into_option());
    (analysis, errors)
}

/// Phase 1 (§4.4): one edge per call reference whose caller and callee both
/// resolve. Callee resolution uses the same last-write-wins name map as
/// `all_defs`, so a dynamic-dispatch call to a name implemented by several
/// types lands on exactly one of them here; Phase 2 widens that.
fn build_reference_edges(
    graph: &mut ReferenceGraph,
    pending_calls: &[(PathBuf, CallReference)],
    node_key: &FxHashMap<(PathBuf, String), u32>,
    name_to_id: &FxHashMap<String, u32>,
) {
    for (path, call) in pending_calls {
        let Some(&caller_id) = node_key.get(&(path.clone(), call.caller_name.clone())) else {
            continue;
        };
        let Some(&callee_id) = name_to_id.get(&call.callee_name) else {
            continue;
        };
        if callee_id == caller_id {
            continue;
        }
        graph.add_edge(ReferenceEdge {
            from_id: caller_id,
            to_id: callee_id,
            ref_type: call.ref_type,
            confidence: 0.95,
        });
    }
}

/// Phase 2 (§4.5): for every dynamic-dispatch edge from Phase 1, resolve the
/// callee's name across every registered vtable and add a lower-confidence
/// `indirect_call` edge to each concrete implementation Phase 1 missed.
fn expand_dynamic_dispatch(graph: &mut ReferenceGraph, vtable: &VTableResolver) {
    let dispatch_edges: Vec<(u32, u32)> = graph
        .edges()
        .iter()
        .filter(|e| e.ref_type == RefType::DynamicDispatch)
        .map(|e| (e.from_id, e.to_id))
        .collect();

    for (from_id, to_id) in dispatch_edges {
        let Some(name) = graph.node(to_id).map(|n| n.name.clone()) else {
            continue;
        };
        for target_id in vtable.resolve("", &name) {
            if target_id == to_id || target_id == from_id {
                continue;
            }
            graph.add_edge(ReferenceEdge {
                from_id,
                to_id: target_id,
                ref_type: RefType::IndirectCall,
                confidence: 0.7,
            });
        }
    }
}

fn run_reachability(graph: &ReferenceGraph, capacity: u32) -> HierarchicalBitSet {
    let reached = HierarchicalBitSet::with_capacity(capacity);

    let entry_ids: Vec<u32> = graph.nodes().filter(|n| n.is_entry).map(|n| n.id).collect();
    reached.set_batch(entry_ids.iter().copied());
    let mut queue: VecDeque<u32> = entry_ids.into_iter().collect();

    while let Some(id) = queue.pop_front() {
        for edge in graph.outgoing(id) {
            if !reached.is_set(edge.to_id) {
                reached.set(edge.to_id);
                queue.push_back(edge.to_id);
            }
        }
    }
    reached
}

fn classify_graph_mode(
    defs: Vec<Definition>,
    reached: &HierarchicalBitSet,
    config: &AnalyzerConfig,
) -> (Vec<DeadFunction>, Vec<DeadClass>, Vec<DeadVariable>) {
    let mut dead_functions = Vec::new();
    let mut dead_classes = Vec::new();
    let mut dead_variables = Vec::new();

    for def in defs {
        if reached.is_set(def.node_id) {
            continue;
        }
        let coverage: Option<&dyn CoverageData> = config.coverage.as_deref();
        let confidence = confidence::graph_mode_confidence(&def, coverage);
        if confidence < config.confidence_threshold {
            continue;
        }
        push_classified(def, confidence, true, config, &mut dead_functions, &mut dead_classes, &mut dead_variables);
    }

    (dead_functions, dead_classes, dead_variables)
}

fn classify_fallback_mode(
    defs: Vec<Definition>,
    usages: &FxHashSet<String>,
    config: &AnalyzerConfig,
) -> (Vec<DeadFunction>, Vec<DeadClass>, Vec<DeadVariable>) {
    let mut dead_functions = Vec::new();
    let mut dead_classes = Vec::new();
    let mut dead_variables = Vec::new();

    for def in defs {
        if entrypoints::is_entry_point(&def) || usages.contains(&def.name) {
            continue;
        }
        let confidence = confidence::fallback_mode_confidence(&def);
        if confidence < config.confidence_threshold {
            continue;
        }
        push_classified(def, confidence, false, config, &mut dead_functions, &mut dead_classes, &mut dead_variables);
    }

    (dead_functions, dead_classes, dead_variables)
}

/// Reason strings per kind/mode (§4.7).
fn reason_for(kind: DefinitionKind, graph_mode: bool) -> &'static str {
    match (kind, graph_mode) {
        (DefinitionKind::Function | DefinitionKind::Method, true) => "Not reachable from any entry point",
        (DefinitionKind::Class, true) => "Class never instantiated or referenced",
        (DefinitionKind::Variable, true) => "Variable never accessed",
        (DefinitionKind::Function | DefinitionKind::Method, false) => "No references found in codebase",
        (DefinitionKind::Class, false) => "Class never used",
        (DefinitionKind::Variable, false) => "Variable never used",
    }
}

#[allow(clippy::too_many_arguments)]
fn push_classified(
    def: Definition,
    confidence: f64,
    graph_mode: bool,
    config: &AnalyzerConfig,
    dead_functions: &mut Vec<DeadFunction>,
    dead_classes: &mut Vec<DeadClass>,
    dead_variables: &mut Vec<DeadVariable>,
) {
    let confidence_level = config.confidence_thresholds.level(confidence);
    let reason = reason_for(def.kind, graph_mode).to_string();

    match def.kind {
        DefinitionKind::Function | DefinitionKind::Method => dead_functions.push(DeadFunction {
            name: def.name,
            file: def.file,
            line: def.line,
            end_line: def.end_line,
            visibility: def.visibility,
            confidence,
            confidence_level,
            reason,
            node_id: def.node_id,
            is_method: def.kind == DefinitionKind::Method,
            receiver_type: def.receiver_type,
        }),
        DefinitionKind::Class => dead_classes.push(DeadClass {
            name: def.name,
            file: def.file,
            line: def.line,
            end_line: def.end_line,
            visibility: def.visibility,
            confidence,
            confidence_level,
            reason,
            node_id: def.node_id,
        }),
        DefinitionKind::Variable => dead_variables.push(DeadVariable {
            name: def.name,
            file: def.file,
            line: def.line,
            end_line: def.end_line,
            visibility: def.visibility,
            confidence,
            confidence_level,
            reason,
            node_id: def.node_id,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_analyze_graph_mode_finds_unused_private_function() {
        let dir = TempDir::new().unwrap();
        let source = "package main\n\nfunc unused() {}\n\nfunc main() {}\n";
        let path = write_file(&dir, "main.go", source);

        let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
        let (analysis, errors) = analyze(&config, vec![path]);

        assert!(errors.is_none());
        assert!(analysis.dead_functions.iter().any(|f| f.name == "unused"));
        assert!(!analysis.dead_functions.iter().any(|f| f.name == "main"));
    }

    #[test]
    fn test_analyze_graph_mode_marks_called_function_alive() {
        let dir = TempDir::new().unwrap();
        let source = "package main\n\nfunc helper() {}\n\nfunc main() {\n\thelper()\n}\n";
        let path = write_file(&dir, "main.go", source);

        let config = AnalyzerConfig::new().with_confidence_threshold(0.0);
        let (analysis, _errors) = analyze(&config, vec![path]);

        assert!(!analysis.dead_functions.iter().any(|f| f.name == "helper"));
    }

    #[test]
    fn test_analyze_detects_unreachable_code() {
        let dir = TempDir::new().unwrap();
        let source = "package main\n\nfunc f() {\n\treturn\n\tprint(\"dead\")\n}\n\nfunc main() {}\n";
        let path = write_file(&dir, "main.go", source);

        let config = AnalyzerConfig::new();
        let (analysis, _errors) = analyze(&config, vec![path]);
        assert_eq!(analysis.unreachable_blocks.len(), 1);
    }

    #[test]
    fn test_analyze_fallback_mode_without_graph() {
        let dir = TempDir::new().unwrap();
        let source = "package main\n\nfunc unused() {}\n\nfunc main() {}\n";
        let path = write_file(&dir, "main.go", source);

        let config = AnalyzerConfig::new().with_build_graph(false).with_confidence_threshold(0.0);
        let (analysis, _errors) = analyze(&config, vec![path]);
        assert!(!analysis.summary.graph_mode);
        assert!(analysis.dead_functions.iter().any(|f| f.name == "unused"));
    }

    #[test]
    fn test_analyze_records_parse_errors_for_unreadable_files() {
        let config = AnalyzerConfig::new();
        let (_analysis, errors) = analyze(&config, vec![PathBuf::from("/nonexistent/path/file.go")]);
        assert!(errors.is_some());
    }
}
