//! Engine configuration.
//!
//! Mirrors the knobs exposed in the EXTERNAL INTERFACES section: confidence
//! threshold, graph-mode toggle, bitmap capacity presets, file size limit,
//! optional coverage data, and the global confidence-level thresholds.

use serde::{Deserialize, Serialize};
use std::sync::{OnceLock, RwLock};

/// Initial bitmap capacity preset for small/medium repositories.
pub const DEFAULT_CAPACITY: u32 = 100_000;
/// Preset recommended for large projects (§6).
pub const LARGE_PROJECT_CAPACITY: u32 = 1_000_000;

/// `High`/`Medium`/`Low` confidence-level cut points. Process-wide state
/// with a thread-safe getter/setter per §9 ("Cross-component state"), but
/// callers should prefer passing a `ConfidenceThresholds` value into each
/// `Analyze` call — the global is for parity with the spec's description,
/// not the primary plumbing path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.8,
            medium: 0.5,
        }
    }
}

impl ConfidenceThresholds {
    pub fn level(&self, confidence: f64) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

static GLOBAL_THRESHOLDS: OnceLock<RwLock<ConfidenceThresholds>> = OnceLock::new();

fn global_lock() -> &'static RwLock<ConfidenceThresholds> {
    GLOBAL_THRESHOLDS.get_or_init(|| RwLock::new(ConfidenceThresholds::default()))
}

/// Set the process-wide confidence thresholds. Intended to be called once
/// at startup.
pub fn set_global_confidence_thresholds(thresholds: ConfidenceThresholds) {
    *global_lock().write().expect("thresholds lock poisoned") = thresholds;
}

pub fn global_confidence_thresholds() -> ConfidenceThresholds {
    *global_lock().read().expect("thresholds lock poisoned")
}

/// Optional coverage data source (§6 `CoverageData`).
pub trait CoverageData: Send + Sync {
    fn is_line_covered(&self, file: &std::path::Path, line: u32) -> bool;
    fn get_execution_count(&self, file: &std::path::Path, line: u32) -> i64;
}

/// Top-level engine configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Minimum confidence for a classification to be reported as dead.
    pub confidence_threshold: f64,
    /// When false, skip phases 1-3 and use the fallback usage-set heuristic.
    pub build_graph: bool,
    /// Initial `HierarchicalBitSet` capacity hint.
    pub capacity: u32,
    /// 0 = unlimited.
    pub max_file_size: i64,
    pub confidence_thresholds: ConfidenceThresholds,

    #[serde(skip)]
    pub coverage: Option<std::sync::Arc<dyn CoverageData>>,
}

impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("confidence_threshold", &self.confidence_threshold)
            .field("build_graph", &self.build_graph)
            .field("capacity", &self.capacity)
            .field("max_file_size", &self.max_file_size)
            .field("confidence_thresholds", &self.confidence_thresholds)
            .field("coverage", &self.coverage.is_some())
            .finish()
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
            build_graph: true,
            capacity: DEFAULT_CAPACITY,
            max_file_size: 0,
            confidence_thresholds: ConfidenceThresholds::default(),
            coverage: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn with_build_graph(mut self, build_graph: bool) -> Self {
        self.build_graph = build_graph;
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn large_project(mut self) -> Self {
        self.capacity = LARGE_PROJECT_CAPACITY;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: i64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn with_coverage(mut self, coverage: std::sync::Arc<dyn CoverageData>) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Load overrides from a TOML config file, layering them onto the
    /// defaults. Unset fields keep their default value.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        #[derive(Deserialize, Default)]
        struct Overrides {
            confidence_threshold: Option<f64>,
            build_graph: Option<bool>,
            capacity: Option<u32>,
            max_file_size: Option<i64>,
        }

        let overrides: Overrides = toml::from_str(s)?;
        let mut config = Self::default();
        if let Some(v) = overrides.confidence_threshold {
            config.confidence_threshold = v;
        }
        if let Some(v) = overrides.build_graph {
            config.build_graph = v;
        }
        if let Some(v) = overrides.capacity {
            config.capacity = v;
        }
        if let Some(v) = overrides.max_file_size {
            config.max_file_size = v;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = ConfidenceThresholds::default();
        assert_eq!(t.level(0.9), ConfidenceLevel::High);
        assert_eq!(t.level(0.6), ConfidenceLevel::Medium);
        assert_eq!(t.level(0.3), ConfidenceLevel::Low);
        assert_eq!(t.level(0.8), ConfidenceLevel::High);
        assert_eq!(t.level(0.5), ConfidenceLevel::Medium);
    }

    #[test]
    fn test_global_thresholds_roundtrip() {
        set_global_confidence_thresholds(ConfidenceThresholds {
            high: 0.9,
            medium: 0.4,
        });
        let t = global_confidence_thresholds();
        assert_eq!(t.high, 0.9);
        assert_eq!(t.medium, 0.4);
        // restore defaults so other tests in this process aren't affected
        set_global_confidence_thresholds(ConfidenceThresholds::default());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalyzerConfig::new()
            .with_confidence_threshold(0.75)
            .with_build_graph(false)
            .large_project();
        assert_eq!(config.confidence_threshold, 0.75);
        assert!(!config.build_graph);
        assert_eq!(config.capacity, LARGE_PROJECT_CAPACITY);
    }

    #[test]
    fn test_config_from_toml() {
        let config = AnalyzerConfig::from_toml_str("confidence_threshold = 0.6\nbuild_graph = false\n")
            .unwrap();
        assert_eq!(config.confidence_threshold, 0.6);
        assert!(!config.build_graph);
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
    }
}
