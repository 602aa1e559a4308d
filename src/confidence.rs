//! Confidence scoring for Phase 4 classification (§4.7).

use crate::config::CoverageData;
use crate::models::{Definition, Visibility};

/// Graph mode: start at 0.95, adjust for exported/private/test/FFI/coverage,
/// clamp to [0, 1].
pub fn graph_mode_confidence(def: &Definition, coverage: Option<&dyn CoverageData>) -> f64 {
    let mut score = 0.95;
    if def.exported {
        score -= 0.25;
    }
    if def.visibility == Visibility::Private {
        score += 0.03;
    }
    if def.is_test_file {
        score -= 0.15;
    }
    if def.is_ffi {
        score -= 0.30;
    }
    if let Some(coverage) = coverage {
        if coverage.is_line_covered(&def.file, def.line) {
            score -= 0.40;
        } else {
            score += 0.05;
        }
    }
    score.clamp(0.0, 1.0)
}

/// Fallback mode (call-graph disabled): start at 0.90, same adjustments
/// with different magnitudes (§4.7 — the asymmetry vs. graph mode is
/// intentional, see SPEC_FULL.md §9).
pub fn fallback_mode_confidence(def: &Definition) -> f64 {
    let mut score = 0.90;
    if def.exported {
        score -= 0.30;
    }
    if def.visibility == Visibility::Private {
        score += 0.05;
    }
    if def.is_test_file {
        score -= 0.15;
    }
    if def.is_ffi {
        score -= 0.25;
    }
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DefinitionKind;
    use std::path::PathBuf;

    fn def() -> Definition {
        Definition::new(
            "unused",
            DefinitionKind::Function,
            PathBuf::from("a.go"),
            3,
            3,
            Visibility::Private,
            false,
        )
    }

    #[test]
    fn test_graph_mode_private_unexported() {
        let d = def();
        let score = graph_mode_confidence(&d, None);
        assert!((score - 0.98).abs() < 1e-9);
    }

    #[test]
    fn test_graph_mode_test_file_penalty() {
        let mut d = def();
        d.is_test_file = true;
        let score = graph_mode_confidence(&d, None);
        assert!((score - 0.83).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_mode_exported_penalty() {
        let mut d = def();
        d.exported = true;
        let score = fallback_mode_confidence(&d);
        assert!((score - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_always_clamped() {
        let mut d = def();
        d.is_ffi = true;
        d.is_test_file = true;
        d.exported = true;
        let score = graph_mode_confidence(&d, None);
        assert!((0.0..=1.0).contains(&score));
    }
}
