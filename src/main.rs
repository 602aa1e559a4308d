#![cfg_attr(not(test), deny(clippy::unwrap_used))]

//! deadwood - multi-language dead-code detection CLI
//!
//! Walks a set of source files, builds a reference graph across ten
//! languages, and reports functions, classes, and variables that no
//! reachable code calls.

use anyhow::{Context, Result};
use clap::Parser;
use deadwood::{analyze, AnalyzerConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "deadwood", version, about = "Multi-language dead-code detection engine")]
struct Cli {
    /// Source files to analyze.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Minimum confidence (0.0-1.0) for a finding to be reported.
    #[arg(long, default_value_t = 0.8)]
    confidence_threshold: f64,

    /// Disable reference-graph construction and use the cheaper
    /// usage-set fallback heuristic instead.
    #[arg(long)]
    no_graph: bool,

    /// Use the bitmap capacity preset recommended for large projects.
    #[arg(long)]
    large_project: bool,

    /// Skip files larger than this many bytes (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    max_file_size: i64,

    /// Path to a TOML config file; CLI flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit findings as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            AnalyzerConfig::from_toml_str(&text).context("parsing config file")?
        }
        None => AnalyzerConfig::new(),
    };
    config = config.with_confidence_threshold(cli.confidence_threshold);
    config = config.with_build_graph(!cli.no_graph);
    config = config.with_max_file_size(cli.max_file_size);
    if cli.large_project {
        config = config.large_project();
    }

    let (analysis, errors) = analyze(&config, cli.files);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&JsonReport::from(&analysis))?);
    } else {
        print_report(&analysis);
    }

    if let Some(errors) = errors {
        for error in &errors {
            tracing::warn!(file = %error.path.display(), error = %error.kind, "file processing error");
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct JsonReport {
    files_analyzed: usize,
    graph_mode: bool,
    dead_functions: Vec<JsonDead>,
    dead_classes: Vec<JsonDead>,
    dead_variables: Vec<JsonDead>,
    unreachable_blocks: usize,
}

#[derive(serde::Serialize)]
struct JsonDead {
    name: String,
    file: String,
    line: u32,
    end_line: u32,
    visibility: deadwood::Visibility,
    confidence: f64,
    confidence_level: deadwood::ConfidenceLevel,
    reason: String,
    node_id: u32,
}

impl From<&deadwood::Analysis> for JsonReport {
    fn from(analysis: &deadwood::Analysis) -> Self {
        Self {
            files_analyzed: analysis.summary.files_analyzed,
            graph_mode: analysis.summary.graph_mode,
            dead_functions: analysis
                .dead_functions
                .iter()
                .map(|f| JsonDead {
                    name: f.name.clone(),
                    file: f.file.display().to_string(),
                    line: f.line,
                    end_line: f.end_line,
                    visibility: f.visibility,
                    confidence: f.confidence,
                    confidence_level: f.confidence_level,
                    reason: f.reason.clone(),
                    node_id: f.node_id,
                })
                .collect(),
            dead_classes: analysis
                .dead_classes
                .iter()
                .map(|c| JsonDead {
                    name: c.name.clone(),
                    file: c.file.display().to_string(),
                    line: c.line,
                    end_line: c.end_line,
                    visibility: c.visibility,
                    confidence: c.confidence,
                    confidence_level: c.confidence_level,
                    reason: c.reason.clone(),
                    node_id: c.node_id,
                })
                .collect(),
            dead_variables: analysis
                .dead_variables
                .iter()
                .map(|v| JsonDead {
                    name: v.name.clone(),
                    file: v.file.display().to_string(),
                    line: v.line,
                    end_line: v.end_line,
                    visibility: v.visibility,
                    confidence: v.confidence,
                    confidence_level: v.confidence_level,
                    reason: v.reason.clone(),
                    node_id: v.node_id,
                })
                .collect(),
            unreachable_blocks: analysis.unreachable_blocks.len(),
        }
    }
}

fn print_report(analysis: &deadwood::Analysis) {
    println!(
        "analyzed {} files ({} mode)",
        analysis.summary.files_analyzed,
        if analysis.summary.graph_mode { "graph" } else { "fallback" }
    );
    for f in &analysis.dead_functions {
        println!(
            "{}:{}: dead {} `{}` (confidence {:.2}, {:?}) - {}",
            f.file.display(),
            f.line,
            if f.is_method { "method" } else { "function" },
            f.name,
            f.confidence,
            f.confidence_level,
            f.reason
        );
    }
    for c in &analysis.dead_classes {
        println!(
            "{}:{}: dead class `{}` (confidence {:.2}, {:?}) - {}",
            c.file.display(),
            c.line,
            c.name,
            c.confidence,
            c.confidence_level,
            c.reason
        );
    }
    for v in &analysis.dead_variables {
        println!(
            "{}:{}: dead variable `{}` (confidence {:.2}, {:?}) - {}",
            v.file.display(),
            v.line,
            v.name,
            v.confidence,
            v.confidence_level,
            v.reason
        );
    }
    for block in &analysis.unreachable_blocks {
        println!("{}:{}-{}: {}", block.file.display(), block.start_line, block.end_line, block.reason);
    }
}
