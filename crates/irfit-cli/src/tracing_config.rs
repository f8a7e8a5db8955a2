//! Tracing configuration for debugging a matching run.
//!
//! Supports three output formats controlled by `IRFIT_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, one level per
//!   file and type pass
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! IRFIT_LOG=debug IRFIT_LOG_FORMAT=tree irfit --ir build --source src
//! IRFIT_LOG=debug IRFIT_LOG_FORMAT=json irfit --ir build --source src
//! IRFIT_LOG="irfit_matcher::engine=trace" irfit --ir build --source src
//! ```
//!
//! The subscriber is only initialised when `IRFIT_LOG` (or `RUST_LOG`) is
//! set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read from the `IRFIT_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("IRFIT_LOG_FORMAT").unwrap_or_default())
    }
}

/// `IRFIT_LOG` takes precedence over `RUST_LOG`; both use the `RUST_LOG`
/// directive syntax.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("IRFIT_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber. All output goes to stderr so
/// it never mixes with a report written to stdout.
pub fn init_tracing() {
    let has_irfit_log = std::env::var("IRFIT_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_irfit_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
