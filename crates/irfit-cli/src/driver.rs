//! One matching run: discover inputs, build the IR pool, parse source
//! models, match, write the report.

use crate::args::CliArgs;
use crate::config::{MatchConfig, load_config, resolve_options};
use anyhow::{Context, Result, bail};
use irfit_ir::load_pool;
use irfit_matcher::{FactsReader, MatchReport, MatchSession, MatchStats};
use irfit_source::FrontendRegistry;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const IR_MODEL_SUFFIX: &str = ".ir.json";

/// An input file and the path it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub display: String,
}

#[derive(Debug)]
pub struct RunSummary {
    pub ir_files: usize,
    pub source_files: usize,
    pub report: MatchReport,
    pub stats: MatchStats,
}

/// Expand `roots` into input files. Files are taken as given; directories
/// are walked and filtered by `accept` on the file name. Files found under
/// a directory are reported relative to it.
pub fn discover(roots: &[PathBuf], accept: impl Fn(&str) -> bool) -> Result<Vec<InputFile>> {
    let mut inputs = Vec::new();
    for root in roots {
        if root.is_file() {
            inputs.push(InputFile {
                path: root.clone(),
                display: display_path(root),
            });
            continue;
        }
        if !root.is_dir() {
            bail!("input path {} does not exist", root.display());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !accept(&name) {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            found.push(InputFile {
                path: path.to_path_buf(),
                display: display_path(relative),
            });
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %root.display(), files = found.len(), "walked input directory");
        inputs.extend(found);
    }
    Ok(inputs)
}

fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[tracing::instrument(level = "info", skip_all)]
pub fn run(args: &CliArgs) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let options = resolve_options(config.as_ref(), args);
    tracing::debug!(?options, "resolved options");

    let ir_inputs = discover(&args.ir, |name| name.ends_with(IR_MODEL_SUFFIX))?;
    if ir_inputs.is_empty() {
        bail!("no IR model files ({IR_MODEL_SUFFIX}) found");
    }
    let ir_paths: Vec<PathBuf> = ir_inputs.iter().map(|input| input.path.clone()).collect();
    let build = load_pool(&ir_paths).context("failed to load IR models")?;

    let registry = FrontendRegistry::new();
    let source_inputs = discover(&args.sources, |name| registry.supports(name))?;
    if source_inputs.is_empty() {
        bail!("no source model files found");
    }

    let mut session = MatchSession::new(&build.pool, options);
    session.add_diagnostics(build.diagnostics);
    for input in &source_inputs {
        let file = registry
            .parse_file(&input.path, &input.display)
            .with_context(|| format!("failed to read source model {}", input.path.display()))?;
        session.add_file(file);
    }

    if let Some(dir) = facts_dir(args, config.as_ref()) {
        let facts = FactsReader::new(dir)
            .read()
            .context("failed to read fact relations")?;
        tracing::info!(relations = facts.len(), "loaded facts");
        session.set_facts(facts);
    }

    let result = session.run();
    Ok(RunSummary {
        ir_files: ir_inputs.len(),
        source_files: source_inputs.len(),
        report: result.report,
        stats: result.stats,
    })
}

fn facts_dir(args: &CliArgs, config: Option<&MatchConfig>) -> Option<PathBuf> {
    args.facts
        .clone()
        .or_else(|| config.and_then(|config| config.facts.clone()))
}

/// Pretty JSON to `out`, or stdout when no path is given.
pub fn write_report(report: &MatchReport, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, json + "\n")
                .with_context(|| format!("failed to write report {}", path.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}
