//! JSON configuration file.
//!
//! ```json
//! {
//!   "lossy": true,
//!   "verifyOrdering": false,
//!   "varargMethods": { "p.Log.log": [2] },
//!   "facts": "out/facts"
//! }
//! ```

use crate::args::CliArgs;
use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use irfit_matcher::MatchOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MatchConfig {
    #[serde(default)]
    pub lossy: Option<bool>,
    #[serde(default)]
    pub verify_ordering: Option<bool>,
    #[serde(default)]
    pub resolve_invocations: Option<bool>,
    #[serde(default)]
    pub synthesize_types: Option<bool>,
    /// `Type.name` → possible IR arities of a variable-arity method.
    #[serde(default)]
    pub vararg_methods: IndexMap<String, Vec<usize>>,
    /// Fact directory, relative to the config file.
    #[serde(default)]
    pub facts: Option<PathBuf>,
}

impl MatchConfig {
    /// Overwrite the options this config sets.
    pub fn apply(&self, options: &mut MatchOptions) {
        if let Some(lossy) = self.lossy {
            options.lossy = lossy;
        }
        if let Some(verify) = self.verify_ordering {
            options.verify_ordering = verify;
        }
        if let Some(resolve) = self.resolve_invocations {
            options.resolve_invocations = resolve;
        }
        if let Some(synthesize) = self.synthesize_types {
            options.synthesize_types = synthesize;
        }
        for (method, arities) in &self.vararg_methods {
            options
                .extra_vararg_methods
                .insert(method.clone(), arities.clone());
        }
    }
}

pub fn parse_config(source: &str) -> Result<MatchConfig> {
    let config: MatchConfig =
        serde_json::from_str(source).context("failed to parse irfit config")?;
    for (method, arities) in &config.vararg_methods {
        if !method.contains('.') {
            bail!("vararg method '{method}' must be written as Type.name");
        }
        if arities.is_empty() {
            bail!("vararg method '{method}' lists no arities");
        }
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<MatchConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let mut config =
        parse_config(&source).with_context(|| format!("in config {}", path.display()))?;
    if let Some(facts) = config.facts.take() {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.facts = Some(base.join(facts));
    }
    Ok(config)
}

/// Defaults, then the config file, then command-line flags.
pub fn resolve_options(config: Option<&MatchConfig>, args: &CliArgs) -> MatchOptions {
    let mut options = MatchOptions::default();
    if let Some(config) = config {
        config.apply(&mut options);
    }
    if args.lossy {
        options.lossy = true;
    }
    if args.no_ordering_check {
        options.verify_ordering = false;
    }
    if args.resolve_invocations {
        options.resolve_invocations = true;
    }
    if args.synthesize_types {
        options.synthesize_types = true;
    }
    options
}
