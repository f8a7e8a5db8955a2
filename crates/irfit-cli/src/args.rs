use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the irfit binary.
#[derive(Parser, Debug)]
#[command(
    name = "irfit",
    version,
    about = "Correlate source elements with the compiled IR elements they produced"
)]
pub struct CliArgs {
    // ==================== Inputs ====================
    /// IR model files (`*.ir.json`) or directories searched for them.
    #[arg(long = "ir", required = true, num_args = 1..)]
    pub ir: Vec<PathBuf>,

    /// Source model files or directories searched for supported files.
    #[arg(short = 's', long = "source", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Directory holding tab-separated fact relations.
    #[arg(long)]
    pub facts: Option<PathBuf>,

    /// JSON configuration file; command-line flags override it.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    // ==================== Output ====================
    /// Write the JSON report here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Print per-kind match statistics to stderr.
    #[arg(long)]
    pub stats: bool,

    /// Disable colored diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,

    // ==================== Matching ====================
    /// Pair allocations by line when group sizes disagree.
    #[arg(long)]
    pub lossy: bool,

    /// Skip the source/IR order check before positional pairing.
    #[arg(long = "no-ordering-check")]
    pub no_ordering_check: bool,

    /// Resolve the declaring method of every matched call.
    #[arg(long = "resolve-invocations")]
    pub resolve_invocations: bool,

    /// Report parameter types combining source and IR spellings.
    #[arg(long = "synthesize-types")]
    pub synthesize_types: bool,
}
