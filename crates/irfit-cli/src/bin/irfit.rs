#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use irfit_cli::args::CliArgs;
use irfit_cli::driver;
use irfit_cli::reporter::Reporter;

fn main() -> Result<()> {
    // IRFIT_LOG / RUST_LOG enable tracing; IRFIT_LOG_FORMAT=tree|json|text.
    irfit_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let reporter = Reporter::new(!args.no_color && std::io::stderr().is_terminal());

    let summary = match driver::run(&args) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("irfit: {err:#}");
            std::process::exit(1);
        }
    };
    if let Err(err) = driver::write_report(&summary.report, args.out.as_deref()) {
        eprintln!("irfit: {err:#}");
        std::process::exit(1);
    }

    if !summary.report.diagnostics.is_empty() {
        eprintln!("{}", reporter.render(&summary.report.diagnostics));
    }
    if args.stats {
        eprintln!("{}", reporter.format_stats(&summary.stats));
    }
    eprintln!(
        "{} ({} IR files, {} source files)",
        reporter.format_summary(&summary.report),
        summary.ir_files,
        summary.source_files
    );
    Ok(())
}
