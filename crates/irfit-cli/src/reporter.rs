use colored::Colorize;
use irfit_common::{DiagnosticCategory, MatchDiagnostic};
use irfit_matcher::{MatchReport, MatchStats};

/// Renders match diagnostics and run summaries for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[MatchDiagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    /// `file:line - category kind: message`
    pub fn format_diagnostic(&self, diagnostic: &MatchDiagnostic) -> String {
        let mut output = String::new();
        if diagnostic.file.is_empty() {
            output.push_str("<unknown>");
        } else {
            output.push_str(&self.format_location(&diagnostic.file, diagnostic.line));
        }
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_kind(&diagnostic.kind.to_string()));
        output.push_str(": ");
        output.push_str(&diagnostic.message);
        output
    }

    pub fn format_summary(&self, report: &MatchReport) -> String {
        let unmatched = format!("{} unmatched", report.unmatched);
        let unmatched = if self.color && report.unmatched > 0 {
            unmatched.yellow().bold().to_string()
        } else {
            unmatched
        };
        format!(
            "{} IR ids, {} source elements matched, {}, {} diagnostics",
            report.entries.len(),
            report.element_count(),
            unmatched,
            report.diagnostics.len()
        )
    }

    pub fn format_stats(&self, stats: &MatchStats) -> String {
        let table = stats.render();
        if self.color {
            table.cyan().to_string()
        } else {
            table
        }
    }

    fn format_location(&self, file: &str, line: Option<u32>) -> String {
        let location = match line {
            Some(line) => format!("{file}:{line}"),
            None => file.to_string(),
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_kind(&self, kind: &str) -> String {
        if self.color {
            kind.bright_blue().to_string()
        } else {
            kind.to_string()
        }
    }
}
