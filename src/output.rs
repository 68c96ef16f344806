//! Verdict rendering for the CLI.

use clap::ValueEnum;
use console::style;

use crate::engine::{DeclarationVerdict, Outcome};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub struct Renderer {
    format: OutputFormat,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a lint report. Text mode prints warnings for `NotBaseline`
    /// and notes for `Unknown`; confirmed-Baseline declarations stay
    /// quiet. JSON mode emits every verdict.
    pub fn print_report(&self, verdicts: &[DeclarationVerdict]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(verdicts)?);
            }
            OutputFormat::Text => {
                for dv in verdicts {
                    match dv.verdict.outcome {
                        Outcome::NotBaseline => self.print_warning_line(dv),
                        Outcome::Unknown => self.print_note_line(dv),
                        Outcome::Baseline => {}
                    }
                }
                self.print_summary(verdicts);
            }
        }
        Ok(())
    }

    /// Render one verdict in full, for single-declaration checks.
    pub fn print_verdict(&self, dv: &DeclarationVerdict) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(dv)?);
            }
            OutputFormat::Text => {
                let outcome = match dv.verdict.outcome {
                    Outcome::Baseline => style("baseline").green().bold(),
                    Outcome::NotBaseline => style("not baseline").yellow().bold(),
                    Outcome::Unknown => style("unknown").dim().bold(),
                };
                println!("{}: {}", style(&dv.property).bold(), dv.value);
                println!("  Outcome: {}", outcome);
                println!("  Source:  {}", dv.verdict.source);
                println!("  Reason:  {}", dv.verdict.reason);
            }
        }
        Ok(())
    }

    fn print_warning_line(&self, dv: &DeclarationVerdict) {
        println!(
            "{} line {}: {}: {} is not Baseline [{}] {}",
            style("WARN").yellow().bold(),
            dv.line,
            dv.property,
            dv.value,
            dv.verdict.source,
            dv.verdict.reason
        );
    }

    fn print_note_line(&self, dv: &DeclarationVerdict) {
        println!(
            "{} line {}: {}: {} requires manual verification",
            style("NOTE").dim(),
            dv.line,
            dv.property,
            dv.value
        );
    }

    fn print_summary(&self, verdicts: &[DeclarationVerdict]) {
        let warnings = count_warnings(verdicts);
        let unknown = verdicts
            .iter()
            .filter(|v| v.verdict.outcome == Outcome::Unknown)
            .count();

        println!(
            "{} declarations checked, {} warnings, {} unknown",
            verdicts.len(),
            warnings,
            unknown
        );
    }
}

pub fn count_warnings(verdicts: &[DeclarationVerdict]) -> usize {
    verdicts
        .iter()
        .filter(|v| v.verdict.outcome == Outcome::NotBaseline)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Source, Verdict};

    fn verdict(outcome: Outcome) -> DeclarationVerdict {
        DeclarationVerdict {
            property: "display".to_string(),
            value: "grid".to_string(),
            line: 1,
            verdict: Verdict::new(outcome, "reason", Source::Catalog),
        }
    }

    #[test]
    fn test_count_warnings() {
        let verdicts = vec![
            verdict(Outcome::Baseline),
            verdict(Outcome::NotBaseline),
            verdict(Outcome::Unknown),
            verdict(Outcome::NotBaseline),
        ];

        assert_eq!(count_warnings(&verdicts), 2);
    }
}
