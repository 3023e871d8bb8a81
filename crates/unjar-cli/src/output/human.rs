//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::convert_item_error;
use anyhow::Result;
use console::Term;
use console::style;
use unjar_core::BatchReport;
use unjar_core::ItemOutcome;
use unjar_core::ItemReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_success(&self, outcome: &ItemOutcome, report: &ItemReport) {
        let headline = format!(
            "{} -> {}",
            outcome.item.source_url,
            report.target_dir.display()
        );
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(&format!("OK: {headline}"));
        }

        let extraction = &report.extraction;
        let _ = self.term.write_line(&format!(
            "  Files extracted: {} ({})",
            Self::format_number(extraction.files_extracted),
            Self::format_size(extraction.bytes_written)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Archive: {} ({})",
                report.archive_path.display(),
                Self::format_size(report.bytes_downloaded)
            ));
            let _ = self.term.write_line(&format!(
                "  Directories: {}",
                Self::format_number(extraction.directories_created)
            ));
            let _ = self
                .term
                .write_line(&format!("  Symlinks skipped: {}", extraction.symlinks_skipped));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }

        for warning in &report.warnings {
            self.format_warning(warning);
        }
    }

    fn write_failure(&self, outcome: &ItemOutcome, error: &anyhow::Error) {
        let headline = format!(
            "{} -> {}",
            outcome.item.source_url,
            outcome.item.target_dir().display()
        );
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✗").red().bold()));
        } else {
            let _ = self.term.write_line(&format!("FAILED: {headline}"));
        }

        for line in format!("{error:?}").lines() {
            let _ = self.term.write_line(&format!("  {line}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_batch_report(&self, report: &BatchReport) -> Result<()> {
        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(item_report) if !self.quiet => self.write_success(outcome, item_report),
                Ok(_) => {}
                // Failures are shown even in quiet mode
                Err(err) => self.write_failure(outcome, &convert_item_error(err, &outcome.item)),
            }
        }

        if self.quiet {
            return Ok(());
        }

        let summary = format!(
            "Fetched {} of {} archives in {:.1?}",
            Self::format_number(report.succeeded()),
            Self::format_number(report.len()),
            report.duration
        );
        if report.is_success() || !self.use_colors {
            let _ = self.term.write_line(&summary);
        } else {
            let _ = self
                .term
                .write_line(&format!("{}", style(summary).red().bold()));
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.err_term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
        assert_eq!(HumanFormatter::format_size(1536 * 1024), "1.5 MB");
    }

    #[test]
    fn test_format_size_gigabytes() {
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
        assert_eq!(HumanFormatter::format_size(u64::MAX), "17179869184.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
