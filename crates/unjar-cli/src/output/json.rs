//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::cell::RefCell;
use std::io::Write;
use std::io::{self};
use unjar_core::BatchReport;
use unjar_core::ItemOutcome;

/// Emits exactly one JSON document per run.
///
/// Warnings raised before the batch finishes are held back and reported
/// inside the final document.
#[derive(Default)]
pub struct JsonFormatter {
    warnings: RefCell<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    items: Vec<ItemOutput>,
    succeeded: usize,
    failed: usize,
    duration_ms: u128,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ItemOutput {
    index: usize,
    url: String,
    target_dir: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    archive_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes_downloaded: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files_extracted: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    directories_created: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    symlinks_skipped: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes_written: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u128>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ItemOutput {
    fn from_outcome(outcome: &ItemOutcome) -> Self {
        let mut output = Self {
            index: outcome.index,
            url: outcome.item.source_url.clone(),
            target_dir: outcome.item.target_dir().display().to_string(),
            status: "success",
            archive_path: None,
            bytes_downloaded: None,
            files_extracted: None,
            directories_created: None,
            symlinks_skipped: None,
            bytes_written: None,
            duration_ms: None,
            warnings: Vec::new(),
            error: None,
        };

        match &outcome.result {
            Ok(report) => {
                output.archive_path = Some(report.archive_path.display().to_string());
                output.bytes_downloaded = Some(report.bytes_downloaded);
                output.files_extracted = Some(report.extraction.files_extracted);
                output.directories_created = Some(report.extraction.directories_created);
                output.symlinks_skipped = Some(report.extraction.symlinks_skipped);
                output.bytes_written = Some(report.extraction.bytes_written);
                output.duration_ms = Some(report.duration.as_millis());
                output.warnings.clone_from(&report.warnings);
            }
            Err(err) => {
                output.status = "error";
                output.error = Some(err.to_string());
            }
        }

        output
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_batch_report(&self, report: &BatchReport) -> Result<()> {
        let data = BatchOutput {
            items: report.outcomes.iter().map(ItemOutput::from_outcome).collect(),
            succeeded: report.succeeded(),
            failed: report.failed(),
            duration_ms: report.duration.as_millis(),
            warnings: self.warnings.take(),
        };

        if report.is_success() {
            Self::output(&JsonOutput::success("fetch", data))
        } else {
            let error = format!("{} of {} archives failed", report.failed(), report.len());
            Self::output(&JsonOutput::failure("fetch", data, error))
        }
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("fetch", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use unjar_core::ItemReport;
    use unjar_core::UnjarError;
    use unjar_core::WorkItem;

    #[test]
    fn test_item_output_success() {
        let mut report = ItemReport::new(PathBuf::from("/data/app"));
        report.extraction.files_extracted = 3;
        report.add_warning("could not clear /data/app".to_string());

        let outcome = ItemOutcome {
            index: 0,
            item: WorkItem::new("/data", "app", "http://example.com/x.jar"),
            result: Ok(report),
        };

        let json = serde_json::to_value(ItemOutput::from_outcome(&outcome)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["files_extracted"], 3);
        assert_eq!(json["warnings"][0], "could not clear /data/app");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_item_output_error() {
        let outcome = ItemOutcome {
            index: 1,
            item: WorkItem::new("/data", "app", "http://example.com/x.jar"),
            result: Err(UnjarError::HttpStatus {
                url: "http://example.com/x.jar".to_string(),
                status: 500,
            }),
        };

        let json = serde_json::to_value(ItemOutput::from_outcome(&outcome)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["index"], 1);
        assert!(json["error"].as_str().unwrap().contains("HTTP 500"));
        assert!(json.get("files_extracted").is_none());
    }

    #[test]
    fn test_warnings_are_held_for_the_report() {
        let formatter = JsonFormatter::default();
        formatter.format_warning("descriptor missing");
        assert_eq!(formatter.warnings.borrow().len(), 1);
    }
}
