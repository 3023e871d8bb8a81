//! Progress bars for a running batch.

use std::path::Path;

use console::Term;
use indicatif::MultiProgress;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use unjar_core::ExtractionReport;
use unjar_core::ItemReport;
use unjar_core::ProgressCallback;
use unjar_core::UnjarError;
use unjar_core::WorkItem;

/// One progress bar per work item, implementing `ProgressCallback`.
///
/// A bar shows download bytes first, then switches to an entry counter once
/// extraction starts.
pub struct CliProgress {
    multi: MultiProgress,
    bars: Vec<ProgressBar>,
    download_style: ProgressStyle,
    extract_style: ProgressStyle,
}

impl CliProgress {
    /// Creates a bar for each item, labelled with its subdirectory.
    #[must_use]
    pub fn new(items: &[WorkItem]) -> Self {
        let multi = MultiProgress::new();

        // Template: "selenium [████████░░░░] 1.2 MiB/4.0 MiB downloading"
        let download_style = ProgressStyle::default_bar()
            .template("{prefix:>12.bold} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let extract_style = ProgressStyle::default_bar()
            .template("{prefix:>12.bold} [{bar:30.green/blue}] {pos}/{len} entries {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");

        let bars = items
            .iter()
            .map(|item| {
                let bar = multi.add(ProgressBar::new(0));
                bar.set_style(download_style.clone());
                bar.set_prefix(item.subdirectory.clone());
                bar.set_message("waiting");
                bar
            })
            .collect();

        Self {
            multi,
            bars,
            download_style,
            extract_style,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    /// Removes every bar from the terminal.
    pub fn finish(&self) {
        for bar in &self.bars {
            bar.finish_and_clear();
        }
        let _ = self.multi.clear();
    }

    fn bar(&self, index: usize) -> Option<&ProgressBar> {
        self.bars.get(index)
    }
}

impl ProgressCallback for CliProgress {
    fn on_item_start(&self, index: usize, _item: &WorkItem) {
        if let Some(bar) = self.bar(index) {
            bar.set_message("downloading");
        }
    }

    fn on_download_progress(&self, index: usize, downloaded: u64, total: Option<u64>) {
        if let Some(bar) = self.bar(index) {
            bar.set_length(total.unwrap_or(downloaded));
            bar.set_position(downloaded);
        }
    }

    fn on_entry_extracted(&self, index: usize, _path: &Path, current: usize, total: usize) {
        if let Some(bar) = self.bar(index) {
            if current == 1 {
                bar.set_style(self.extract_style.clone());
                bar.set_message("extracting");
            }
            bar.set_length(total as u64);
            bar.set_position(current as u64);
        }
    }

    fn on_extraction_error(&self, index: usize, _error: &UnjarError) {
        if let Some(bar) = self.bar(index) {
            bar.abandon_with_message("extraction failed");
        }
    }

    fn on_extraction_complete(&self, index: usize, report: &ExtractionReport) {
        if let Some(bar) = self.bar(index) {
            bar.set_message(format!("{} files", report.files_extracted));
        }
    }

    fn on_item_complete(&self, index: usize, result: &Result<ItemReport, UnjarError>) {
        if let Some(bar) = self.bar(index) {
            match result {
                Ok(_) => bar.finish_with_message("done"),
                Err(_) => {
                    bar.set_style(self.download_style.clone());
                    bar.abandon_with_message("failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<WorkItem> {
        vec![
            WorkItem::new("/data", "a", "http://example.com/a.jar"),
            WorkItem::new("/data", "b", "http://example.com/b.jar"),
        ]
    }

    #[test]
    fn test_one_bar_per_item() {
        let progress = CliProgress::new(&items());
        assert_eq!(progress.bars.len(), 2);
        assert_eq!(progress.bars[1].prefix(), "b");
        progress.finish();
    }

    #[test]
    fn test_progress_callback() {
        let progress = CliProgress::new(&items());

        progress.on_item_start(0, &items()[0]);
        progress.on_download_progress(0, 512, Some(1024));
        assert_eq!(progress.bars[0].position(), 512);
        assert_eq!(progress.bars[0].length(), Some(1024));

        progress.on_entry_extracted(0, Path::new("a.txt"), 1, 3);
        assert_eq!(progress.bars[0].position(), 1);
        assert_eq!(progress.bars[0].length(), Some(3));

        // Events for unknown items are ignored.
        progress.on_download_progress(7, 1, None);
        progress.finish();
    }
}
