//! Per-item and per-batch reporting, plus the progress callback seam.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::UnjarError;
use crate::WorkItem;

/// Report of extracting one downloaded archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Number of files successfully extracted.
    pub files_extracted: usize,

    /// Number of directories created.
    pub directories_created: usize,

    /// Number of symbolic-link entries dropped instead of materialized.
    pub symlinks_skipped: usize,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates a new empty extraction report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns total number of entries that were written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted + self.directories_created
    }
}

/// Report of one successfully fetched and extracted item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Directory that was replaced and filled.
    pub target_dir: PathBuf,

    /// Location of the downloaded archive (left in place after extraction).
    pub archive_path: PathBuf,

    /// Bytes received from the source URL.
    pub bytes_downloaded: u64,

    /// Extraction statistics.
    pub extraction: ExtractionReport,

    /// Non-fatal problems, such as a failed removal of the old directory.
    pub warnings: Vec<String>,

    /// Wall-clock duration of the whole item.
    pub duration: Duration,
}

impl ItemReport {
    /// Creates an empty report for the given target directory.
    #[must_use]
    pub fn new(target_dir: PathBuf) -> Self {
        Self {
            archive_path: target_dir.clone(),
            target_dir,
            bytes_downloaded: 0,
            extraction: ExtractionReport::new(),
            warnings: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of one item in a batch.
#[derive(Debug)]
pub struct ItemOutcome {
    /// Position of the item in the merged configuration list.
    pub index: usize,

    /// The item as configured.
    pub item: WorkItem,

    /// Success report or the error that stopped the item.
    pub result: Result<ItemReport, UnjarError>,
}

impl ItemOutcome {
    /// Returns `true` if the item was fetched and extracted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered outcomes of every item in a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per item, in input order.
    pub outcomes: Vec<ItemOutcome>,

    /// Wall-clock duration of the whole batch.
    pub duration: Duration,
}

impl BatchReport {
    /// Number of items in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if the batch had no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of items that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of items that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Returns `true` if no item failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Iterates over failed items and their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&WorkItem, &UnjarError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.item, e)))
    }
}

/// Callback trait for progress reporting while a batch runs.
///
/// Items run concurrently, so every method takes `&self` and the item's
/// `index` in the batch. All methods default to doing nothing.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::AtomicUsize;
/// use std::sync::atomic::Ordering;
/// use unjar_core::ProgressCallback;
/// use unjar_core::WorkItem;
///
/// #[derive(Default)]
/// struct CountStarts(AtomicUsize);
///
/// impl ProgressCallback for CountStarts {
///     fn on_item_start(&self, _index: usize, _item: &WorkItem) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
/// ```
pub trait ProgressCallback: Send + Sync {
    /// Called once when the pipeline starts an item.
    fn on_item_start(&self, _index: usize, _item: &WorkItem) {}

    /// Called as archive bytes arrive.
    ///
    /// * `downloaded` - Bytes received so far
    /// * `total` - Content length, when the server sent one
    fn on_download_progress(&self, _index: usize, _downloaded: u64, _total: Option<u64>) {}

    /// Called after each archive entry is handled.
    ///
    /// * `current` - Entry number (1-indexed)
    /// * `total` - Number of entries in the archive
    fn on_entry_extracted(&self, _index: usize, _path: &Path, _current: usize, _total: usize) {}

    /// Called when extraction stops on an error.
    fn on_extraction_error(&self, _index: usize, _error: &UnjarError) {}

    /// Called when every entry has been extracted.
    fn on_extraction_complete(&self, _index: usize, _report: &ExtractionReport) {}

    /// Called once per item with its final result.
    fn on_item_complete(&self, _index: usize, _result: &Result<ItemReport, UnjarError>) {}
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}
