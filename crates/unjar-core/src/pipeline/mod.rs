//! The fetch-extract pipeline for a single work item.
//!
//! For each item the pipeline:
//!
//! 1. validates the URL and the subdirectory,
//! 2. derives the archive file name from the last URL path segment,
//! 3. replaces `destination_base_dir/subdirectory` with an empty directory
//!    ([`prepare`]),
//! 4. downloads the archive into it ([`download`]),
//! 5. unpacks the archive next to it, dropping symbolic links
//!    ([`extract`]).

pub mod download;
pub mod extract;
pub mod prepare;

use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use tracing::info;
use tracing::instrument;

use crate::ExtractConfig;
use crate::ItemReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::WorkItem;
use crate::item::archive_file_name;

/// Runs the pipeline for work items.
///
/// Cloning is cheap: the HTTP client, configuration, and progress handler
/// are shared.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    config: Arc<ExtractConfig>,
    progress: Arc<dyn ProgressCallback>,
    remove_dir: prepare::RemoveDir,
}

impl Fetcher {
    /// Creates a fetcher with a default HTTP client and no progress
    /// reporting.
    #[must_use]
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
            progress: Arc::new(NoopProgress),
            remove_dir: prepare::remove_dir_all,
        }
    }

    /// Uses the given HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the [`ProgressCallback`] notified while items run.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Uses `remove_dir` to clear existing target directories.
    #[must_use]
    pub fn with_dir_remover(mut self, remove_dir: prepare::RemoveDir) -> Self {
        self.remove_dir = remove_dir;
        self
    }

    /// Extraction configuration in use.
    #[must_use]
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub(crate) fn progress(&self) -> &dyn ProgressCallback {
        self.progress.as_ref()
    }

    /// Fetches and extracts one item.
    ///
    /// `index` is the item's position in its batch and is only used to tag
    /// progress events.
    ///
    /// # Errors
    ///
    /// Returns the first error that stops the item. A failed removal of the
    /// old target directory is not an error; it is recorded in
    /// [`ItemReport::warnings`].
    #[instrument(skip(self, item), fields(url = %item.source_url, dir = %item.target_dir().display()))]
    pub async fn fetch(&self, index: usize, item: &WorkItem) -> Result<ItemReport> {
        let start = Instant::now();
        self.progress.on_item_start(index, item);

        let url = item.url()?;
        item.validate_subdirectory()?;
        let file_name = archive_file_name(&url)?;
        let target = item.target_dir();

        let mut report = ItemReport::new(target.clone());

        if let Some(warning) = prepare::replace_directory_with(&target, self.remove_dir).await? {
            report.add_warning(warning);
        }

        let archive_path = target.join(&file_name);
        info!("downloading {url}");
        report.bytes_downloaded =
            download::download(&self.client, &url, &archive_path, index, self.progress()).await?;
        report.archive_path.clone_from(&archive_path);

        info!("downloaded {} bytes, extracting {file_name}", report.bytes_downloaded);
        let config = Arc::clone(&self.config);
        let progress = Arc::clone(&self.progress);
        let extract_target = target.clone();
        report.extraction = tokio::task::spawn_blocking(move || {
            extract::extract_zip(
                &archive_path,
                &extract_target,
                &config,
                index,
                progress.as_ref(),
            )
        })
        .await??;

        report.duration = start.elapsed();
        info!(
            files = report.extraction.files_extracted,
            "finished in {:?}", report.duration
        );

        Ok(report)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(ExtractConfig::default())
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
