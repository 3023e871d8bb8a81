//! Concurrent execution of a list of work items.

use std::time::Instant;

use futures::future::join_all;
use tracing::debug;
use tracing::warn;

use crate::BatchReport;
use crate::Fetcher;
use crate::ItemOutcome;
use crate::UnjarError;
use crate::WorkItem;

impl Fetcher {
    /// Starts every item at once and waits for all of them.
    ///
    /// Items are independent: a failure in one never stops or rolls back
    /// another. Outcomes are returned in input order, whatever order the
    /// items finished in. Items that share a target directory race with each
    /// other, and the last one to finish wins.
    pub async fn run_batch(&self, items: Vec<WorkItem>) -> BatchReport {
        let start = Instant::now();
        debug!(items = items.len(), "starting batch");

        let handles: Vec<_> = items
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, item)| {
                let fetcher = self.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch(index, &item).await;
                    fetcher.progress().on_item_complete(index, &result);
                    result
                })
            })
            .collect();

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(items)
            .enumerate()
            .map(|(index, (joined, item))| {
                let result = match joined {
                    Ok(result) => result,
                    Err(err) => {
                        // The task died before it could report itself.
                        let result = Err(UnjarError::from(err));
                        self.progress().on_item_complete(index, &result);
                        result
                    }
                };
                if let Err(err) = &result {
                    warn!("{} -> {}: {err}", item.source_url, item.target_dir().display());
                }
                ItemOutcome {
                    index,
                    item,
                    result,
                }
            })
            .collect();

        BatchReport {
            outcomes,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExtractConfig;
    use crate::ProgressCallback;
    use crate::test_utils::ZipTestBuilder;
    use std::sync::Arc;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use url::Url;

    #[derive(Default)]
    struct Events {
        started: Mutex<Vec<usize>>,
        completed: Mutex<Vec<(usize, bool)>>,
    }

    impl ProgressCallback for Events {
        fn on_item_start(&self, index: usize, _item: &WorkItem) {
            self.started.lock().unwrap().push(index);
        }

        fn on_item_complete(
            &self,
            index: usize,
            result: &Result<crate::ItemReport, UnjarError>,
        ) {
            self.completed.lock().unwrap().push((index, result.is_ok()));
        }
    }

    fn write_jar(dir: &std::path::Path, name: &str, file: &str, content: &[u8]) -> String {
        let path = dir.join(name);
        let data = ZipTestBuilder::new().add_file(file, content).build();
        fs_err::write(&path, data).unwrap();
        Url::from_file_path(&path).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = Fetcher::default().run_batch(Vec::new()).await;
        assert!(report.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_outcomes_keep_input_order() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let events = Arc::new(Events::default());

        let items = vec![
            WorkItem::new(dest.path(), "a", write_jar(source.path(), "a.jar", "a.txt", b"a")),
            WorkItem::new(dest.path(), "b", "not a url"),
            WorkItem::new(dest.path(), "c", write_jar(source.path(), "c.jar", "c.txt", b"c")),
        ];

        let fetcher = Fetcher::new(ExtractConfig::default()).with_progress(events.clone());
        let report = fetcher.run_batch(items).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report.succeeded(), 2);
        let indices: Vec<_> = report.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(report.outcomes[1].item.subdirectory, "b");
        assert!(matches!(
            report.outcomes[1].result,
            Err(UnjarError::InvalidUrl { .. })
        ));
        assert!(dest.path().join("a/a.txt").is_file());
        assert!(dest.path().join("c/c.txt").is_file());

        let mut started = events.started.lock().unwrap().clone();
        started.sort_unstable();
        assert_eq!(started, vec![0, 1, 2]);

        let mut completed = events.completed.lock().unwrap().clone();
        completed.sort_unstable();
        assert_eq!(completed, vec![(0, true), (1, false), (2, true)]);
    }
}
