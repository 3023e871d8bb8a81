//! Work items from command-line lists.

use std::path::PathBuf;

use tracing::warn;

use crate::ConfigError;
use crate::WorkItem;

/// The three parallel lists collected from `--urls`, `--download-dirs` and
/// `--destination-dirs`.
///
/// A flag given once is simply a one-element list, so single and multiple
/// items share the same pairing path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgLists {
    /// Source URLs.
    pub urls: Vec<String>,

    /// Subdirectory names, one per URL.
    pub download_dirs: Vec<String>,

    /// Destination base directories, one per URL.
    pub destination_dirs: Vec<PathBuf>,
}

impl ArgLists {
    /// Pairs the lists by index into work items.
    ///
    /// Without any URL there is no work and the other lists are ignored.
    /// Otherwise the three lists must have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MismatchedLengths`] when the lists cannot be
    /// paired one-to-one.
    ///
    /// # Examples
    ///
    /// ```
    /// use unjar_core::ArgLists;
    /// use unjar_core::WorkItem;
    ///
    /// let items = ArgLists {
    ///     urls: vec!["http://example.com/x.jar".to_string()],
    ///     download_dirs: vec!["app".to_string()],
    ///     destination_dirs: vec!["/data".into()],
    /// }
    /// .into_work_items()
    /// .unwrap();
    ///
    /// assert_eq!(items, vec![WorkItem::new("/data", "app", "http://example.com/x.jar")]);
    /// ```
    pub fn into_work_items(self) -> Result<Vec<WorkItem>, ConfigError> {
        if self.urls.is_empty() {
            if !self.download_dirs.is_empty() || !self.destination_dirs.is_empty() {
                warn!("no --urls given; ignoring --download-dirs and --destination-dirs");
            }
            return Ok(Vec::new());
        }

        if self.urls.len() != self.download_dirs.len()
            || self.urls.len() != self.destination_dirs.len()
        {
            return Err(ConfigError::MismatchedLengths {
                urls: self.urls.len(),
                download_dirs: self.download_dirs.len(),
                destination_dirs: self.destination_dirs.len(),
            });
        }

        Ok(self
            .urls
            .into_iter()
            .zip(self.download_dirs)
            .zip(self.destination_dirs)
            .map(|((url, dir), dest)| WorkItem::new(dest, dir, url))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lists(urls: &[&str], dirs: &[&str], dests: &[&str]) -> ArgLists {
        ArgLists {
            urls: urls.iter().map(ToString::to_string).collect(),
            download_dirs: dirs.iter().map(ToString::to_string).collect(),
            destination_dirs: dests.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn test_no_urls_yields_nothing() {
        assert!(ArgLists::default().into_work_items().unwrap().is_empty());
    }

    #[test]
    fn test_no_urls_ignores_other_lists() {
        let items = lists(&[], &["app"], &["/data"]).into_work_items().unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_single_triple() {
        let items = lists(&["http://example.com/x.jar"], &["app"], &["/data"])
            .into_work_items()
            .unwrap();
        assert_eq!(
            items,
            vec![WorkItem::new("/data", "app", "http://example.com/x.jar")]
        );
    }

    #[test]
    fn test_pairs_by_index() {
        let items = lists(
            &["http://a.example/a.jar", "http://b.example/b.jar"],
            &["a-dir", "b-dir"],
            &["/data", "/tmp"],
        )
        .into_work_items()
        .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0], WorkItem::new("/data", "a-dir", "http://a.example/a.jar"));
        assert_eq!(items[1], WorkItem::new("/tmp", "b-dir", "http://b.example/b.jar"));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = lists(
            &["http://a.example/a.jar", "http://b.example/b.jar"],
            &["a-dir"],
            &["/data", "/tmp"],
        )
        .into_work_items()
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::MismatchedLengths {
                urls: 2,
                download_dirs: 1,
                destination_dirs: 2,
            }
        );
    }

    #[test]
    fn test_missing_destination_rejected() {
        let result = lists(&["http://a.example/a.jar"], &["a-dir"], &[]).into_work_items();
        assert!(matches!(result, Err(ConfigError::MismatchedLengths { .. })));
    }
}
