//! The unit of work: one archive to fetch and where to unpack it.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use url::Url;

use crate::Result;
use crate::UnjarError;

/// One configured (destination base, subdirectory, source URL) triple.
///
/// Items have no identity of their own; two equal items are processed
/// independently and race on the same target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Directory the subdirectory is created in.
    pub destination_base_dir: PathBuf,

    /// Name of the directory the archive is downloaded to and unpacked in.
    pub subdirectory: String,

    /// Location of the archive. Parsed lazily so a bad URL fails only its
    /// own item.
    pub source_url: String,
}

impl WorkItem {
    /// Creates a new work item.
    pub fn new(
        destination_base_dir: impl Into<PathBuf>,
        subdirectory: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            destination_base_dir: destination_base_dir.into(),
            subdirectory: subdirectory.into(),
            source_url: source_url.into(),
        }
    }

    /// Directory that is wiped, recreated, and filled for this item.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use unjar_core::WorkItem;
    ///
    /// let item = WorkItem::new("/data", "app", "http://example.com/x.jar");
    /// assert_eq!(item.target_dir(), Path::new("/data/app"));
    /// ```
    #[must_use]
    pub fn target_dir(&self) -> PathBuf {
        self.destination_base_dir.join(&self.subdirectory)
    }

    /// Parses the source URL.
    pub fn url(&self) -> Result<Url> {
        Url::parse(&self.source_url).map_err(|e| UnjarError::InvalidUrl {
            url: self.source_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Checks that the subdirectory stays below the destination base.
    ///
    /// The target directory is deleted recursively, so an empty, absolute,
    /// or `..`-containing subdirectory is refused before anything touches
    /// the filesystem.
    pub fn validate_subdirectory(&self) -> Result<()> {
        let path = Path::new(&self.subdirectory);
        let mut components = path.components().peekable();

        let only_normal = components.peek().is_some()
            && components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && path.components().any(|c| matches!(c, Component::Normal(_)));

        if only_normal {
            Ok(())
        } else {
            Err(UnjarError::InvalidSubdirectory {
                subdirectory: self.subdirectory.clone(),
            })
        }
    }
}

/// Derives the archive file name from the last non-empty URL path segment.
///
/// # Examples
///
/// ```
/// use unjar_core::item::archive_file_name;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/libs/x.jar?token=abc").unwrap();
/// assert_eq!(archive_file_name(&url).unwrap(), "x.jar");
/// ```
pub fn archive_file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .map(ToString::to_string)
        .ok_or_else(|| UnjarError::MissingFileName {
            url: url.to_string(),
        })
}
