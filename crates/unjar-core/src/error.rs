//! Error types for configuration loading and the fetch-extract pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `UnjarError`.
pub type Result<T> = std::result::Result<T, UnjarError>;

/// Represents a specific extraction quota that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// File count quota exceeded.
    FileCount {
        /// Current file count.
        current: usize,
        /// Maximum allowed file count.
        max: usize,
    },
    /// Total size quota exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single file size quota exceeded.
    FileSize {
        /// File size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        max: u64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: file count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "quota exceeded: single file size ({size} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Errors that fail a single work item.
///
/// One item failing never aborts its siblings; the batch runner records the
/// error next to the item that produced it.
#[derive(Error, Debug)]
pub enum UnjarError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as configured.
        url: String,
        /// Parser message.
        reason: String,
    },

    /// The source URL has no final path segment to name the archive after.
    #[error("cannot derive an archive file name from URL '{url}'")]
    MissingFileName {
        /// The URL as configured.
        url: String,
    },

    /// The subdirectory is empty, absolute, or leaves the destination base.
    #[error("invalid download directory '{subdirectory}': must be a relative path below the destination directory")]
    InvalidSubdirectory {
        /// The subdirectory as configured.
        subdirectory: String,
    },

    /// The server answered with a non-success status.
    #[error("failed to download {url}: HTTP {status}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The HTTP transfer failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The downloaded file is not a readable zip archive.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An archive entry would be written outside the target directory.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The entry name that attempted traversal.
        path: PathBuf,
    },

    /// Extraction quota exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },

    /// The task running the item panicked or was cancelled.
    #[error("item task failed: {0}")]
    TaskFailed(String),
}

impl From<tokio::task::JoinError> for UnjarError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskFailed(err.to_string())
    }
}

impl UnjarError {
    /// Returns `true` if the error came from the network transfer.
    ///
    /// # Examples
    ///
    /// ```
    /// use unjar_core::UnjarError;
    ///
    /// let err = UnjarError::HttpStatus {
    ///     url: "https://example.com/x.jar".to_string(),
    ///     status: 404,
    /// };
    /// assert!(err.is_network());
    /// assert!(!UnjarError::InvalidArchive("bad".to_string()).is_network());
    /// ```
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Http(_))
    }

    /// Returns `true` if the item was refused to protect the filesystem.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::PathTraversal { .. } | Self::InvalidSubdirectory { .. } | Self::QuotaExceeded { .. }
        )
    }

    /// Returns a context string for this error, if available.
    ///
    /// # Examples
    ///
    /// ```
    /// use unjar_core::UnjarError;
    ///
    /// let err = UnjarError::InvalidArchive("bad header".to_string());
    /// assert_eq!(err.context(), Some("bad header"));
    ///
    /// let err = UnjarError::TaskFailed("panicked".to_string());
    /// assert_eq!(err.context(), Some("panicked"));
    /// ```
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::InvalidArchive(msg) | Self::TaskFailed(msg) => Some(msg),
            Self::InvalidUrl { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}

/// Errors in the command-line triples.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The three parallel lists cannot be paired by index.
    #[error(
        "mismatched argument counts: {urls} --urls, {download_dirs} --download-dirs, {destination_dirs} --destination-dirs"
    )]
    MismatchedLengths {
        /// Number of `--urls` values.
        urls: usize,
        /// Number of `--download-dirs` values.
        download_dirs: usize,
        /// Number of `--destination-dirs` values.
        destination_dirs: usize,
    },
}

/// Errors while loading the host project's descriptor.
///
/// All of these are soft: [`DescriptorSource::load`] logs them and yields
/// no work items.
///
/// [`DescriptorSource::load`]: crate::sources::descriptor::DescriptorSource::load
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The descriptor file is missing or unreadable.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The descriptor is not valid JSON.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        /// Descriptor path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The reserved key is absent.
    #[error("no \"{key}\" entry found in {}", path.display())]
    MissingKey {
        /// Descriptor path.
        path: PathBuf,
        /// The reserved configuration key.
        key: String,
    },

    /// The value under the reserved key is not a list of `{directory, url}`.
    #[error("invalid \"{key}\" entry in {}: {source}", path.display())]
    InvalidEntries {
        /// Descriptor path.
        path: PathBuf,
        /// The reserved configuration key.
        key: String,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UnjarError::HttpStatus {
            url: "https://example.com/x.jar".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "failed to download https://example.com/x.jar: HTTP 404"
        );
    }

    #[test]
    fn test_quota_display() {
        let err = UnjarError::QuotaExceeded {
            resource: QuotaResource::FileCount {
                current: 11,
                max: 10,
            },
        };
        assert_eq!(err.to_string(), "quota exceeded: file count (11 > 10)");
        assert!(err.quota_resource().is_some());
    }

    #[test]
    fn test_security_classification() {
        let err = UnjarError::PathTraversal {
            path: PathBuf::from("../evil"),
        };
        assert!(err.is_security_violation());
        assert!(!err.is_network());

        let err = UnjarError::InvalidSubdirectory {
            subdirectory: "..".to_string(),
        };
        assert!(err.is_security_violation());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: UnjarError = io_err.into();
        assert!(matches!(err, UnjarError::Io(_)));
    }

    #[test]
    fn test_mismatched_lengths_display() {
        let err = ConfigError::MismatchedLengths {
            urls: 2,
            download_dirs: 1,
            destination_dirs: 2,
        };
        assert!(err.to_string().contains("2 --urls"));
        assert!(err.to_string().contains("1 --download-dirs"));
    }

    #[test]
    fn test_missing_key_display() {
        let err = DescriptorError::MissingKey {
            path: PathBuf::from("/srv/app/package.json"),
            key: "unjar-from-url-config".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no \"unjar-from-url-config\" entry found in /srv/app/package.json"
        );
    }
}
