//! Error conversion utilities for CLI.
//!
//! Converts unjar-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use unjar_core::ConfigError;
use unjar_core::DescriptorError;
use unjar_core::UnjarError;
use unjar_core::WorkItem;

/// Converts a per-item `UnjarError` into a user-friendly error naming the item
pub fn convert_item_error(err: &UnjarError, item: &WorkItem) -> anyhow::Error {
    let source = &item.source_url;
    let target = item.target_dir();
    let target = target.display();

    match err {
        UnjarError::HttpStatus { status, .. } => {
            anyhow!(
                "Failed to download '{source}' into '{target}': server answered HTTP {status}\n\
                 HINT: Check that the URL is correct and reachable. The target directory was left empty."
            )
        }
        UnjarError::Http(http_err) => {
            anyhow!(
                "Failed to download '{source}' into '{target}': {http_err}\n\
                 HINT: Check your network connection and proxy settings."
            )
        }
        UnjarError::InvalidUrl { reason, .. } => {
            anyhow!(
                "Invalid URL '{source}': {reason}\n\
                 HINT: URLs must be absolute, e.g. https://host/path/archive.jar"
            )
        }
        UnjarError::MissingFileName { .. } => {
            anyhow!(
                "Cannot name the archive for '{source}': the URL path has no file name\n\
                 HINT: Point the URL at the archive itself, e.g. https://host/path/archive.jar"
            )
        }
        UnjarError::InvalidSubdirectory { subdirectory } => {
            anyhow!(
                "Refusing download directory '{subdirectory}' for '{source}'\n\
                 HINT: Download directories must be relative names below the destination, without '..'."
            )
        }
        UnjarError::PathTraversal { path } => {
            anyhow!(
                "Security violation: Archive from '{source}' attempted path traversal with '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                path.display()
            )
        }
        UnjarError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{source}': {resource}\n\
                 HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits."
            )
        }
        UnjarError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{source}': {reason}\n\
                 HINT: The archive may be corrupted, or the URL may not point at a zip or jar file."
            )
        }
        UnjarError::Io(io_err) => {
            anyhow!("I/O error while processing '{source}' into '{target}': {io_err}")
        }
        UnjarError::TaskFailed(reason) => {
            anyhow!("Processing '{source}' was interrupted: {reason}")
        }
    }
}

/// Converts a `ConfigError` into a user-friendly error
pub fn convert_config_error(err: ConfigError) -> anyhow::Error {
    match err {
        ConfigError::MismatchedLengths { .. } => {
            anyhow!(
                "Invalid arguments: {err}\n\
                 HINT: Give --urls, --download-dirs and --destination-dirs the same number of times; \
                 values are paired by position."
            )
        }
    }
}

/// Describes a descriptor problem as a one-line warning
pub fn describe_descriptor_error(err: &DescriptorError) -> String {
    match err {
        DescriptorError::MissingKey { .. } | DescriptorError::Read { .. } => {
            format!("{err}; continuing with command-line archives only")
        }
        DescriptorError::Parse { .. } | DescriptorError::InvalidEntries { .. } => {
            format!("{err}; ignoring the descriptor")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn item() -> WorkItem {
        WorkItem::new("/data", "app", "https://example.com/x.jar")
    }

    #[test]
    fn test_convert_http_status_error() {
        let err = UnjarError::HttpStatus {
            url: "https://example.com/x.jar".to_string(),
            status: 404,
        };
        let msg = format!("{:?}", convert_item_error(&err, &item()));
        assert!(msg.contains("HTTP 404"));
        assert!(msg.contains("https://example.com/x.jar"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_path_traversal_error() {
        let err = UnjarError::PathTraversal {
            path: PathBuf::from("../../../etc/passwd"),
        };
        let msg = format!("{:?}", convert_item_error(&err, &item()));
        assert!(msg.contains("path traversal"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_config_error() {
        let err = ConfigError::MismatchedLengths {
            urls: 2,
            download_dirs: 1,
            destination_dirs: 2,
        };
        let msg = format!("{:?}", convert_config_error(err));
        assert!(msg.contains("mismatched argument counts"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_describe_missing_key() {
        let err = DescriptorError::MissingKey {
            path: PathBuf::from("/srv/app/package.json"),
            key: "unjar-from-url-config".to_string(),
        };
        let msg = describe_descriptor_error(&err);
        assert!(msg.contains("unjar-from-url-config"));
        assert!(msg.contains("command-line archives only"));
    }
}
