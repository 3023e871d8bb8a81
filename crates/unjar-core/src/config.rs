//! Extraction limits applied to every downloaded archive.

/// Extraction configuration shared by every item in a batch.
///
/// Limits apply per archive; exceeding one fails that item only.
///
/// # Examples
///
/// ```
/// use unjar_core::ExtractConfig;
///
/// let config = ExtractConfig {
///     max_file_count: 500,
///     ..Default::default()
/// };
/// assert_eq!(config.max_file_count, 500);
/// assert!(!config.preserve_permissions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Maximum number of entries written from one archive.
    pub max_file_count: usize,

    /// Maximum total uncompressed bytes written from one archive.
    pub max_total_size: u64,

    /// Maximum uncompressed size of a single entry in bytes.
    pub max_file_size: u64,

    /// Apply Unix permissions stored in the archive.
    pub preserve_permissions: bool,
}

impl Default for ExtractConfig {
    /// Default values:
    /// - `max_file_count`: 10,000
    /// - `max_total_size`: 2 GiB
    /// - `max_file_size`: 512 MiB
    /// - `preserve_permissions`: false
    fn default() -> Self {
        Self {
            max_file_count: 10_000,
            max_total_size: 2 * 1024 * 1024 * 1024,
            max_file_size: 512 * 1024 * 1024,
            preserve_permissions: false,
        }
    }
}
