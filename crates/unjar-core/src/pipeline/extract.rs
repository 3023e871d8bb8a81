//! Zip extraction into the target directory.
//!
//! Runs on a blocking thread. Entries are written in place (there is no
//! staging directory), so an error part-way leaves the entries written so far
//! on disk. A file entry whose path is the archive itself is skipped and the
//! archive is kept.

use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use fs_err::File;
use fs_err::create_dir_all;
use tracing::debug;
use tracing::warn;

use crate::ExtractConfig;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::UnjarError;
use crate::error::QuotaResource;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Extracts the zip at `archive` into `target`, skipping symbolic links.
///
/// Every handled entry emits `on_entry_extracted`; the first error emits
/// `on_extraction_error` and is returned; success emits
/// `on_extraction_complete`.
pub fn extract_zip(
    archive: &Path,
    target: &Path,
    config: &ExtractConfig,
    index: usize,
    progress: &dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let result = extract_entries(archive, target, config, index, progress);

    match &result {
        Ok(report) => {
            debug!(
                archive = %archive.display(),
                files = report.files_extracted,
                skipped_symlinks = report.symlinks_skipped,
                "finished extracting"
            );
            progress.on_extraction_complete(index, report);
        }
        Err(err) => {
            warn!(archive = %archive.display(), "extraction failed: {err}");
            progress.on_extraction_error(index, err);
        }
    }

    result
}

fn extract_entries(
    archive_path: &Path,
    target: &Path,
    config: &ExtractConfig,
    index: usize,
    progress: &dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let file = File::open(archive_path)?;
    let reader = std::io::BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| UnjarError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let total = archive.len();
    let mut report = ExtractionReport::new();

    for i in 0..total {
        let mut entry = archive.by_index(i).map_err(|e| {
            UnjarError::InvalidArchive(format!("failed to read ZIP entry: {e}"))
        })?;

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| UnjarError::PathTraversal {
                path: PathBuf::from(entry.name()),
            })?;

        if entry.unix_mode().is_some_and(is_symlink_mode) {
            debug!(entry = %relative.display(), "skipping symbolic link");
            report.symlinks_skipped += 1;
            progress.on_entry_extracted(index, &relative, i + 1, total);
            continue;
        }

        let output_path = target.join(&relative);

        if entry.is_dir() {
            create_dir_all(&output_path)?;
            report.directories_created += 1;
        } else if output_path == archive_path {
            // writing here would truncate the archive being read
            warn!(entry = %relative.display(), "skipping entry that would overwrite the archive");
        } else {
            check_quota(&report, entry.size(), config)?;

            if let Some(parent) = output_path.parent() {
                create_dir_all(parent)?;
            }

            let written = write_entry(&mut entry, &output_path, config)?;
            report.files_extracted += 1;
            report.bytes_written = report.bytes_written.checked_add(written).ok_or(
                UnjarError::QuotaExceeded {
                    resource: QuotaResource::IntegerOverflow,
                },
            )?;

            #[cfg(unix)]
            if config.preserve_permissions {
                if let Some(mode) = entry.unix_mode() {
                    use std::os::unix::fs::PermissionsExt;
                    fs_err::set_permissions(
                        &output_path,
                        std::fs::Permissions::from_mode(mode & 0o777),
                    )?;
                }
            }
        }

        progress.on_entry_extracted(index, &relative, i + 1, total);
    }

    report.duration = start.elapsed();
    Ok(report)
}

/// Checks quotas BEFORE writing so no partial file is left on overflow.
fn check_quota(report: &ExtractionReport, size: u64, config: &ExtractConfig) -> Result<()> {
    if report.files_extracted >= config.max_file_count {
        return Err(UnjarError::QuotaExceeded {
            resource: QuotaResource::FileCount {
                current: report.files_extracted + 1,
                max: config.max_file_count,
            },
        });
    }

    if size > config.max_file_size {
        return Err(UnjarError::QuotaExceeded {
            resource: QuotaResource::FileSize {
                size,
                max: config.max_file_size,
            },
        });
    }

    let total = report
        .bytes_written
        .checked_add(size)
        .ok_or(UnjarError::QuotaExceeded {
            resource: QuotaResource::IntegerOverflow,
        })?;
    if total > config.max_total_size {
        return Err(UnjarError::QuotaExceeded {
            resource: QuotaResource::TotalSize {
                current: total,
                max: config.max_total_size,
            },
        });
    }

    Ok(())
}

/// Copies one entry to disk, never writing more than `max_file_size` bytes
/// even if the declared size was wrong.
fn write_entry<R: Read>(entry: &mut R, output_path: &Path, config: &ExtractConfig) -> Result<u64> {
    let output_file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output_file);

    let mut limited = entry.take(config.max_file_size.saturating_add(1));
    let written = std::io::copy(&mut limited, &mut writer)?;
    writer.flush()?;

    if written > config.max_file_size {
        return Err(UnjarError::QuotaExceeded {
            resource: QuotaResource::FileSize {
                size: written,
                max: config.max_file_size,
            },
        });
    }

    Ok(written)
}

const fn is_symlink_mode(mode: u32) -> bool {
    mode & S_IFMT == S_IFLNK
}
