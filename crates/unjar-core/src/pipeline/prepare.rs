//! Destructive replacement of a target directory.

use std::io;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use fs_err::tokio as async_fs;
use futures::future::BoxFuture;
use tracing::debug;
use tracing::warn;

use crate::Result;

/// Recursive directory removal used by [`replace_directory_with`].
pub type RemoveDir = fn(PathBuf) -> BoxFuture<'static, io::Result<()>>;

/// Removes `path` and everything below it.
pub fn remove_dir_all(path: PathBuf) -> BoxFuture<'static, io::Result<()>> {
    Box::pin(async move { async_fs::remove_dir_all(path).await })
}

/// Leaves `target` as an existing, empty directory.
///
/// The directory (and any missing parents) is created if nothing is there,
/// then removed recursively together with everything in it, then created
/// again. Anything previously stored in `target` is lost. A file or symbolic
/// link sitting at `target` is unlinked and replaced by a directory.
///
/// A failed removal does not stop the item: it is logged and returned as a
/// warning message, and the directory is recreated (or reused) regardless.
pub async fn replace_directory(target: &Path) -> Result<Option<String>> {
    replace_directory_with(target, remove_dir_all).await
}

/// [`replace_directory`] with a caller-chosen recursive removal.
pub async fn replace_directory_with(
    target: &Path,
    remove_dir: RemoveDir,
) -> Result<Option<String>> {
    match async_fs::symlink_metadata(target).await {
        Ok(metadata) if !metadata.is_dir() => {
            debug!(path = %target.display(), "unlinking non-directory at target path");
            async_fs::remove_file(target).await?;
            async_fs::create_dir_all(target).await?;
            return Ok(None);
        }
        Ok(_) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => async_fs::create_dir_all(target).await?,
        Err(err) => return Err(err.into()),
    }

    let warning = match remove_dir(target.to_path_buf()).await {
        Ok(()) => {
            debug!(path = %target.display(), "cleared target directory");
            None
        }
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => {
            warn!(path = %target.display(), "failed to clear target directory: {err}");
            Some(format!("could not clear {}: {err}", target.display()))
        }
    };

    async_fs::create_dir_all(target).await?;

    Ok(warning)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_missing_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b/c");

        let warning = replace_directory(&target).await.unwrap();

        assert!(warning.is_none());
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_removes_previous_contents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        fs_err::create_dir_all(target.join("nested")).unwrap();
        fs_err::write(target.join("stale.txt"), "old").unwrap();
        fs_err::write(target.join("nested/unrelated.txt"), "old").unwrap();

        replace_directory(&target).await.unwrap();

        assert!(target.is_dir());
        assert_eq!(fs_err::read_dir(&target).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_leaves_siblings_alone() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        let sibling = temp.path().join("keep.txt");
        fs_err::create_dir_all(&target).unwrap();
        fs_err::write(&sibling, "keep").unwrap();

        replace_directory(&target).await.unwrap();

        assert_eq!(fs_err::read_to_string(&sibling).unwrap(), "keep");
    }

    fn deny_removal(_path: PathBuf) -> BoxFuture<'static, io::Result<()>> {
        Box::pin(async { Err(io::Error::new(ErrorKind::PermissionDenied, "denied")) })
    }

    #[tokio::test]
    async fn test_replaces_file_at_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        fs_err::write(&target, "stale file").unwrap();

        let warning = replace_directory(&target).await.unwrap();

        assert!(warning.is_none());
        assert!(target.is_dir());
        assert_eq!(fs_err::read_dir(&target).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_replaces_symlink_without_following_it() {
        let temp = TempDir::new().unwrap();
        let elsewhere = temp.path().join("elsewhere");
        fs_err::create_dir_all(&elsewhere).unwrap();
        fs_err::write(elsewhere.join("keep.txt"), "keep").unwrap();
        let target = temp.path().join("app");
        std::os::unix::fs::symlink(&elsewhere, &target).unwrap();

        replace_directory(&target).await.unwrap();

        assert!(!fs_err::symlink_metadata(&target).unwrap().is_symlink());
        assert!(target.is_dir());
        assert_eq!(fs_err::read_to_string(elsewhere.join("keep.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_removal_failure_is_a_warning() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("app");
        fs_err::create_dir_all(&target).unwrap();
        fs_err::write(target.join("stale.txt"), "old").unwrap();

        let warning = replace_directory_with(&target, deny_removal).await.unwrap();

        let warning = warning.unwrap();
        assert!(warning.contains("could not clear"), "{warning}");
        assert!(warning.contains("denied"), "{warning}");
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn test_removal_failure_still_creates_missing_target() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a/b");

        let warning = replace_directory_with(&target, deny_removal).await.unwrap();

        assert!(warning.is_some());
        assert!(target.is_dir());
    }
}
