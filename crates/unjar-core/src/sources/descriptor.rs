//! Work items from the host project's descriptor file.
//!
//! When this tool is installed as a dependency, the project that depends on
//! it lists the archives to vendor under a reserved key of its own
//! `package.json`:
//!
//! ```json
//! {
//!   "unjar-from-url-config": [
//!     {
//!       "directory": "selenium-server-standalone",
//!       "url": "http://selenium-release.storage.googleapis.com/2.43/selenium-server-standalone-2.43.1.jar"
//!     }
//!   ]
//! }
//! ```
//!
//! Every entry is unpacked below the project's dependency directory
//! (`<root>/node_modules/<directory>`).

use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;
use tracing::warn;

use crate::DescriptorError;
use crate::WorkItem;

/// Conventional descriptor file name at the project root.
pub const DEFAULT_DESCRIPTOR_FILE: &str = "package.json";

/// Reserved descriptor key holding the archive list.
pub const DEFAULT_CONFIG_KEY: &str = "unjar-from-url-config";

/// Name of the directory dependencies are installed into.
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";

/// Truncates `path` at the first component named `dependency_dir`.
///
/// A path without such a component is returned unchanged: it already is a
/// project root.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use unjar_core::sources::descriptor::project_root_from_path;
///
/// let root = project_root_from_path(
///     Path::new("/srv/app/node_modules/unjar/node_modules"),
///     "node_modules",
/// );
/// assert_eq!(root, Path::new("/srv/app"));
/// ```
#[must_use]
pub fn project_root_from_path(path: &Path, dependency_dir: &str) -> PathBuf {
    let dependency_dir = OsStr::new(dependency_dir);
    path.components()
        .take_while(|c| !matches!(c, Component::Normal(name) if *name == dependency_dir))
        .collect()
}

/// Resolves the host project root from a chain of lookup directories.
///
/// The chain runs from the innermost module outwards; its last entry is the
/// one with no further parent, i.e. the consuming application. Returns
/// `None` for an empty chain.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use std::path::PathBuf;
/// use unjar_core::sources::descriptor::resolve_project_root;
///
/// let chain = [
///     PathBuf::from("/srv/app/node_modules/unjar/node_modules"),
///     PathBuf::from("/srv/app/node_modules/tool/node_modules"),
///     PathBuf::from("/srv/app/node_modules"),
/// ];
/// let root = resolve_project_root(&chain, "node_modules").unwrap();
/// assert_eq!(root, Path::new("/srv/app"));
/// ```
#[must_use]
pub fn resolve_project_root(lookup_chain: &[PathBuf], dependency_dir: &str) -> Option<PathBuf> {
    lookup_chain
        .last()
        .map(|outermost| project_root_from_path(outermost, dependency_dir))
}

/// One element of the reserved descriptor array.
///
/// Unknown fields (including a stale destination) are ignored; the
/// destination is always recomputed from the project root.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
struct DescriptorEntry {
    directory: String,
    url: String,
}

/// Reads work items from the reserved key of a project descriptor.
#[derive(Debug, Clone)]
pub struct DescriptorSource {
    project_root: PathBuf,
    file_name: String,
    key: String,
    dependency_dir: String,
}

impl DescriptorSource {
    /// Creates a source for the project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            file_name: DEFAULT_DESCRIPTOR_FILE.to_string(),
            key: DEFAULT_CONFIG_KEY.to_string(),
            dependency_dir: DEFAULT_DEPENDENCY_DIR.to_string(),
        }
    }

    /// Sets the descriptor file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Sets the reserved configuration key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Sets the dependency directory name.
    #[must_use]
    pub fn with_dependency_dir(mut self, dependency_dir: impl Into<String>) -> Self {
        self.dependency_dir = dependency_dir.into();
        self
    }

    /// Project root this source reads from.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Full path of the descriptor file.
    #[must_use]
    pub fn descriptor_path(&self) -> PathBuf {
        self.project_root.join(&self.file_name)
    }

    /// Destination base directory assigned to every descriptor item.
    #[must_use]
    pub fn destination_base(&self) -> PathBuf {
        self.project_root.join(&self.dependency_dir)
    }

    /// Loads the descriptor items, reporting why none could be loaded.
    pub fn try_load(&self) -> Result<Vec<WorkItem>, DescriptorError> {
        let path = self.descriptor_path();

        let contents = fs_err::read_to_string(&path).map_err(|source| DescriptorError::Read {
            path: path.clone(),
            source,
        })?;

        let mut document: serde_json::Value =
            serde_json::from_str(&contents).map_err(|source| DescriptorError::Parse {
                path: path.clone(),
                source,
            })?;

        let value = match document.get_mut(&self.key).map(serde_json::Value::take) {
            Some(serde_json::Value::Null) | None => {
                return Err(DescriptorError::MissingKey {
                    path,
                    key: self.key.clone(),
                });
            }
            Some(value) => value,
        };

        let entries: Vec<DescriptorEntry> =
            serde_json::from_value(value).map_err(|source| DescriptorError::InvalidEntries {
                path: path.clone(),
                key: self.key.clone(),
                source,
            })?;

        let base = self.destination_base();
        debug!(
            descriptor = %path.display(),
            count = entries.len(),
            "loaded descriptor configuration"
        );

        Ok(entries
            .into_iter()
            .map(|entry| WorkItem::new(base.clone(), entry.directory, entry.url))
            .collect())
    }

    /// Loads the descriptor items, logging a warning and returning an empty
    /// list if the descriptor is missing, unreadable, or has no entry.
    pub fn load(&self) -> Vec<WorkItem> {
        self.try_load().unwrap_or_else(|err| {
            warn!("no descriptor configuration used: {err}");
            Vec::new()
        })
    }
}
