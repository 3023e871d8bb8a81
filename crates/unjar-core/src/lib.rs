//! Fetch zip archives over HTTP and extract them into vendored dependency
//! directories.
//!
//! `unjar-core` turns two configuration sources (command-line triples and a
//! reserved array in the host project's `package.json`) into an ordered list
//! of [`WorkItem`]s, then runs the fetch-extract pipeline for every item
//! concurrently and gathers the per-item outcomes into a [`BatchReport`].
//!
//! # Examples
//!
//! ```no_run
//! use unjar_core::ArgLists;
//! use unjar_core::ExtractConfig;
//! use unjar_core::Fetcher;
//! use unjar_core::merge;
//! use unjar_core::sources::descriptor::DescriptorSource;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let cli_items = ArgLists {
//!     urls: vec!["https://example.com/selenium.jar".to_string()],
//!     download_dirs: vec!["selenium".to_string()],
//!     destination_dirs: vec!["/data".into()],
//! }
//! .into_work_items()?;
//! let descriptor_items = DescriptorSource::new("/srv/app").load();
//!
//! let report = Fetcher::new(ExtractConfig::default())
//!     .run_batch(merge(cli_items, descriptor_items))
//!     .await;
//! println!("{} of {} archives fetched", report.succeeded(), report.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod batch;
pub mod config;
pub mod error;
pub mod item;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod sources;
#[doc(hidden)]
pub mod test_utils;

pub use config::ExtractConfig;
pub use error::ConfigError;
pub use error::DescriptorError;
pub use error::Result;
pub use error::UnjarError;
pub use item::WorkItem;
pub use merge::merge;
pub use pipeline::Fetcher;
pub use report::BatchReport;
pub use report::ExtractionReport;
pub use report::ItemOutcome;
pub use report::ItemReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use sources::args::ArgLists;
pub use sources::descriptor::DescriptorSource;
