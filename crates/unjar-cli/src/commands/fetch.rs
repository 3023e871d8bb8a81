//! Fetch command implementation.

use crate::cli::Cli;
use crate::error::convert_config_error;
use crate::error::describe_descriptor_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing::warn;
use unjar_core::ArgLists;
use unjar_core::DescriptorSource;
use unjar_core::ExtractConfig;
use unjar_core::Fetcher;
use unjar_core::WorkItem;
use unjar_core::merge;
use unjar_core::sources::descriptor::DEFAULT_DEPENDENCY_DIR;
use unjar_core::sources::descriptor::project_root_from_path;

pub async fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<ExitCode> {
    let cli_items = ArgLists {
        urls: cli.urls.clone(),
        download_dirs: cli.download_dirs.clone(),
        destination_dirs: cli.destination_dirs.clone(),
    }
    .into_work_items()
    .map_err(convert_config_error)?;

    let descriptor_items = if cli.skip_descriptor {
        Vec::new()
    } else {
        descriptor_items(cli, formatter)
    };

    let items = merge(cli_items, descriptor_items);
    info!(items = items.len(), "merged configuration");
    if items.is_empty() {
        formatter.format_warning("no archives configured; nothing to fetch");
    }

    let config = ExtractConfig {
        max_file_count: cli.max_files,
        max_total_size: cli.max_total_size,
        max_file_size: cli.max_file_size,
        preserve_permissions: cli.preserve_permissions,
    };
    let mut fetcher = Fetcher::new(config);

    // Use progress bars if TTY is detected (not quiet, not JSON, is terminal)
    let progress = (!cli.quiet && !cli.json && !items.is_empty() && CliProgress::should_show())
        .then(|| Arc::new(CliProgress::new(&items)));
    if let Some(progress) = &progress {
        fetcher = fetcher.with_progress(progress.clone());
    }

    let report = fetcher.run_batch(items).await;

    if let Some(progress) = &progress {
        progress.finish();
    }

    formatter.format_batch_report(&report)?;

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn descriptor_items(cli: &Cli, formatter: &dyn OutputFormatter) -> Vec<WorkItem> {
    load_descriptor(project_root(cli), &cli.descriptor, formatter)
}

/// Descriptor items under `root`, or none with a warning when the root or
/// the descriptor cannot be used.
fn load_descriptor(
    root: Result<PathBuf>,
    file_name: &str,
    formatter: &dyn OutputFormatter,
) -> Vec<WorkItem> {
    let root = match root {
        Ok(root) => root,
        Err(err) => {
            warn!("no descriptor configuration used: {err:#}");
            formatter.format_warning(&format!(
                "{err:#}; continuing with command-line archives only"
            ));
            return Vec::new();
        }
    };

    match DescriptorSource::new(root).with_file_name(file_name).try_load() {
        Ok(items) => items,
        Err(err) => {
            warn!("no descriptor configuration used: {err}");
            formatter.format_warning(&describe_descriptor_error(&err));
            Vec::new()
        }
    }
}

fn project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project_root {
        Some(root) => Ok(root.clone()),
        None => {
            let cwd = env::current_dir().context("failed to get current directory")?;
            Ok(project_root_from_path(&cwd, DEFAULT_DEPENDENCY_DIR))
        }
    }
}
