//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;
use unjar_core::sources::descriptor::DEFAULT_DESCRIPTOR_FILE;

#[derive(Parser)]
#[command(name = "unjar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URL of an archive to fetch (repeatable)
    #[arg(long, value_name = "URL")]
    pub urls: Vec<String>,

    /// Subdirectory to unpack the matching URL into (repeatable)
    #[arg(long, value_name = "NAME")]
    pub download_dirs: Vec<String>,

    /// Base directory holding the matching subdirectory (repeatable)
    #[arg(long, value_name = "DIR")]
    pub destination_dirs: Vec<PathBuf>,

    /// Host project root (default: derived from the current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Descriptor file name in the project root
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DESCRIPTOR_FILE)]
    pub descriptor: String,

    /// Do not read the project descriptor
    #[arg(long)]
    pub skip_descriptor: bool,

    /// Maximum number of files to extract per archive
    #[arg(long, default_value = "10000")]
    pub max_files: usize,

    /// Maximum total extracted size per archive (K, M, G, T suffixes)
    #[arg(long, default_value = "2G", value_parser = parse_byte_size)]
    pub max_total_size: u64,

    /// Maximum single file size (K, M, G, T suffixes)
    #[arg(long, default_value = "512M", value_parser = parse_byte_size)]
    pub max_file_size: u64,

    /// Preserve file permissions from archive
    #[arg(long)]
    pub preserve_permissions: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("512M").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_byte_size("2G").unwrap(), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size("1T").unwrap(), 1024_u64.pow(4));
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
    }

    #[test]
    fn test_parse_byte_size_overflow() {
        assert!(parse_byte_size("18446744073709551615K").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_repeated_flags_collect_in_order() {
        let cli = Cli::try_parse_from([
            "unjar",
            "--urls",
            "http://example.com/a.jar",
            "--download-dirs=a",
            "--destination-dirs",
            "/data",
            "--urls=http://example.com/b.jar",
            "--download-dirs",
            "b",
            "--destination-dirs=/srv",
        ])
        .unwrap();

        assert_eq!(
            cli.urls,
            vec!["http://example.com/a.jar", "http://example.com/b.jar"]
        );
        assert_eq!(cli.download_dirs, vec!["a", "b"]);
        assert_eq!(
            cli.destination_dirs,
            vec![PathBuf::from("/data"), PathBuf::from("/srv")]
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["unjar"]).unwrap();

        assert!(cli.urls.is_empty());
        assert_eq!(cli.descriptor, "package.json");
        assert!(!cli.skip_descriptor);
        assert_eq!(cli.max_files, 10_000);
        assert_eq!(cli.max_total_size, 2 * 1024 * 1024 * 1024);
        assert_eq!(cli.max_file_size, 512 * 1024 * 1024);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["unjar", "-v", "-q"]).is_err());
    }
}
