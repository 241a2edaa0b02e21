//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{DelimiterMode, RelocatorConfig};
use crate::error::Result;

/// Move inline `#[cfg(test)]` blocks into a mirrored tests/ tree
#[derive(Parser, Debug)]
#[command(name = "test-relocator")]
#[command(about = "Relocates inline annotated test blocks into separate test files")]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Directory to scan for source files
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Root of the generated test tree
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "TEST_RELOCATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Crate name used in generated imports (default: read from Cargo.toml)
    #[arg(long)]
    pub crate_name: Option<String>,

    /// Report what would be relocated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Count delimiters in raw text, including inside strings and comments
    #[arg(long)]
    pub raw_delimiters: bool,

    /// Only move annotated test functions, dropping helper items
    #[arg(long)]
    pub tests_only: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Show debug logging and files without a test block
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per file plus a summary
    #[default]
    Text,
    /// JSON - full run report
    Json,
}

impl Cli {
    /// Load the config file (if any) and apply command line overrides
    pub fn to_config(&self) -> Result<RelocatorConfig> {
        let mut config = match &self.config {
            Some(path) => RelocatorConfig::load(path)?,
            None => RelocatorConfig::default(),
        };

        if let Some(root) = &self.root {
            config.source_root = root.clone();
        }
        if let Some(dest) = &self.dest {
            config.dest_root = dest.clone();
        }
        if let Some(name) = &self.crate_name {
            config.crate_name = Some(name.replace('-', "_"));
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.raw_delimiters {
            config.delimiters = DelimiterMode::Raw;
        }
        if self.tests_only {
            config.keep_support = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["test-relocator"]);
        let config = cli.to_config().unwrap();
        assert_eq!(config, RelocatorConfig::default());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "test-relocator",
            "programs/betting_platform/src",
            "--dest",
            "programs/betting_platform/tests",
            "--crate-name",
            "betting-platform",
            "--dry-run",
            "--raw-delimiters",
            "--tests-only",
            "--format",
            "json",
        ]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.source_root, PathBuf::from("programs/betting_platform/src"));
        assert_eq!(config.dest_root, PathBuf::from("programs/betting_platform/tests"));
        assert_eq!(config.crate_name.as_deref(), Some("betting_platform"));
        assert!(config.dry_run);
        assert_eq!(config.delimiters, DelimiterMode::Raw);
        assert!(!config.keep_support);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relocator.toml");
        std::fs::write(&path, "dest_root = \"spec\"\nindent_width = 2\n").unwrap();

        let cli = Cli::parse_from([
            "test-relocator",
            "--config",
            path.to_str().unwrap(),
            "--dest",
            "out",
        ]);
        let config = cli.to_config().unwrap();
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.dest_root, PathBuf::from("out"));
    }
}
