//! Relocator configuration
//!
//! Every field has a default matching Rust's inline test convention, so an
//! empty (or absent) TOML file is a valid configuration:
//!
//! ```toml
//! source_root = "programs/betting_platform/src"
//! dest_root = "programs/betting_platform/tests"
//! crate_name = "betting_platform"
//! delimiters = "lexical"
//!
//! [markers]
//! function = ["#[test]", "#[tokio::test]"]
//!
//! [[imports]]
//! kind = "math"
//! path_prefix = "math"
//! uses = ["fixed::types::U64F64"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RelocateError, Result};

/// How opening and closing delimiters are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterMode {
    /// Skip delimiters inside comments, strings and char literals
    #[default]
    Lexical,
    /// Count every delimiter character in the raw text
    Raw,
}

/// Textual conventions that identify test blocks and test functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Block-level marker preceding the test container
    pub block: String,
    /// Declaration of the conventional test container
    pub container: String,
    /// Lines after the marker searched for the container declaration
    pub lookahead: usize,
    /// Function-level markers preceding individual tests
    pub function: Vec<String>,
    /// Keyword that must appear in a fragment for it to count as a function
    pub function_keyword: String,
    pub open: char,
    pub close: char,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            block: "#[cfg(test)]".to_string(),
            container: "mod tests".to_string(),
            lookahead: 2,
            function: vec!["#[test]".to_string(), "#[tokio::test]".to_string()],
            function_keyword: "fn ".to_string(),
            open: '{',
            close: '}',
        }
    }
}

/// One row of the ambient import table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportProfile {
    /// Name of the module kind this profile applies to
    pub kind: String,
    /// Module path prefix (`math::lookup_tables` style, `/` also accepted).
    /// `None` marks a profile that only applies as the fallback.
    #[serde(default)]
    pub path_prefix: Option<String>,
    /// Use paths imported into every generated file of this kind
    #[serde(default)]
    pub uses: Vec<String>,
}

/// Kind name of the fallback import profile
pub const DEFAULT_IMPORT_KIND: &str = "default";

/// Built-in ambient imports for on-chain program sources
pub fn default_import_profiles() -> Vec<ImportProfile> {
    vec![ImportProfile {
        kind: DEFAULT_IMPORT_KIND.to_string(),
        path_prefix: None,
        uses: vec![
            "solana_program::clock::Clock".to_string(),
            "solana_program::program_error::ProgramError".to_string(),
            "solana_program::pubkey::Pubkey".to_string(),
        ],
    }]
}

/// Complete relocator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelocatorConfig {
    /// Directory scanned for source files
    pub source_root: PathBuf,
    /// Root of the mirrored test tree
    pub dest_root: PathBuf,
    /// Crate name used in generated `use` paths (detected from Cargo.toml if unset)
    pub crate_name: Option<String>,
    /// Source file extension, without the dot
    pub extension: String,
    /// Directory names skipped directly under the scan root
    pub skip_dirs: Vec<String>,
    /// Base names that stand for their parent directory's module
    pub index_names: Vec<String>,
    pub namespace_separator: String,
    /// Appended to the destination file's base name
    pub dest_suffix: String,
    /// Fallback width of one indentation level
    pub indent_width: usize,
    pub delimiters: DelimiterMode,
    /// Carry unannotated helper items along with the tests
    pub keep_support: bool,
    /// Report what would happen without writing
    pub dry_run: bool,
    pub markers: Markers,
    pub imports: Vec<ImportProfile>,
}

impl Default for RelocatorConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            dest_root: PathBuf::from("tests"),
            crate_name: None,
            extension: "rs".to_string(),
            skip_dirs: vec!["target".to_string(), "node_modules".to_string()],
            index_names: vec!["mod".to_string(), "lib".to_string(), "main".to_string()],
            namespace_separator: "::".to_string(),
            dest_suffix: "_tests".to_string(),
            indent_width: 4,
            delimiters: DelimiterMode::Lexical,
            keep_support: true,
            dry_run: false,
            markers: Markers::default(),
            imports: default_import_profiles(),
        }
    }
}

impl RelocatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RelocateError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| RelocateError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| {
            Err(RelocateError::Config {
                message: message.to_string(),
            })
        };

        if self.extension.is_empty() || self.extension.starts_with('.') {
            return fail("extension must be non-empty and given without a leading dot");
        }
        if self.indent_width == 0 {
            return fail("indent_width must be at least 1");
        }
        if self.markers.block.is_empty() || self.markers.container.is_empty() {
            return fail("markers.block and markers.container must be non-empty");
        }
        if self.markers.function.iter().all(|m| m.is_empty()) {
            return fail("markers.function needs at least one non-empty marker");
        }
        if self.markers.open == self.markers.close {
            return fail("markers.open and markers.close must differ");
        }
        if self.dest_suffix.is_empty() {
            return fail("dest_suffix must be non-empty");
        }
        if let Some(name) = &self.crate_name {
            if name.is_empty() || name.contains('-') {
                return fail("crate_name must be a non-empty Rust identifier");
            }
        }
        Ok(())
    }

    /// Crate name for generated imports: configured value or nearest Cargo.toml
    pub fn resolve_crate_name(&self) -> Result<String> {
        if let Some(name) = &self.crate_name {
            return Ok(name.clone());
        }
        detect_crate_name(&self.source_root).ok_or_else(|| RelocateError::Config {
            message: format!(
                "no crate name configured and no Cargo.toml found above {}",
                self.source_root.display()
            ),
        })
    }
}

/// Find the package name in the nearest `Cargo.toml` at or above `start`.
///
/// Dashes are converted to underscores, matching how the crate is named in
/// `use` paths.
pub fn detect_crate_name(start: &Path) -> Option<String> {
    let start = start.canonicalize().ok()?;
    start.ancestors().find_map(|dir| {
        let manifest = fs::read_to_string(dir.join("Cargo.toml")).ok()?;
        let value: toml::Value = toml::from_str(&manifest).ok()?;
        let name = value.get("package")?.get("name")?.as_str()?;
        Some(name.replace('-', "_"))
    })
}
