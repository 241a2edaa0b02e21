//! Output writer
//!
//! Renders destination files and replaces files on disk atomically: contents
//! go to a hidden temporary sibling which is then renamed over the target.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{RelocateError, Result};
use crate::reindent::Fragment;
use crate::utils::{join_lines, LineEnding};

/// A generated test file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationFile {
    pub path: PathBuf,
    pub header: Vec<String>,
    pub fragments: Vec<Fragment>,
}

impl DestinationFile {
    /// Header, blank line, then each fragment followed by one blank line.
    ///
    /// The text ends with a single line ending.
    pub fn render(&self, ending: LineEnding) -> String {
        let mut lines: Vec<String> = self.header.clone();
        lines.push(String::new());
        for fragment in &self.fragments {
            lines.extend(fragment.lines.iter().cloned());
            lines.push(String::new());
        }
        lines.join(ending.as_str())
    }
}

fn write_failure(path: &Path) -> impl FnOnce(std::io::Error) -> RelocateError + '_ {
    move |source| RelocateError::WriteFailure {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.relocate.tmp"))
}

/// Write `contents` to `path` via a temporary file and rename.
///
/// Missing parent directories are created first.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_failure(parent))?;
    }

    let tmp_path = temp_path_for(path);
    {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(write_failure(&tmp_path))?;
        let written = file
            .write_all(contents.as_bytes())
            .and_then(|_| file.sync_all());
        if let Err(source) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_failure(&tmp_path)(source));
        }
    }

    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_failure(path)(source));
    }
    Ok(())
}

/// Write a rendered destination file
pub fn write_destination(dest: &DestinationFile, ending: LineEnding) -> Result<()> {
    write_atomic(&dest.path, &dest.render(ending))
}

/// Replace the original source file with its remainder lines, verbatim
pub fn write_remainder(
    path: &Path,
    remainder: &[String],
    ending: LineEnding,
    trailing_newline: bool,
) -> Result<()> {
    write_atomic(path, &join_lines(remainder, ending, trailing_newline))
}
