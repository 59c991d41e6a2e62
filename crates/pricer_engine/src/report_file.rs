use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pricer_logging::pricer_info;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Stem of reports written without an explicit file name.
pub const EXPORT_STEM: &str = "exported-deck";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("invalid report file name '{0}'")]
    FileName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Formats a report can be exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Comma separated grid.
    Csv,
    /// Fixed-width table.
    Text,
    /// Plain card list that can be imported again.
    CardList,
}

impl ReportKind {
    pub fn extension(self) -> &'static str {
        match self {
            ReportKind::Csv => "csv",
            ReportKind::Text => "txt",
            ReportKind::CardList => "dec",
        }
    }

    /// `exported-deck_<stamp>.<ext>`, the name used when the user gave none.
    pub fn export_name(self, stamp: &str) -> String {
        format!("{EXPORT_STEM}_{stamp}.{}", self.extension())
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes reports into one directory through a temp file and a rename, so a
/// reader never sees a half-written report.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, PersistError> {
        // Bare names only; directories come from the writer.
        if Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
            return Err(PersistError::FileName(file_name.to_string()));
        }
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        pricer_info!("Wrote report {}", target.display());
        Ok(target)
    }
}
