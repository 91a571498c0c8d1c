//! Job-directory conventions and capability detection
//!
//! A job directory is read-only input: a directory whose
//! conventionally named files decide how the packaged job is wired.
//! One scan produces a [`JobCapabilities`] snapshot; everything
//! downstream of the scan is pure.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CompileError, Result};

/// Name of the optional argument-override file.
pub const OVERRIDE_FILE: &str = "ARGUMENTS";

/// A validated, canonicalized job directory.
#[derive(Debug, Clone)]
pub struct JobDir {
    path: PathBuf,
    name: String,
}

impl JobDir {
    /// Canonicalize and validate `path` as a readable job directory.
    pub fn open(path: &Path) -> Result<Self> {
        let unusable = || {
            CompileError::Input(format!(
                "Input directory '{}' not found or not readable.",
                path.display()
            ))
        };
        let canonical = fs::canonicalize(path).map_err(|_| unusable())?;
        if !canonical.is_dir() {
            return Err(unusable());
        }
        // listing the directory doubles as the readability probe
        fs::read_dir(&canonical).map_err(|_| unusable())?;
        let name = canonical
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(unusable)?;
        Ok(Self {
            path: canonical,
            name,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the directory, used as the artifact stem.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scan the directory once for conventional entry files.
    ///
    /// Entry points are matched by file stem regardless of extension;
    /// the override file is matched by exact name and its contents
    /// read and trimmed here, so callers never touch the filesystem
    /// again.
    pub fn capabilities(&self) -> Result<JobCapabilities> {
        let mut caps = JobCapabilities::default();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if file_name == OVERRIDE_FILE {
                let contents = fs::read_to_string(entry.path())?;
                caps.override_args = Some(contents.trim().to_string());
                continue;
            }
            match entry_stem(&file_name) {
                Some("Reducer") => caps.has_reducer = true,
                Some("Combiner") => caps.has_combiner = true,
                _ => {}
            }
        }
        debug!(
            "detected capabilities for '{}': reducer={} combiner={} override={}",
            self.name,
            caps.has_reducer,
            caps.has_combiner,
            caps.override_args.is_some()
        );
        Ok(caps)
    }
}

/// Entry-point capabilities detected in a job directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobCapabilities {
    pub has_reducer: bool,
    pub has_combiner: bool,
    /// Trimmed contents of the override file, when present.
    pub override_args: Option<String>,
}

fn entry_stem(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
}
