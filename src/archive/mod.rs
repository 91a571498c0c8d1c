//! Executable-archive construction
//!
//! A narrow builder interface over the container format: open a
//! builder, stage directory trees filtered by the bundling predicate,
//! set the bootstrap stub, commit. Staged entries become visible only
//! at commit, which streams stub plus gzipped tar payload through a
//! temporary file in the target directory and renames it into place.
//! A failure at any point during the build leaves nothing at the
//! final path.

pub mod filter;
pub mod stub;

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{CompileError, Result};

/// Environment variable disabling archive writes on the host.
pub const READONLY_VAR: &str = "STREAMPACK_ARCHIVE_READONLY";

/// Whether the host permits writing archives.
///
/// Checked before any filesystem mutation; a truthy value in
/// [`READONLY_VAR`] turns every build into an environment error.
pub fn can_write() -> bool {
    match env::var(READONLY_VAR) {
        Ok(value) => !matches!(
            value.to_ascii_lowercase().as_str(),
            "1" | "true" | "on"
        ),
        Err(_) => true,
    }
}

/// One staged entry: archive-internal path plus its source file.
struct StagedEntry {
    archive_path: String,
    source: PathBuf,
}

/// Buffered builder for a single executable archive.
pub struct ArchiveBuilder {
    path: PathBuf,
    bootstrap: String,
    entries: Vec<StagedEntry>,
    index: HashMap<String, usize>,
}

impl ArchiveBuilder {
    /// Open a builder targeting `path`. Nothing touches the
    /// filesystem until [`commit`](Self::commit).
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            bootstrap: stub::default_stub(stub::RUNTIME_ENTRY),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Replace the default bootstrap stub with `text`.
    pub fn set_bootstrap(&mut self, text: String) {
        self.bootstrap = text;
    }

    /// Stage every bundleable file under `root`.
    ///
    /// Hidden subtrees are pruned during the walk and every staged
    /// path re-checked against the bundling predicate. Entries are
    /// keyed by root-relative path; a later add of an already staged
    /// path replaces the earlier source in place, so the first
    /// occurrence keeps its position in the payload.
    pub fn add_tree(&mut self, root: &Path) -> Result<()> {
        let mut staged = 0usize;
        let walk = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_name().to_string_lossy().starts_with('.')
            });
        for entry in walk {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(root) {
                Ok(relative) => relative,
                Err(_) => continue,
            };
            let archive_path = relative.to_string_lossy().replace('\\', "/");
            if !filter::is_bundled_path(&archive_path) {
                trace!("skipping hidden entry {archive_path}");
                continue;
            }
            self.stage(archive_path, entry.path().to_path_buf());
            staged += 1;
        }
        debug!("staged {} files from {}", staged, root.display());
        Ok(())
    }

    fn stage(&mut self, archive_path: String, source: PathBuf) {
        if let Some(&position) = self.index.get(&archive_path) {
            self.entries[position].source = source;
            return;
        }
        self.index.insert(archive_path.clone(), self.entries.len());
        self.entries.push(StagedEntry {
            archive_path,
            source,
        });
    }

    /// Write the archive: bootstrap stub, then the gzipped tar
    /// payload, staged through a temporary file next to the final
    /// path and persisted in one rename.
    pub fn commit(self) -> Result<PathBuf> {
        let target_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut staging = NamedTempFile::new_in(target_dir)?;
        staging.write_all(self.bootstrap.as_bytes())?;

        let encoder = GzEncoder::new(&mut staging, Compression::default());
        let mut payload = tar::Builder::new(encoder);
        for entry in &self.entries {
            let mut file = File::open(&entry.source)?;
            payload.append_file(Path::new(&entry.archive_path), &mut file)?;
        }
        payload.into_inner()?.finish()?;

        staging
            .persist(&self.path)
            .map_err(|error| CompileError::Io(error.error))?;
        debug!(
            "committed {} entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_nothing_written_before_commit() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("job.phar");
        let builder = ArchiveBuilder::open(&target);
        drop(builder);
        assert!(!target.exists());
    }

    #[test]
    fn test_commit_writes_stub_first() {
        let source = TempDir::new().unwrap();
        touch(&source.path().join("Mapper.php"), "<?php");
        let out = TempDir::new().unwrap();
        let target = out.path().join("job.phar");

        let mut builder = ArchiveBuilder::open(&target);
        builder.set_bootstrap("#!stub\n".to_string());
        builder.add_tree(source.path()).unwrap();
        builder.commit().unwrap();

        let bytes = fs::read(&target).unwrap();
        assert!(bytes.starts_with(b"#!stub\n"));
        assert!(bytes.len() > "#!stub\n".len());
    }

    #[test]
    fn test_hidden_trees_are_pruned() {
        let source = TempDir::new().unwrap();
        touch(&source.path().join("a/b.txt"), "b");
        touch(&source.path().join("a/.git/x"), "x");
        let out = TempDir::new().unwrap();

        let mut builder = ArchiveBuilder::open(&out.path().join("job.phar"));
        builder.add_tree(source.path()).unwrap();
        let staged: Vec<&str> = builder
            .entries
            .iter()
            .map(|entry| entry.archive_path.as_str())
            .collect();
        assert_eq!(staged, vec!["a/b.txt"]);
    }

    #[test]
    fn test_later_add_replaces_same_archive_path() {
        let first = TempDir::new().unwrap();
        touch(&first.path().join("shared.txt"), "first");
        let second = TempDir::new().unwrap();
        touch(&second.path().join("shared.txt"), "second");
        let out = TempDir::new().unwrap();

        let mut builder = ArchiveBuilder::open(&out.path().join("job.phar"));
        builder.add_tree(first.path()).unwrap();
        builder.add_tree(second.path()).unwrap();
        assert_eq!(builder.entries.len(), 1);
        assert_eq!(builder.entries[0].source, second.path().join("shared.txt"));
    }

    #[test]
    fn test_missing_source_root_is_an_error() {
        let out = TempDir::new().unwrap();
        let mut builder = ArchiveBuilder::open(&out.path().join("job.phar"));
        let missing = out.path().join("does-not-exist");
        assert!(builder.add_tree(&missing).is_err());
    }

    #[test]
    fn test_readonly_gate_parses_truthy_values() {
        // can_write() reads the process environment, so exercise the
        // value parsing through a scoped variable
        env::set_var(READONLY_VAR, "ON");
        assert!(!can_write());
        env::set_var(READONLY_VAR, "0");
        assert!(can_write());
        env::remove_var(READONLY_VAR);
        assert!(can_write());
    }
}
