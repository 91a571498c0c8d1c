//! The end-to-end compile operation
//!
//! Strictly linear: validate the invocation, build the archive,
//! derive the role arguments, render the launcher, write both
//! artifacts. Validation completes before any output file is created,
//! and the archive itself is committed atomically, so every failure
//! path leaves the output directory without a partial artifact.

pub mod command;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::archive::{self, stub, ArchiveBuilder};
use crate::args::derive_role_arguments;
use crate::compile::command::CompileCommand;
use crate::config::BuildConfig;
use crate::error::{CompileError, Result};
use crate::job::JobDir;

/// Paths of the two generated artifacts.
#[derive(Debug)]
pub struct BuildOutputs {
    pub job_name: String,
    pub archive_path: PathBuf,
    pub script_path: PathBuf,
}

/// Run one compile invocation end to end.
pub fn run(cmd: CompileCommand) -> Result<BuildOutputs> {
    // the host gate comes before any filesystem mutation
    if !archive::can_write() {
        return Err(CompileError::Environment(format!(
            "Archive write mode not allowed; unset {} in the environment.",
            archive::READONLY_VAR
        )));
    }

    let job = JobDir::open(&cmd.job_dir)?;
    let output_dir = open_output_dir(&cmd.output_dir)?;
    let config = BuildConfig::resolve(cmd.include, cmd.timezone, cmd.debug)?;

    debug!(
        "validated inputs: job '{}', timezone {}, debug={}",
        job.name(),
        config.timezone,
        config.debug
    );

    let archive_path = output_dir.join(format!("{}.phar", job.name()));
    let script_path = output_dir.join(format!("{}.sh", job.name()));

    build_archive(&archive_path, &job, &config)?;

    let caps = job.capabilities()?;
    let artifact = format!("{}.phar", job.name());
    let role_args = derive_role_arguments(&caps, &artifact);
    let script = templates::render_launcher(job.name(), &role_args.render());
    fs::write(&script_path, script)?;

    info!(
        "build complete: {} and {}",
        archive_path.display(),
        script_path.display()
    );

    Ok(BuildOutputs {
        job_name: job.name().to_string(),
        archive_path,
        script_path,
    })
}

/// Validate the output directory: it must exist, be a directory, and
/// accept new files (probed with an unnamed temporary file).
fn open_output_dir(path: &Path) -> Result<PathBuf> {
    let unusable = || {
        CompileError::Input(format!(
            "Output directory '{}' not found or not writable.",
            path.display()
        ))
    };
    let canonical = fs::canonicalize(path).map_err(|_| unusable())?;
    if !canonical.is_dir() {
        return Err(unusable());
    }
    tempfile::tempfile_in(&canonical).map_err(|_| unusable())?;
    Ok(canonical)
}

/// Build the executable archive: library directory first, then the
/// job directory, then the extra include paths in the order given.
fn build_archive(archive_path: &Path, job: &JobDir, config: &BuildConfig) -> Result<()> {
    let mut builder = ArchiveBuilder::open(archive_path);
    builder.set_bootstrap(stub::bootstrap_stub(&config.timezone, config.debug));

    let mut roots = Vec::with_capacity(config.include_paths.len() + 2);
    roots.push(config.lib_dir.clone());
    roots.push(job.path().to_path_buf());
    roots.extend(config.include_paths.iter().cloned());

    for root in &roots {
        let resolved = fs::canonicalize(root).map_err(|_| {
            CompileError::Input(format!(
                "Package directory '{}' not found.",
                root.display()
            ))
        })?;
        builder.add_tree(&resolved)?;
    }

    builder.commit()?;
    Ok(())
}
