//! Build configuration resolved from invocation inputs
//!
//! All knobs of one build live here: the extra include paths, the
//! timezone baked into the bootstrap stub, the debug flag, and the
//! location of the runtime-library directory that is bundled first
//! into every archive.

use std::env;
use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::{CompileError, Result};

/// Environment variable overriding the runtime-library directory.
pub const LIB_DIR_VAR: &str = "STREAMPACK_LIB";

/// Resolved configuration for one build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Additional directories bundled after the job directory, in the
    /// order given.
    pub include_paths: Vec<PathBuf>,
    /// IANA timezone name baked into the bootstrap stub.
    pub timezone: String,
    /// Whether the generated stub enables the debug flag.
    pub debug: bool,
    /// Runtime-library directory bundled first into every archive.
    pub lib_dir: PathBuf,
}

impl BuildConfig {
    /// Resolve configuration from the parsed flags.
    ///
    /// An absent timezone falls back to the host timezone; either way
    /// the name must construct a real timezone before any archive is
    /// written.
    pub fn resolve(
        include_paths: Vec<PathBuf>,
        timezone: Option<String>,
        debug: bool,
    ) -> Result<Self> {
        let timezone = match timezone {
            Some(name) => name,
            None => host_timezone()?,
        };
        validate_timezone(&timezone)?;
        Ok(Self {
            include_paths,
            timezone,
            debug,
            lib_dir: lib_dir()?,
        })
    }
}

/// Check that `name` constructs a real timezone.
pub fn validate_timezone(name: &str) -> Result<()> {
    name.parse::<Tz>()
        .map(|_| ())
        .map_err(|_| CompileError::Input(format!("Invalid timezone '{name}'.")))
}

/// IANA name of the host's current timezone.
fn host_timezone() -> Result<String> {
    iana_time_zone::get_timezone().map_err(|error| {
        CompileError::Input(format!("Cannot determine the host timezone: {error}."))
    })
}

/// Runtime-library directory: the [`LIB_DIR_VAR`] override when set,
/// else `lib/` next to the directory holding the running executable.
fn lib_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var(LIB_DIR_VAR) {
        return Ok(PathBuf::from(path));
    }
    let exe = env::current_exe()?;
    let exe_dir = exe.parent().ok_or_else(|| {
        CompileError::Input("Cannot locate the runtime library directory.".to_string())
    })?;
    Ok(exe_dir.join("..").join("lib"))
}
