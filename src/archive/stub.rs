//! Bootstrap stub generation
//!
//! The stub is the executable head of the archive: an interpreter
//! directive, the timezone and debug configuration decided at build
//! time, and the redirection into the archive-internal entry point.
//! Stub text is a pure function of `(timezone, debug)`.

/// Archive-internal path of the runtime entry point, bundled via the
/// library directory.
pub const RUNTIME_ENTRY: &str = "Streampack/_run.php";

/// Marker separating the stub from the archive payload.
pub const HALT_MARKER: &str = "__HALT_COMPILER(); ?>";

const INTERPRETER_MARKER: &str = "<?php";

/// Default self-executing stub: map the archive and hand control to
/// `entry` inside it.
pub fn default_stub(entry: &str) -> String {
    format!(
        "{INTERPRETER_MARKER}\n\
         Phar::mapPhar();\n\
         include 'phar://' . __FILE__ . '/{entry}';\n\
         {HALT_MARKER}\n"
    )
}

/// Assemble the bootstrap stub baked into a built archive.
///
/// The generated header (shebang, interpreter marker, timezone set,
/// debug define) is concatenated with the tail of the default stub,
/// everything after its leading interpreter marker.
pub fn bootstrap_stub(timezone: &str, debug: bool) -> String {
    let default = default_stub(RUNTIME_ENTRY);
    let tail = &default[INTERPRETER_MARKER.len()..];
    format!(
        "#!/usr/bin/env php\n\
         {INTERPRETER_MARKER}\n\
         date_default_timezone_set('{timezone}');\n\
         define('STREAMPACK_DEBUG', {debug});{tail}"
    )
}
