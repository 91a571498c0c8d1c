use clap::Parser;
use std::path::PathBuf;

/// Package a job directory into an executable archive plus the
/// launcher script submitting it as a streaming job.
#[derive(Parser, Debug)]
#[command(name = "streampack")]
#[command(about = "Package a streaming-job directory into an executable archive", long_about = None)]
pub struct CompileCommand {
    /// Build debug version of the package (with internal counters etc)
    #[arg(long)]
    pub debug: bool,

    /// PATH of a directory to package with the archive (can be repeated)
    #[arg(short = 'i', long = "include", value_name = "PATH")]
    pub include: Vec<PathBuf>,

    /// Name of the TIMEZONE to force in generated scripts; if not
    /// given, the timezone of this machine is used
    #[arg(short = 't', long = "timezone", value_name = "TIMEZONE")]
    pub timezone: Option<String>,

    /// Job directory to package
    #[arg(value_name = "JOBDIR")]
    pub job_dir: PathBuf,

    /// Directory receiving the generated archive and launcher script
    #[arg(value_name = "OUTPUTDIR")]
    pub output_dir: PathBuf,
}
