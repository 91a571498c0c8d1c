use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use streampack::compile::{self, command::CompileCommand, BuildOutputs};
use streampack::error::CompileError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // usage problems and -h/--help both terminate with the usage
    // status; the distinct status 2 belongs to the host capability gate
    let cmd = match CompileCommand::try_parse() {
        Ok(cmd) => cmd,
        Err(parse_error) => {
            let _ = parse_error.print();
            let usage = CompileError::Usage("malformed invocation".to_string());
            std::process::exit(usage.exit_code());
        }
    };

    debug!("parsed invocation: {:?}", cmd);

    match compile::run(cmd) {
        Ok(outputs) => report(&outputs),
        Err(compile_error) => {
            error!("build failed: {}", compile_error);
            eprintln!("{compile_error}");
            std::process::exit(compile_error.exit_code());
        }
    }
}

fn report(outputs: &BuildOutputs) {
    println!();
    println!("Build done, generated files:");
    println!("  {}", outputs.script_path.display());
    println!("  {}", outputs.archive_path.display());
    println!();
    println!(
        "If you re-built the job, make sure to check the modifications in {}.sh",
        outputs.job_name
    );
    println!();
    println!("Do not forget to chmod");
    println!("  {}.sh", outputs.job_name);
    println!("and");
    println!("  {}.phar", outputs.job_name);
    println!("to be executable before checking in.");
    println!();
}
