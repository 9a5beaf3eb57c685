pub mod arguments;
pub mod run;

use {
    anyhow::{Context, Result},
    arguments::Arguments,
    clap::Parser,
    std::{
        fs::File,
        io::{self, BufReader},
        process::ExitCode,
    },
};

/// Entry point of the binary. Exits with 0 when every document validated
/// and with 1 when any document was rejected or the input could not be read.
pub fn start(args: impl Iterator<Item = String>) -> ExitCode {
    let args = Arguments::parse_from(args);
    observe::tracing::initialize(&args.logging.config());
    tracing::info!("running validator with validated arguments:\n{}", args);

    match main(&args) {
        Ok(summary) if summary.success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(?err, "validation aborted");
            ExitCode::FAILURE
        }
    }
}

fn main(args: &Arguments) -> Result<run::Summary> {
    let stdout = io::stdout().lock();
    match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            run::run(args, BufReader::new(file), stdout)
        }
        None => run::run(args, io::stdin().lock(), stdout),
    }
}
