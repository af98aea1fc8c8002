use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use leaflet::Builder;
use leaflet::config::Settings;
use leaflet::error::Result;

mod flags;

fn run(flags: &flags::Quire) -> Result<usize> {
    let settings = Settings::discover(&flags.input, flags.config.as_deref())?;
    tracing::debug!(?settings, "loaded settings");

    let articles = Builder::new(&settings)?.build(&flags.input, &flags.output)?;
    Ok(articles.len())
}

pub fn main() -> ExitCode {
    let flags = flags::Quire::from_env_or_exit();

    let filter = if flags.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&flags) {
        Ok(articles) => {
            tracing::info!(articles, output = %flags.output.display(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error ({}): {e}", e.kind());
            ExitCode::FAILURE
        }
    }
}
