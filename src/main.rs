use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod matching;
mod metadata;
mod parsing;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("alignment_evaluator=debug,info")
    } else {
        EnvFilter::new("alignment_evaluator=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Evaluate(args) => {
            cli::evaluate::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Metadata(args) => {
            cli::metadata::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
