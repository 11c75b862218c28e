use atlasgen::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => atlasgen::cli::build::run(args)?,
        Commands::Gauge(args) => atlasgen::cli::gauge::run(args)?,
        Commands::Validate(args) => atlasgen::cli::validate::run(args)?,
        Commands::Completions(args) => atlasgen::cli::completions::run(args)?,
    }

    Ok(())
}
