pub mod build;
pub mod completions;
pub mod gauge;
pub mod validate;

use clap::{Parser, Subcommand};

/// atlasgen - grid atlas compositing for UI textures
#[derive(Parser, Debug)]
#[command(name = "atlasgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate atlases from config files
    Build(build::BuildArgs),

    /// Resize a layered gauge sheet
    Gauge(gauge::GaugeArgs),

    /// Validate atlas configs without rendering
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_gauge_sizes() {
        let cli = Cli::try_parse_from([
            "atlasgen", "gauge", "bar.tga", "--size", "120x64", "-s", "150x32",
        ])
        .unwrap();
        match cli.command {
            Commands::Gauge(args) => assert_eq!(args.sizes, vec!["120x64", "150x32"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from(["atlasgen", "build", "--all", "ui", "--json", "--no-write"])
            .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert!(args.configs.is_empty());
                assert!(args.json && args.no_write);
                assert_eq!(args.all, Some(std::path::PathBuf::from("ui")));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_report_needs_written_atlas() {
        let err = Cli::try_parse_from(["atlasgen", "build", "atlas.yaml", "--report", "--no-write"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
