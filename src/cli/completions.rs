//! Shell completions generation.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use clap_complete::Shell;

use crate::error::{AtlasError, Result};

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            let mut file = File::create(path).map_err(|e| AtlasError::Io {
                path: path.clone(),
                message: format!("Failed to create completions file: {}", e),
            })?;
            write_completions(args.shell, &mut file)
        }
        None => write_completions(args.shell, &mut io::stdout()),
    }
}

fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = <super::Cli as clap::CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "atlasgen", out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_mention_commands() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("atlasgen"));
        assert!(script.contains("gauge"));
    }

    #[test]
    fn test_completions_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlasgen.bash");
        run(CompletionsArgs {
            shell: Shell::Bash,
            output: Some(path.clone()),
        })
        .unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
