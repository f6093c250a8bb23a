use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for chanspan
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "chanspan: imageboard post HTML to styled text spans"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, e.g.
  /// `parser.enable_emoji=true`, can be used multiple times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the chanspan CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new chanspan configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "chanspan.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Parse posts from a JSON file and print them as styled spans.
  Render {
    /// JSON file holding one post or an array of posts. Use `-` for stdin.
    input: PathBuf,

    /// Where to write the parsed posts. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads to use for parallel processing.
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Archive domain whose posts use the standard rules (can be specified
    /// multiple times)
    #[arg(short, long = "archive", action = clap::ArgAction::Append)]
    archives: Vec<String>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_render_arguments() {
    let cli = Cli::try_parse_from([
      "chanspan",
      "-v",
      "--config",
      "parser.anonymize=true",
      "render",
      "posts.json",
      "-j",
      "4",
      "--archive",
      "archive.example",
      "--archive",
      "other.example",
    ])
    .expect("arguments should parse");

    assert!(cli.verbose);
    assert_eq!(cli.config_overrides, vec!["parser.anonymize=true"]);
    assert!(matches!(
      cli.command,
      Commands::Render {
        ref input,
        output: None,
        jobs: Some(4),
        ref archives,
      } if input == &PathBuf::from("posts.json")
        && archives == &["archive.example", "other.example"]
    ));
  }

  #[test]
  fn test_init_defaults() {
    let cli = Cli::try_parse_from(["chanspan", "init"]).expect("init parses");

    assert!(matches!(
      cli.command,
      Commands::Init { ref output, ref format, force: false }
        if output == &PathBuf::from("chanspan.toml") && format == "toml"
    ));
    assert!(Cli::try_parse_from(["chanspan", "init", "-F", "yaml"]).is_err());
  }
}
