use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for lsbook
#[derive(Parser, Debug)]
#[command(author, version, about = "LsBook: static HTML books from markdown")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Build the book into static HTML.
  Build {
    /// Book directory containing SUMMARY.md and book.json.
    #[arg(default_value = ".")]
    book: PathBuf,

    /// Output directory. Defaults to `_book` inside the book directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of threads used to render pages.
    #[arg(short, long)]
    jobs: Option<usize>,
  },
}

impl Cli {
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn build_defaults() {
    let cli = Cli::try_parse_from(["lsbook", "build"]).expect("parses");
    assert!(!cli.verbose);
    let Commands::Build { book, output, jobs } = cli.command;
    assert_eq!(book, PathBuf::from("."));
    assert_eq!(output, None);
    assert_eq!(jobs, None);
  }

  #[test]
  fn build_with_arguments() {
    let cli = Cli::try_parse_from([
      "lsbook", "build", "docs", "-o", "site", "--jobs", "4", "-v",
    ])
    .expect("parses");
    assert!(cli.verbose);
    let Commands::Build { book, output, jobs } = cli.command;
    assert_eq!(book, PathBuf::from("docs"));
    assert_eq!(output, Some(PathBuf::from("site")));
    assert_eq!(jobs, Some(4));
  }

  #[test]
  fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["lsbook"]).is_err());
  }
}
