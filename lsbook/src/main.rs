use color_eyre::eyre::Result;
use log::LevelFilter;
use lsbook::{
  BuildOptions,
  cli::{Cli, Commands},
  generate_book,
};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match cli.command {
    Commands::Build { book, output, jobs } => {
      generate_book(&BuildOptions { book, output, jobs })?;
    },
  }

  Ok(())
}
