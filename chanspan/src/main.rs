use std::fs;

use chanspan::{
  cli::{Cli, Commands},
  render::{self, RenderOptions},
};
use chanspan_config::{Config, ConfigFormat};
use color_eyre::eyre::{Context, Result};
use log::{LevelFilter, info};

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
    Commands::Init {
      output,
      format,
      force,
    } => {
      let format: ConfigFormat = format.parse()?;

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::write_default(format, &output, force).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;
      Ok(())
    },

    Commands::Render {
      input,
      output,
      jobs,
      archives,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      render::run(&config, &RenderOptions {
        input,
        output,
        jobs,
        archives,
      })
    },
  }
}
