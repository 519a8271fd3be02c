//! Config command - show the effective configuration

use crate::cli::output::{colors, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::tokenizer::jieba_available;
use clap::Args;
use std::sync::Arc;

/// Arguments for the show-config command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

/// Execute the show-config command
///
/// Human output is valid TOML and can be saved as a config file.
pub fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = services.config.as_ref();

    match format {
        OutputFormat::Human => {
            println!(
                "{}",
                colors::dim(&format!(
                    "# index: {} | jieba compiled in: {}",
                    config.index_dir().display(),
                    jieba_available()
                ))
            );
            print!("{}", toml::to_string_pretty(config)?);
        }
        OutputFormat::Json => print_json(config)?,
    }

    Ok(())
}
