use std::path::{Path, PathBuf};

use clap::Parser;

use crate::{api_defaults::CONFIG_PATH, config::Overrides, error, Result};

#[derive(Parser)]
#[command(about = "Lists the public and the authenticated GitHub repositories of a user")]
struct Args {
    /// Path to the config file. Defaults to $HOME/.config/tagcall/config.toml
    #[clap(long, short)]
    pub config: Option<PathBuf>,
    /// GitHub username. Overrides the config file and GITHUB_USERNAME
    #[clap(long, short)]
    pub username: Option<String>,
    /// Base URL of the REST API, e.g. https://github.example.com/api/v3
    #[clap(long, value_name = "URL")]
    pub base_url: Option<String>,
    /// Verbose logging
    #[clap(long, short)]
    pub verbose: bool,
}

pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub overrides: Overrides,
    pub verbose: bool,
}

impl CliArgs {
    /// Config file given on the command line or the default one under
    /// `home`.
    pub fn config_path(&self, home: Option<&Path>) -> Result<PathBuf> {
        match (&self.config, home) {
            (Some(path), _) => Ok(path.clone()),
            (None, Some(home)) => Ok(home.join(CONFIG_PATH)),
            (None, None) => Err(error::gen(
                "Cannot locate the config file: HOME is not set. Use --config",
            )),
        }
    }
}

impl From<Args> for CliArgs {
    fn from(args: Args) -> Self {
        CliArgs {
            config: args.config,
            overrides: Overrides {
                username: args.username,
                base_url: args.base_url,
            },
            verbose: args.verbose,
        }
    }
}

pub fn parse_cli() -> CliArgs {
    Args::parse().into()
}
