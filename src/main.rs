use std::{env, path::PathBuf, sync::Arc};

use env_logger::Env;
use tagcall::{
    cli::parse_cli,
    cmds,
    config::{self, ConfigProperties},
    github::Github,
    http::{
        interceptor::{AccessTokenInterceptor, LoggingInterceptor, MediaTypeInterceptor},
        Client,
    },
    Result,
};

fn main() -> Result<()> {
    let cli_args = parse_cli();
    if cli_args.verbose {
        let env = Env::default().default_filter_or("info");
        env_logger::init_from_env(env);
    }
    let home_dir = env::var_os("HOME").map(PathBuf::from);
    let config_file = cli_args.config_path(home_dir.as_deref())?;
    let config = config::read_config(&config_file, &cli_args.overrides)?;

    // Logging goes last so it sees the request as it is sent.
    let client = Client::new(&config)
        .with_interceptor(MediaTypeInterceptor)
        .with_interceptor(AccessTokenInterceptor)
        .with_interceptor(LoggingInterceptor);
    let github = Github::new(&config, Arc::new(client))?;
    cmds::repositories::execute(Arc::new(github), config.username(), std::io::stdout())
}
