use latest_block::config::{Config, ConfigError};
use latest_block::error::ApplicationError;
use log::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // silent unless RUST_LOG asks for output; user-facing messages go to stdout
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        // --help, --version and usage errors are printed by clap itself
        Err(ConfigError::Clap(err)) => err.exit(),
        Err(err) => {
            println!("{}", ApplicationError::from(err));
            std::process::exit(1);
        }
    };
    debug!("using config {config:?}");

    if let Err(err) = latest_block::run(&config, &mut std::io::stdout()).await {
        debug!("{err:?}");
        println!("{err}");
        std::process::exit(1);
    }
}
