use std::ffi::OsString;
use std::time::Duration;

use clap::{App, Arg};
use thiserror::Error;

pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://eth.llamarpc.com",
    "https://ethereum.publicnode.com",
    "https://rpc.ankr.com/eth",
];
pub const DEFAULT_ENDPOINT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Clap(#[from] clap::Error),

    #[error("invalid endpoint timeout {value:?}: expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tried strictly in this order.
    pub endpoints: Vec<String>,
    pub endpoint_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            endpoint_timeout: Duration::from_secs(DEFAULT_ENDPOINT_TIMEOUT_SECONDS),
        }
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("latest-block")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fetches the latest Ethereum block from the first responsive RPC endpoint")
        .arg(Arg::with_name("ENDPOINT")
            .long("endpoint")
            .short("e")
            .value_name("URL")
            .help("JSON-RPC endpoint to try; repeat to build an ordered fallback list")
            .takes_value(true)
            .multiple(true)
            .number_of_values(1))
        .arg(Arg::with_name("TIMEOUT")
            .long("timeout")
            .short("t")
            .value_name("SECONDS")
            .help("Per-endpoint request timeout in seconds")
            .takes_value(true))
}

impl Config {
    /// Builds the config from command line arguments, the first one being the binary name.
    /// With no options the defaults are used unchanged.
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = app().get_matches_from_safe(args)?;
        let mut config = Self::default();

        if let Some(endpoints) = matches.values_of("ENDPOINT") {
            config.endpoints = endpoints.map(str::to_owned).collect();
        }

        if let Some(timeout) = matches.value_of("TIMEOUT") {
            let seconds = match timeout.parse::<u64>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        value: timeout.to_owned(),
                    })
                }
            };
            config.endpoint_timeout = Duration::from_secs(seconds);
        }

        Ok(config)
    }
}
