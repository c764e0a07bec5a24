use thiserror::Error;

use crate::block::MalformedBlockRecord;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Failed to fetch the latest block from any endpoint.")]
    AllEndpointsFailed { attempted: usize },

    #[error("Malformed block record: {0}")]
    MalformedBlockRecord(#[from] MalformedBlockRecord),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
