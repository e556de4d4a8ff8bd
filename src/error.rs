use thiserror::Error;

use crate::translation::MappingError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Double pinyin schema '{0}' not found in table")]
    UnknownSchema(String),
    #[error("Invalid translation mapping: {0}")]
    Mapping(#[from] MappingError),
}

pub type Result<T> = std::result::Result<T, Error>;
