// SPDX-License-Identifier: MPL-2.0
use crate::domain::error::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config Error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("Config Error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Engine Error: {0}")]
    Engine(#[from] EngineError),
    #[error("Capture Error: {0}")]
    Capture(#[from] image_rs::ImageError),
    #[error("Scenario Error: {0}")]
    Scenario(String),
}

pub type Result<T> = std::result::Result<T, Error>;
