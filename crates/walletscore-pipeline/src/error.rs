//! Pipeline error type.

use std::path::PathBuf;

use thiserror::Error;
use walletscore_core::error::{InputError, ModelError, ScoreError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config: {0}")]
    Config(String),

    #[error("no input file configured")]
    MissingInput,
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<InputError> for PipelineError {
    fn from(e: InputError) -> Self {
        Self::Score(ScoreError::Input(e))
    }
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        Self::Score(ScoreError::Model(e))
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
