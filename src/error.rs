use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("db error: {0}")]
    Db(#[from] StorageError),
    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
