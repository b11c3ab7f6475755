//! Store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store API error: {0}")]
    Api(String),

    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_dynamo::Error),

    #[error("timed out waiting for table '{0}' to become active")]
    TableNotReady(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
