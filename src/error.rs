//! Error types for wait-map operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("timed out waiting for key {0}")]
    WaitTimeout(i64),
}
