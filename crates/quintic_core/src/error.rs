use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a run. All variants except `Write` are raised
/// during setup, before the first record is produced.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to allocate {buffer} buffer of dimension {dim}")]
    Allocation {
        buffer: &'static str,
        dim: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to create output file {}", path.display())]
    CreateSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write result record")]
    Write(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
