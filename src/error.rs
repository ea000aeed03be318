// Startup error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("ROM image {name} has {actual:#06X} bytes, expected {expected:#06X}")]
    RomSize {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown ROM image {0}")]
    UnknownRom(String),

    #[error("ROM blob has {actual:#07X} bytes, expected {expected:#07X}")]
    RomBlobSize { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
