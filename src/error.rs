use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcqError {
    #[error("cannot access file: {0}")]
    FileAccess(String),

    #[error("invalid acquisition file: {0}")]
    FormatError(String),

    #[error("batch carries {actual} channel(s) but the recording declares {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("sample range [{start}, {end}] invalid for a channel holding {len} sample(s)")]
    OutOfRange {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("storage error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

pub type Result<T> = std::result::Result<T, AcqError>;
