use std::io;

/// Failure reasons for [`crate::Image::open_path`] / [`crate::Image::open_bytes`].
///
/// Per-directory queries never return an error: a malformed or missing
/// directory is simply absent (`None`). `PeError` only covers the handful
/// of conditions that prevent an [`crate::Image`] from being constructed at
/// all.
#[derive(Debug, thiserror::Error)]
pub enum PeError {
    #[error("failed to open or read file: {0}")]
    Io(#[from] io::Error),

    #[error("buffer is smaller than the DOS header ({0} bytes)")]
    TooSmall(usize),

    #[error("failed to map file into memory: {0}")]
    Mapping(io::Error),

    #[error("DOS signature ('MZ') absent")]
    BadDosSignature,
}

/// The stable numeric status codes from the external interface.
///
/// These exist alongside [`PeError`] so a caller that wants the literal
/// contract (`0` OK, `1` file-open failed, ...) doesn't have to pattern
/// match on an evolving error enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpenStatus {
    Ok = 0,
    FileOpenFailed = 1,
    TooSmall = 2,
    MapFailed = 3,
    BadDosSignature = 4,
}

impl From<&PeError> for OpenStatus {
    fn from(e: &PeError) -> Self {
        match e {
            PeError::Io(_) => OpenStatus::FileOpenFailed,
            PeError::TooSmall(_) => OpenStatus::TooSmall,
            PeError::Mapping(_) => OpenStatus::MapFailed,
            PeError::BadDosSignature => OpenStatus::BadDosSignature,
        }
    }
}

pub type Result<T> = std::result::Result<T, PeError>;
