//! Tape error types.

use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display};
use std::io;

/// Tape failure.
///
/// The two variants are disjoint planes: [`TapeError::Io`] covers data
/// transfers (read, write, flush, extension of the backing stream),
/// [`TapeError::Seek`] covers repositioning of the stream cursors.
/// Violations of a tape's own `[0, size]` head window are programming
/// errors and abort instead of producing a `TapeError`.
#[derive(Debug)]
pub enum TapeError {
    /// Reading, writing, flushing or extending the backing stream failed.
    Io(io::Error),
    /// Positioning the backing stream failed.
    Seek(io::Error),
}

impl Error for TapeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(match &self {
            TapeError::Io(err) => err,
            TapeError::Seek(err) => err,
        })
    }
}

impl Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            TapeError::Io(err) => write!(f, "tape I/O failed: {}", err),
            TapeError::Seek(err) => write!(f, "tape stream positioning failed: {}", err),
        }
    }
}
