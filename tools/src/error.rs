use std::{io, path::PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("png error: {0}")]
    Png(#[from] png::DecodingError),

    #[error("line {line}: malformed pixel record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Only raised in strict mode. Without it a wrong geometry just
    /// produces misaligned frames.
    #[error(
        "line {line}: frame start seen after {pixel_count} of {frame_size} pixels; geometry does not match the log"
    )]
    GeometryMismatch {
        line: usize,
        pixel_count: usize,
        frame_size: usize,
    },

    #[error("mode {name:?} not found in {}", path.display())]
    UnknownMode { name: String, path: PathBuf },

    #[error("line {line}: invalid mode definition: {reason}")]
    InvalidMode { line: usize, reason: String },

    #[error("font image: {0}")]
    FontImage(String),

    #[error("line {line}: bad synthesis report: {reason}")]
    Report { line: usize, reason: String },
}
