//! Zip unwrapping for daily kline archives.

use klinebase_types::KlinebaseError;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

/// Errors that can occur while unwrapping an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The archive holds no data file.
    #[error("Archive contains no entries")]
    EmptyArchive,

    /// The bytes are not a readable zip archive.
    #[error("Corrupt archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Reading the entry failed.
    #[error("I/O error reading archive entry: {0}")]
    Io(#[from] std::io::Error),

    /// The entry is not UTF-8 text.
    #[error("Archive entry '{name}' is not valid UTF-8")]
    Encoding {
        /// Name of the entry inside the archive.
        name: String,
    },
}

impl From<ArchiveError> for KlinebaseError {
    fn from(e: ArchiveError) -> Self {
        Self::Format(e.to_string())
    }
}

/// Unwraps a daily archive into its CSV text.
///
/// Daily archives carry exactly one data file; the first file entry is
/// returned and directory entries are ignored.
///
/// # Errors
///
/// Returns [`ArchiveError::EmptyArchive`] if the archive has no file entry,
/// or another variant if it cannot be read.
pub fn unwrap_archive(compressed: &[u8]) -> Result<String, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(compressed))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let mut buffer = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut buffer)?;

        return String::from_utf8(buffer).map_err(|_| ArchiveError::Encoding { name });
    }

    Err(ArchiveError::EmptyArchive)
}
