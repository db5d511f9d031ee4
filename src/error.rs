use std::num::ParseFloatError;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Everything that can abort a catalog load.
///
/// There is no recovery anywhere in the load path: the first error wins and
/// no partial catalog is produced.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The session store could not be opened as a SQLite database.
    #[error("cannot open session store {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Enumerating the store's tables failed.
    #[error("failed to list sessions in {}: {source}", path.display())]
    Query {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// An image has no sibling world-file.
    #[error(
        "image {} has no world-file (expected {})",
        image.display(),
        world_file.display()
    )]
    MissingWorldFile { image: PathBuf, world_file: PathBuf },

    /// A world-file line is not a floating point number.
    #[error("{}:{line}: '{value}' is not a number: {source}", path.display())]
    MalformedWorldFile {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The offending line, lossily decoded.
        value: String,
        #[source]
        source: WorldParamError,
    },

    /// Image dimensions could not be probed.
    #[error("cannot read image dimensions of {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Any other filesystem failure (unlistable directory, unreadable file).
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single world-file line was rejected.
#[derive(Debug, Error)]
pub enum WorldParamError {
    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
}

impl CatalogError {
    /// Map a failure raised while querying the store.
    ///
    /// SQLite opens files lazily, so a file that is not a database only
    /// fails once the first statement runs.
    pub(crate) fn from_query(path: impl Into<PathBuf>, source: rusqlite::Error) -> Self {
        let path = path.into();
        match source.sqlite_error_code() {
            Some(rusqlite::ErrorCode::NotADatabase) => CatalogError::StoreUnavailable { path, source },
            _ => CatalogError::Query { path, source },
        }
    }
}
