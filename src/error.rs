use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A formatter name that the registry cannot resolve.
    #[error("Formatter must be callable")]
    FormatterNotCallable { name: String },

    #[error("Column \"{name}\" not found in header")]
    ColumnNotFound { name: String },

    #[error("Column index {index} is out of bounds (0-{max})")]
    ColumnOutOfBounds { index: usize, max: usize },

    #[error("Column index {index} is out of bounds (table has no columns)")]
    NoColumns { index: usize },

    #[error("Unable to read the file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn out_of_bounds(index: usize, column_count: usize) -> Self {
        match column_count.checked_sub(1) {
            Some(max) => Error::ColumnOutOfBounds { index, max },
            None => Error::NoColumns { index },
        }
    }
}
