use std::path::PathBuf;

/// Errors raised at the edges of the editor: configuration loading and
/// writing the downloaded document. Text transforms themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown menu action `{0}`")]
    UnknownAction(String),

    #[error("menu item `{0}` is a heading but has no `field`")]
    MissingHeadingField(String),

    #[error("invalid dimension `{0}` (expected N%, Npx or N)")]
    InvalidDimension(String),

    #[error("failed to write {path}: {source}")]
    Download {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
