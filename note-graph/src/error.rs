use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Everything that can go wrong outside the scanner core, which itself has
/// no failure path.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse configuration: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("palette name `{0}` collides with a top-level configuration section")]
    ReservedPalette(String),

    #[error("palette `{0}` is not available")]
    UnknownPalette(String),

    #[error("color `{color}` is not available in palette `{palette}`")]
    UnknownColor { palette: String, color: String },

    #[error("HOME is not set; cannot locate the Bear database")]
    NoHome,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not run the layout program `{command}`: {source}")]
    LayoutSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("the layout program `{command}` exited with {status}")]
    LayoutFailed { command: String, status: ExitStatus },
}
