use std::path::PathBuf;

/// Fatal errors of the controller: everything here stops startup.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("duplicate template {0}")]
    DuplicateTemplate(String),
}
