use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubfetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not a directory: {0}")]
    InvalidDirectory(String),

    #[error("Target directory already exists: {0}")]
    DirectoryExists(String),

    #[error("Failed to move file: {0}")]
    MoveFailed(String),

    #[error("Subtitle download failed: {0}")]
    Download(String),

    #[error("Decompression failed: {0}")]
    Decompression(String),

    #[error("Failed to write subtitle file: {0}")]
    Write(String),

    #[error("Subtitle service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, SubfetchError>;
