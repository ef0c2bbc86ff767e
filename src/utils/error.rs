//! Error types for the Apex launcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("Failed to start {command}: {source}")]
    ProcessStart {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to download ChangeLog: {0}")]
    Network(String),

    #[error("Could not create temporary file.")]
    TemporaryStorage(#[source] std::io::Error),

    #[error("Could not open changelog file.")]
    LocalReopen(#[source] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl LauncherError {
    /// Title of the warning dialog that reports this error.
    pub fn dialog_title(&self) -> &'static str {
        "Error"
    }
}

impl From<ureq::Error> for LauncherError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => LauncherError::Network(format!(
                "{} {} ({})",
                code,
                response.status_text(),
                response.get_url()
            )),
            ureq::Error::Transport(transport) => LauncherError::Network(transport.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;
