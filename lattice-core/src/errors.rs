use thiserror::Error;

pub type Result<T> = std::result::Result<T, LatticeError>;

#[derive(Debug, Error)]
pub enum LatticeError {
    #[error("Parsing error: {0}")]
    SerdeParse(#[from] serde_json::error::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("XDG error: {0}")]
    XdgBaseDirError(#[from] xdg::BaseDirectoriesError),
    #[error("No free workspace left on screen {screen}")]
    WorkspaceExhausted { screen: usize },
    #[error("Window is not managed")]
    UnknownWindow,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
