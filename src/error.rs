use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{worker} worker is gone")]
    WorkerGone { worker: &'static str },
    #[error("{worker} worker panicked")]
    WorkerPanicked { worker: &'static str },
    #[error("timed out waiting for {0}")]
    Timeout(&'static str),
    #[error("canvas is not attached to a render worker")]
    NotAttached,
}
