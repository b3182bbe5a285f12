use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("a full scan is already running")]
    FullScanRunning,

    #[error("scan worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
