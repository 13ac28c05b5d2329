//! Engine error type.

use thiserror::Error;

use mrt_comm::CommError;
use mrt_core::TrainId;
use mrt_net::NetError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Comm(#[from] CommError),

    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("load-time oracle returned 0 for train {0}; durations must be ≥ 1")]
    BadLoadTime(TrainId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("train {0} is not where the engine left it")]
    LostTrain(TrainId),

    #[error("worker thread for rank {rank} panicked")]
    WorkerPanic { rank: usize },
}

pub type SimResult<T> = Result<T, SimError>;
