//! Error types for the pool toolkit

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("pool builder has already been built")]
    AlreadyBuilt,

    #[error("{0} has been disposed")]
    Disposed(&'static str),

    #[error("factory returned no object while the pool needed to grow")]
    FactoryReturnedNone,

    #[error("state {0} is not registered in this machine")]
    StateNotFound(&'static str),
}

pub type PoolResult<T> = Result<T, PoolError>;
