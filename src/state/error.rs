use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("stale reshow ticket: generation {ticket} superseded by {current}")]
    StaleReshow { ticket: u64, current: u64 },
}
