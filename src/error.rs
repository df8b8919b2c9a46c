use thiserror::Error;

/// Error type for the crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("state index {state} out of range (num_states = {num_states})")]
    StateOutOfRange { state: usize, num_states: usize },

    #[error("action index {action} out of range (num_actions = {num_actions})")]
    ActionOutOfRange { action: usize, num_actions: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Convenience type alias for results using the crate's [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;
