use thiserror::Error;

/// Error types for state, set and manager operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("State \"{state}\" is not in the available states list ({context})")]
    InvalidStateReference { state: String, context: String },

    #[error("No state available for {operation}")]
    AbsentState { operation: String },

    #[error("Cannot {operation} on an empty state catalog")]
    EmptyCatalog { operation: String },

    #[error("State \"{state}\" appears more than once in the catalog")]
    DuplicateState { state: String },

    #[error("Manager is {phase}, transitions require an active manager")]
    ManagerNotActive { phase: String },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

/// Helper function to create invalid reference errors
pub fn invalid_state_reference(
    state: impl std::fmt::Display,
    context: impl Into<String>,
) -> StateMachineError {
    StateMachineError::InvalidStateReference {
        state: state.to_string(),
        context: context.into(),
    }
}

/// Helper function to create absent state errors
pub fn absent_state(operation: impl Into<String>) -> StateMachineError {
    StateMachineError::AbsentState {
        operation: operation.into(),
    }
}
