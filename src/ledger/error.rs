use thiserror::Error;

/// Validation failures raised by ledger transitions. Each one leaves the
/// ledger exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Select a process and a product first.")]
    MissingSelection,

    #[error("Project name, duration and at least one item are required.")]
    IncompleteProject,

    #[error("A save is already in progress.")]
    SubmissionInFlight,
}
