//! Typed failure modes shared across operations.
//!
//! Every command validates its preconditions before mutating anything, so
//! these errors surface with the repository untouched. Mid-operation I/O
//! failures propagate as `Io`; orphan objects written before the failure are
//! harmless and left in place.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DitError {
    #[error("not a dit repository (or any of the parent directories): .dit")]
    NotARepo,

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("'{0}' is not a valid branch name")]
    InvalidName(String),

    #[error("reference not found: {0}")]
    MissingRef(String),

    #[error("object not found: {0}")]
    MissingObject(String),

    #[error("short hash '{0}' is ambiguous")]
    AmbiguousShortHash(String),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("reference is not a commit: {0}")]
    NotACommit(String),

    #[error(
        "Your local changes would be overwritten by {0}.\n\
         Please commit your changes before you switch branches.\nAborting"
    )]
    WouldOverwriteChanges(String),

    #[error("nothing to commit")]
    NothingToCommit,

    #[error("You have not concluded your merge (MERGE_HEAD exists)")]
    MergeInProgress,

    #[error("There is no merge in progress (MERGE_HEAD missing)")]
    NoMergeInProgress,

    #[error("You have not concluded your merge (conflicts still exist)")]
    ConflictsRemain,

    #[error("pathspec '{0}' did not match any files")]
    PathNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
