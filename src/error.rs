use thiserror::Error;
use uuid::Uuid;

use crate::models::IssueType;

/// Board operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Issue not found: {0}")]
    IssueNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// A disallowed parent/child type pairing, including any attempt to
    /// give an Epic a parent. Carries the pair that violated the rule.
    #[error("{child:?} issues cannot have {parent:?} parents")]
    InvalidHierarchy { child: IssueType, parent: IssueType },

    #[error("Cannot set state to done when children or grandchildren aren't done")]
    HierarchyNotReady,

    #[error("Invalid time interval for issue filtering")]
    InvalidRange,

    #[error("Issue has no assignments to remove")]
    AssignmentNotFound,
}

pub type Result<T> = std::result::Result<T, BoardError>;
