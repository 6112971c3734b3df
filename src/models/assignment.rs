use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user↔issue assignment edge.
///
/// Assignments form a many-to-many relation between users and issues. The
/// board enforces uniqueness of the (user, issue) pair; the list carries no
/// ordering significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub user_id: Uuid,
    pub issue_id: Uuid,
}
