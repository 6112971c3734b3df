use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An issue on the board.
///
/// Issues form a strict type-based hierarchy via `parent_id`: an Epic never
/// has a parent, a Feature may only nest under an Epic, and a Task under an
/// Epic or a Feature. `parent_id` and `children` are identifiers into the
/// board's registry — `children` is kept as the exact inverse of every other
/// issue's `parent_id`, so the two views never disagree.
///
/// # Lifecycle
/// Issues are created in `Todo`. Transitions between `Todo`, `InProgress`,
/// and back out of `Done` are unconstrained; an issue may only *enter*
/// `Done` once every child and grandchild is `Done`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: Uuid,
    pub title: String,
    /// Fixed at creation; an issue never changes type.
    pub issue_type: IssueType,
    pub state: IssueState,
    pub parent_id: Option<Uuid>,
    /// Identifiers of issues whose `parent_id` names this issue.
    pub children: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The type of an issue, fixed at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Epic,
    Feature,
    Task,
}

impl IssueType {
    /// Whether an issue of this type may nest under a `parent` of the given
    /// type. Epics never nest; Features nest under Epics; Tasks under Epics
    /// or Features.
    pub fn may_be_child_of(self, parent: IssueType) -> bool {
        match self {
            Self::Epic => false,
            Self::Feature => matches!(parent, Self::Epic),
            Self::Task => matches!(parent, Self::Epic | Self::Feature),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Feature => "feature",
            Self::Task => "task",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "epic" => Some(Self::Epic),
            "feature" => Some(Self::Feature),
            "task" => Some(Self::Task),
            _ => None,
        }
    }
}

/// The workflow state of an issue.
///
/// - `Todo`: not yet started (the state every issue is created in)
/// - `InProgress`: someone is working on it
/// - `Done`: finished; only reachable once all children and grandchildren
///   are `Done`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Todo,
    InProgress,
    Done,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Filter parameters for issue queries. All fields are optional; absent
/// fields impose no constraint, and every supplied field must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueFilter {
    /// Only issues currently in this state.
    pub state: Option<IssueState>,
    /// Only issues the given user is assigned to.
    pub assignee: Option<Uuid>,
    /// Only issues whose type appears in this list.
    pub issue_types: Option<Vec<IssueType>>,
    /// Inclusive lower bound on creation time.
    pub start_date: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time.
    pub end_date: Option<DateTime<Utc>>,
}

/// An issue with its nested children, used for tree responses.
///
/// The issue record keeps its `children` id list; the node's `children`
/// array holds the nested `IssueTreeNode` objects themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueTreeNode {
    pub issue: Issue,
    pub children: Vec<IssueTreeNode>,
}
