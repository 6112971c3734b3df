//! The board aggregate: sole owner of users, issues, and assignments.
//!
//! All state lives in one registry behind a single lock. Parent/child links
//! and assignment edges span multiple records, so every operation holds the
//! lock for its whole duration and half-applied updates are never
//! observable. Handles are cheap to clone and share the same state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{BoardError, Result};
use crate::models::*;

struct BoardState {
    users: HashMap<Uuid, User>,
    issues: HashMap<Uuid, Issue>,
    /// Issue ids in creation order; queries enumerate in this order.
    issue_order: Vec<Uuid>,
    assignments: Vec<Assignment>,
}

impl BoardState {
    fn children_done(&self, issue: &Issue) -> bool {
        issue
            .children
            .iter()
            .filter_map(|id| self.issues.get(id))
            .all(|child| child.state == IssueState::Done)
    }

    /// True when every child and every grandchild of `issue` is `Done`.
    fn hierarchy_ready(&self, issue: &Issue) -> bool {
        self.children_done(issue)
            && issue
                .children
                .iter()
                .filter_map(|id| self.issues.get(id))
                .all(|child| self.children_done(child))
    }

    fn is_assigned(&self, user_id: Uuid, issue_id: Uuid) -> bool {
        self.assignments
            .iter()
            .any(|a| a.user_id == user_id && a.issue_id == issue_id)
    }
}

pub struct Board {
    state: Arc<Mutex<BoardState>>,
}

impl Board {
    /// Create an empty board. Boards are independent; any number can
    /// coexist in one process.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BoardState {
                users: HashMap::new(),
                issues: HashMap::new(),
                issue_order: Vec::new(),
                assignments: Vec::new(),
            })),
        }
    }

    // ============================================================
    // Issue operations
    // ============================================================

    pub fn add_issue(&self, title: impl Into<String>, issue_type: IssueType) -> Uuid {
        let mut state = self.state.lock().expect("board lock poisoned");
        let id = Uuid::new_v4();
        let issue = Issue {
            id,
            title: title.into(),
            issue_type,
            state: IssueState::Todo,
            parent_id: None,
            children: Vec::new(),
            created_at: Utc::now(),
        };
        tracing::debug!("Created {} issue {} ({})", issue_type.as_str(), id, issue.title);
        state.issues.insert(id, issue);
        state.issue_order.push(id);
        id
    }

    /// Remove an issue from the board forever.
    ///
    /// The removed issue's children get its parent as their parent; if it
    /// had none, or the inherited pairing would break the type rules, they
    /// no longer have a parent. Assignments referencing the issue are
    /// removed as well.
    pub fn remove_issue(&self, issue_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().expect("board lock poisoned");
        let removed = state
            .issues
            .remove(&issue_id)
            .ok_or(BoardError::IssueNotFound(issue_id))?;
        state.issue_order.retain(|id| *id != issue_id);

        if let Some(parent_id) = removed.parent_id {
            if let Some(parent) = state.issues.get_mut(&parent_id) {
                parent.children.retain(|id| *id != issue_id);
            }
        }

        for child_id in &removed.children {
            let Some(child_type) = state.issues.get(child_id).map(|c| c.issue_type) else {
                continue;
            };
            let inherited = removed.parent_id.filter(|pid| {
                state
                    .issues
                    .get(pid)
                    .is_some_and(|p| child_type.may_be_child_of(p.issue_type))
            });
            if let Some(child) = state.issues.get_mut(child_id) {
                child.parent_id = inherited;
            }
            if let Some(parent_id) = inherited {
                if let Some(parent) = state.issues.get_mut(&parent_id) {
                    parent.children.push(*child_id);
                }
            }
        }

        state.assignments.retain(|a| a.issue_id != issue_id);
        tracing::debug!("Removed issue {} ({})", issue_id, removed.title);
        Ok(())
    }

    /// Transition an issue's state. Entering `Done` fails unless every
    /// child and grandchild is already `Done`; all other transitions
    /// succeed unconditionally.
    pub fn set_issue_state(&self, issue_id: Uuid, new_state: IssueState) -> Result<()> {
        let mut state = self.state.lock().expect("board lock poisoned");
        let issue = state
            .issues
            .get(&issue_id)
            .ok_or(BoardError::IssueNotFound(issue_id))?;

        if new_state == IssueState::Done && !state.hierarchy_ready(issue) {
            tracing::warn!("Rejected done for issue {}: unfinished children", issue_id);
            return Err(BoardError::HierarchyNotReady);
        }

        if let Some(issue) = state.issues.get_mut(&issue_id) {
            issue.state = new_state;
        }
        Ok(())
    }

    /// Set or clear an issue's parent.
    ///
    /// Passing the current parent is a no-op. `None` clears the parent
    /// without substituting a new one. On success the issue is detached
    /// from any previous parent's child set and attached to the new one, so
    /// an issue never has two recorded parents and a child set never holds
    /// a stale member. A disallowed type pairing fails before anything is
    /// touched.
    pub fn set_parent_issue(&self, issue_id: Uuid, parent_id: Option<Uuid>) -> Result<()> {
        let mut state = self.state.lock().expect("board lock poisoned");
        let issue = state
            .issues
            .get(&issue_id)
            .ok_or(BoardError::IssueNotFound(issue_id))?;
        if issue.parent_id == parent_id {
            return Ok(());
        }
        let child_type = issue.issue_type;
        let old_parent = issue.parent_id;

        if let Some(parent_id) = parent_id {
            let parent = state
                .issues
                .get(&parent_id)
                .ok_or(BoardError::IssueNotFound(parent_id))?;
            if !child_type.may_be_child_of(parent.issue_type) {
                tracing::warn!(
                    "Rejected parenting {} issue {} under {} issue {}",
                    child_type.as_str(),
                    issue_id,
                    parent.issue_type.as_str(),
                    parent_id
                );
                return Err(BoardError::InvalidHierarchy {
                    child: child_type,
                    parent: parent.issue_type,
                });
            }
        }

        if let Some(old_parent_id) = old_parent {
            if let Some(parent) = state.issues.get_mut(&old_parent_id) {
                parent.children.retain(|id| *id != issue_id);
            }
        }
        if let Some(parent_id) = parent_id {
            if let Some(parent) = state.issues.get_mut(&parent_id) {
                parent.children.push(issue_id);
            }
        }
        if let Some(issue) = state.issues.get_mut(&issue_id) {
            issue.parent_id = parent_id;
        }
        Ok(())
    }

    pub fn get_issue(&self, issue_id: Uuid) -> Result<Issue> {
        let state = self.state.lock().expect("board lock poisoned");
        state
            .issues
            .get(&issue_id)
            .cloned()
            .ok_or(BoardError::IssueNotFound(issue_id))
    }

    /// Retrieve issues matching `filter`, in creation order. All supplied
    /// filter fields must match; an empty filter returns every issue.
    pub fn get_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(BoardError::InvalidRange);
            }
        }

        let state = self.state.lock().expect("board lock poisoned");
        let issues = state
            .issue_order
            .iter()
            .filter_map(|id| state.issues.get(id))
            .filter(|issue| filter.state.map_or(true, |s| issue.state == s))
            .filter(|issue| {
                filter
                    .assignee
                    .map_or(true, |user_id| state.is_assigned(user_id, issue.id))
            })
            .filter(|issue| {
                filter
                    .issue_types
                    .as_ref()
                    .map_or(true, |types| types.contains(&issue.issue_type))
            })
            .filter(|issue| filter.start_date.map_or(true, |start| issue.created_at >= start))
            .filter(|issue| filter.end_date.map_or(true, |end| issue.created_at < end))
            .cloned()
            .collect();

        Ok(issues)
    }

    // ============================================================
    // Hierarchy queries
    // ============================================================

    pub fn get_children(&self, issue_id: Uuid) -> Result<Vec<Issue>> {
        let state = self.state.lock().expect("board lock poisoned");
        let issue = state
            .issues
            .get(&issue_id)
            .ok_or(BoardError::IssueNotFound(issue_id))?;
        Ok(issue
            .children
            .iter()
            .filter_map(|id| state.issues.get(id))
            .cloned()
            .collect())
    }

    pub fn get_root_issues(&self) -> Vec<Issue> {
        let state = self.state.lock().expect("board lock poisoned");
        state
            .issue_order
            .iter()
            .filter_map(|id| state.issues.get(id))
            .filter(|issue| issue.parent_id.is_none())
            .cloned()
            .collect()
    }

    pub fn is_leaf(&self, issue_id: Uuid) -> Result<bool> {
        let state = self.state.lock().expect("board lock poisoned");
        let issue = state
            .issues
            .get(&issue_id)
            .ok_or(BoardError::IssueNotFound(issue_id))?;
        Ok(issue.children.is_empty())
    }

    /// The whole hierarchy as nested nodes, roots first in creation order.
    pub fn issue_tree(&self) -> Vec<IssueTreeNode> {
        let state = self.state.lock().expect("board lock poisoned");

        // Group issues by parent_id
        let mut children_map: HashMap<Option<Uuid>, Vec<Issue>> = HashMap::new();
        for issue in state.issue_order.iter().filter_map(|id| state.issues.get(id)) {
            children_map
                .entry(issue.parent_id)
                .or_default()
                .push(issue.clone());
        }

        // Recursively build the tree starting from roots (parent_id = None)
        fn build_subtree(
            parent_id: Option<Uuid>,
            children_map: &HashMap<Option<Uuid>, Vec<Issue>>,
        ) -> Vec<IssueTreeNode> {
            children_map
                .get(&parent_id)
                .map(|issues| {
                    issues
                        .iter()
                        .map(|issue| IssueTreeNode {
                            issue: issue.clone(),
                            children: build_subtree(Some(issue.id), children_map),
                        })
                        .collect()
                })
                .unwrap_or_default()
        }

        build_subtree(None, &children_map)
    }

    // ============================================================
    // User operations
    // ============================================================

    pub fn add_user(&self, name: impl Into<String>) -> Uuid {
        let mut state = self.state.lock().expect("board lock poisoned");
        let id = Uuid::new_v4();
        let user = User {
            id,
            name: name.into(),
        };
        tracing::debug!("Created user {} ({})", id, user.name);
        state.users.insert(id, user);
        id
    }

    /// Remove a user and unassign them from every issue.
    pub fn remove_user(&self, user_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().expect("board lock poisoned");
        let removed = state
            .users
            .remove(&user_id)
            .ok_or(BoardError::UserNotFound(user_id))?;
        state.assignments.retain(|a| a.user_id != user_id);
        tracing::debug!("Removed user {} ({})", user_id, removed.name);
        Ok(())
    }

    pub fn get_user(&self, user_id: Uuid) -> Result<User> {
        let state = self.state.lock().expect("board lock poisoned");
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or(BoardError::UserNotFound(user_id))
    }

    /// All users currently on the board, ordered by name.
    pub fn get_users(&self) -> Vec<User> {
        let state = self.state.lock().expect("board lock poisoned");
        let mut users: Vec<User> = state.users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    // ============================================================
    // Assignment operations
    // ============================================================

    /// Assign a user to an issue, or clear the issue's assignments.
    ///
    /// Assigning an already-assigned (user, issue) pair is a no-op. Passing
    /// `None` removes every assignment of the issue and fails with
    /// [`BoardError::AssignmentNotFound`] if there were none.
    pub fn assign_user(&self, user_id: Option<Uuid>, issue_id: Uuid) -> Result<()> {
        let mut state = self.state.lock().expect("board lock poisoned");
        if !state.issues.contains_key(&issue_id) {
            return Err(BoardError::IssueNotFound(issue_id));
        }

        let Some(user_id) = user_id else {
            let before = state.assignments.len();
            state.assignments.retain(|a| a.issue_id != issue_id);
            if state.assignments.len() == before {
                return Err(BoardError::AssignmentNotFound);
            }
            tracing::debug!("Cleared assignments for issue {}", issue_id);
            return Ok(());
        };

        if !state.users.contains_key(&user_id) {
            return Err(BoardError::UserNotFound(user_id));
        }
        let edge = Assignment { user_id, issue_id };
        if state.assignments.contains(&edge) {
            return Ok(());
        }
        state.assignments.push(edge);
        Ok(())
    }

    /// Users assigned to an issue, in assignment order.
    pub fn assignees(&self, issue_id: Uuid) -> Result<Vec<User>> {
        let state = self.state.lock().expect("board lock poisoned");
        if !state.issues.contains_key(&issue_id) {
            return Err(BoardError::IssueNotFound(issue_id));
        }
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.issue_id == issue_id)
            .filter_map(|a| state.users.get(&a.user_id))
            .cloned()
            .collect())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}
