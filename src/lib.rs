//! Trackboard: an in-memory issue tracking board.
//!
//! Issues form a strict type-based hierarchy (Epics at the top, Features
//! under Epics, Tasks under Epics or Features) and carry a workflow state
//! that can only reach `Done` once every child and grandchild is `Done`.
//! A [`Board`](board::Board) owns all users, issues, and user↔issue
//! assignments, and is the sole entry point for mutation and querying.
//!
//! There is no persistence or network surface; the crate is consumed as a
//! library through direct calls on a board handle.

pub mod board;
pub mod error;
pub mod models;

pub use board::Board;
pub use error::{BoardError, Result};
