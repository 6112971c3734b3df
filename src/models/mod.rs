//! Domain models for Trackboard.
//!
//! # Core Concepts
//!
//! - [`Issue`]: a node in the board's type-based hierarchy. Epics sit at the
//!   top, Features nest under Epics, Tasks under Epics or Features. Parent
//!   and child links are identifiers into the board's registry, never owned
//!   references.
//! - [`User`]: a named identity that issues can be assigned to.
//! - [`Assignment`]: a many-to-many edge between a user and an issue.
//!
//! All mutation goes through [`Board`](crate::board::Board); these types are
//! the records it hands out.

mod assignment;
mod issue;
mod user;

pub use assignment::*;
pub use issue::*;
pub use user::*;
