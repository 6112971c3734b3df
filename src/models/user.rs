use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named identity issues can be assigned to.
///
/// Users carry no state of their own; removing one also removes every
/// [`Assignment`](super::Assignment) referencing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
}
