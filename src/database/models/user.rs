use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::section::Section;

/// Aggregate root: one stored document per registered person.
///
/// `password_hash` never leaves the server; this type is not `Serialize`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A freshly registered user with an empty plan
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
