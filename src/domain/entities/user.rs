use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Email and username are absent for users created implicitly by
/// session creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: Uuid,
    email: Option<String>,
    username: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, username: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: Some(email),
            username: Some(username),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn placeholder(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: None,
            username: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(
        id: Uuid,
        email: Option<String>,
        username: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_placeholder(&self) -> bool {
        self.email.is_none() && self.username.is_none()
    }

    pub fn matches(&self, email: &str, username: &str) -> bool {
        self.email.as_deref() == Some(email) && self.username.as_deref() == Some(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("ana@example.com".to_string(), "ana".to_string());
        assert_eq!(user.email(), Some("ana@example.com"));
        assert!(user.matches("ana@example.com", "ana"));
        assert!(!user.matches("ana@example.com", "ana2"));
        assert!(!user.is_placeholder());
    }

    #[test]
    fn test_placeholder_user() {
        let id = Uuid::new_v4();
        let user = User::placeholder(id);
        assert_eq!(user.id(), id);
        assert!(user.is_placeholder());
    }
}
