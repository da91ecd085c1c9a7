use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_SESSION_NAME: &str = "New Session";
pub const MAX_SESSION_NAME_LEN: usize = 128;

/// Message count a session must exceed before it gets an automatic name.
pub const AUTO_NAME_MIN_MESSAGES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    user_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: normalize_name(name.as_deref()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn restore(
        id: Uuid,
        user_id: Uuid,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn has_default_name(&self) -> bool {
        is_default_name(&self.name)
    }

    pub fn should_auto_name(&self, message_count: usize) -> bool {
        self.has_default_name() && message_count > AUTO_NAME_MIN_MESSAGES
    }

    pub fn rename(&mut self, name: &str) {
        self.name = normalize_name(Some(name));
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

pub fn is_default_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed == DEFAULT_SESSION_NAME
}

fn normalize_name(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.chars().take(MAX_SESSION_NAME_LEN).collect(),
        None => DEFAULT_SESSION_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        let session = Session::new(Uuid::new_v4(), None);
        assert_eq!(session.name(), DEFAULT_SESSION_NAME);
        assert!(session.has_default_name());

        let blank = Session::new(Uuid::new_v4(), Some("   ".to_string()));
        assert_eq!(blank.name(), DEFAULT_SESSION_NAME);
    }

    #[test]
    fn test_auto_name_threshold() {
        let session = Session::new(Uuid::new_v4(), None);
        assert!(!session.should_auto_name(0));
        assert!(!session.should_auto_name(3));
        assert!(session.should_auto_name(4));

        let custom = Session::new(Uuid::new_v4(), Some("Air quality".to_string()));
        assert!(!custom.should_auto_name(10));
    }

    #[test]
    fn test_empty_name_counts_as_default() {
        let session = Session::restore(
            Uuid::new_v4(),
            Uuid::new_v4(),
            String::new(),
            Utc::now(),
            Utc::now(),
        );
        assert!(session.should_auto_name(4));
    }

    #[test]
    fn test_rename_truncates() {
        let mut session = Session::new(Uuid::new_v4(), None);
        let long = "x".repeat(300);
        session.rename(&long);
        assert_eq!(session.name().chars().count(), MAX_SESSION_NAME_LEN);
        assert!(!session.has_default_name());
    }

    #[test]
    fn test_ownership() {
        let owner = Uuid::new_v4();
        let session = Session::new(owner, None);
        assert!(session.is_owned_by(owner));
        assert!(!session.is_owned_by(Uuid::new_v4()));
    }
}
