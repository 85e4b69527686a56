use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered identity. `email` is the unique natural key and doubles as
/// the token subject. The bcrypt hash is stored, never the plaintext, and is
/// skipped on serialization so it cannot leak into a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// A stored task. Ids come from the external todo API, so the primary key is
/// the upstream id rather than a locally generated one.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_omits_hash() {
        let user = User::new(
            "a@x.com".to_string(),
            "a".to_string(),
            "$2b$12$abcdefghijklmnopqrstuv".to_string(),
        );

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["username"], "a");
        assert!(json.get("password_hash").is_none());
    }
}
