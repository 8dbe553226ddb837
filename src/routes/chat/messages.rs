use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::ApiError;

pub const USERNAME_MAX_LEN: usize = 100;

/// Messages are immutable once stored; there is no update or delete path.
#[derive(Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i32,
    pub username: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct NewMessage {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub content: String,
    /// Defaults to now when omitted.
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewMessage {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = std::collections::BTreeMap::new();

        if self.username.trim().is_empty() {
            errors.insert(
                "username".to_string(),
                vec!["This field may not be blank.".to_string()],
            );
        } else if self.username.chars().count() > USERNAME_MAX_LEN {
            errors.insert(
                "username".to_string(),
                vec![format!(
                    "Ensure this field has no more than {} characters.",
                    USERNAME_MAX_LEN
                )],
            );
        }

        if self.content.trim().is_empty() {
            errors.insert(
                "content".to_string(),
                vec!["This field may not be blank.".to_string()],
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

pub async fn insert_message(
    pool: &PgPool,
    username: &str,
    content: &str,
    timestamp: DateTime<Utc>,
) -> sqlx::Result<Message> {
    sqlx::query_as::<_, Message>(
        "INSERT INTO messages (username, content, timestamp)
         VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(username)
    .bind(content)
    .bind(timestamp)
    .fetch_one(pool)
    .await
}

// Inner query takes the newest 50, the outer one flips them oldest-first for
// chronological display. Ordering is spelled out at the query site on purpose.
const LAST_FIFTY_SQL: &str = "SELECT id, username, content, timestamp FROM (
        SELECT id, username, content, timestamp FROM messages
        ORDER BY timestamp DESC LIMIT 50
     ) newest ORDER BY timestamp ASC";

// Strictly greater: a message stamped exactly at the cutoff is excluded.
const NEWER_THAN_SQL: &str = "SELECT id, username, content, timestamp FROM messages
     WHERE timestamp > $1 ORDER BY timestamp ASC";

/// The 50 newest messages, reordered oldest-first for chronological display.
pub async fn last_fifty(pool: &PgPool) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as::<_, Message>(LAST_FIFTY_SQL)
        .fetch_all(pool)
        .await
}

/// Every message strictly newer than `after`, oldest first.
pub async fn newer_than(pool: &PgPool, after: DateTime<Utc>) -> sqlx::Result<Vec<Message>> {
    sqlx::query_as::<_, Message>(NEWER_THAN_SQL)
        .bind(after)
        .fetch_all(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(username: &str, content: &str) -> NewMessage {
        NewMessage {
            username: username.to_string(),
            content: content.to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn accepts_a_plain_message() {
        assert!(new_message("alice", "hi").validate().is_ok());
    }

    #[test]
    fn rejects_blank_username_and_content_together() {
        let err = new_message("", "").validate().unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.contains_key("username"));
                assert!(errors.contains_key("content"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_whitespace_only_content() {
        let err = new_message("alice", "   ").validate().unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("content")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn username_at_limit_is_fine_but_one_over_is_not() {
        let at_limit = "x".repeat(USERNAME_MAX_LEN);
        assert!(new_message(&at_limit, "hi").validate().is_ok());

        let over = "x".repeat(USERNAME_MAX_LEN + 1);
        let err = new_message(&over, "hi").validate().unwrap_err();
        match err {
            ApiError::Validation(errors) => assert!(errors.contains_key("username")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn list_query_caps_at_fifty_and_reorders_ascending() {
        assert!(LAST_FIFTY_SQL.contains("ORDER BY timestamp DESC LIMIT 50"));
        // The outermost sort is the one the client sees.
        assert!(LAST_FIFTY_SQL.trim_end().ends_with("ORDER BY timestamp ASC"));
    }

    #[test]
    fn recent_query_is_strictly_greater_and_ascending() {
        assert!(NEWER_THAN_SQL.contains("timestamp > $1"));
        assert!(NEWER_THAN_SQL.contains("ORDER BY timestamp ASC"));
        assert!(!NEWER_THAN_SQL.contains("LIMIT"));
    }

    #[test]
    fn username_limit_counts_characters_not_bytes() {
        // 100 two-byte characters is still within the limit.
        let unicode = "é".repeat(USERNAME_MAX_LEN);
        assert!(new_message(&unicode, "hi").validate().is_ok());
    }
}
