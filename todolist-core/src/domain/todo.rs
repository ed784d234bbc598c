//! Todo domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task owned by one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    /// Id of the owning identity
    pub user_id: String,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a todo; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub user_id: String,
    pub task: String,
    pub completed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl NewTodo {
    /// A not-yet-completed todo stamped with the current time
    pub fn new(user_id: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            task: task.into(),
            completed: false,
            created_at: timestamp::now(),
        }
    }
}

/// Fixed-width RFC 3339 timestamps (microseconds, `Z` suffix), so the string
/// order of stored values equals their time order.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Current time truncated to microseconds
    pub fn now() -> DateTime<Utc> {
        let now = Utc::now();
        DateTime::<Utc>::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now)
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_todo_is_not_completed() {
        let todo = NewTodo::new("user_1", "buy milk");
        assert_eq!(todo.user_id, "user_1");
        assert_eq!(todo.task, "buy milk");
        assert!(!todo.completed);
    }

    #[test]
    fn test_timestamp_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        assert_eq!(timestamp::format(&whole), "2024-01-15T08:00:00.000000Z");

        let todo = NewTodo {
            user_id: "u".to_string(),
            task: "t".to_string(),
            completed: false,
            created_at: whole,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["created_at"], "2024-01-15T08:00:00.000000Z");
    }

    #[test]
    fn test_todo_from_json() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":"t1","user_id":"u1","task":"walk","created_at":"2024-01-15T08:00:00.000001Z"}"#,
        )
        .unwrap();
        assert_eq!(todo.id, "t1");
        assert!(!todo.completed);
        assert_eq!(todo.created_at.timestamp_subsec_micros(), 1);
    }
}
