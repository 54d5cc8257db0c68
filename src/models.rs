//! Rows returned by the GraphQL backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Hasura ids are integers, but some proxies stringify them
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Number(num) => num
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("Invalid integer ID")),
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom("Invalid string ID")),
        _ => Err(serde::de::Error::custom("ID must be a string or integer")),
    }
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(num)) => num
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("Invalid integer ID")),
        Some(Value::String(s)) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom("Invalid string ID")),
        Some(_) => Err(serde::de::Error::custom("ID must be a string or integer")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub login: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// First name when the profile has one, otherwise the login
    pub fn display_name(&self) -> &str {
        match self.first_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }
}

/// One XP award event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub amount: i64,
    #[serde(deserialize_with = "deserialize_id")]
    pub object_id: i64,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningObject {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub login: String,
}

/// A grade as the backend sends it: usually a number, occasionally a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Grade {
    Number(f64),
    Text(String),
}

impl Grade {
    /// Numeric value of the grade, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Grade::Number(n) => Some(*n),
            Grade::Text(s) => {
                let trimmed = s.trim();
                // An empty string coerces to zero
                if trimmed.is_empty() {
                    return Some(0.0);
                }
                trimmed.parse::<f64>().ok()
            }
        }
    }

    /// Finite and at least 1
    pub fn is_pass(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_finite() && n >= 1.0)
    }
}

/// One completed assessment attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(default)]
    pub grade: Option<Grade>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub object_id: Option<i64>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub object: Option<LearningObject>,
}

impl ProgressEntry {
    pub fn is_pass(&self) -> bool {
        self.grade.as_ref().is_some_and(Grade::is_pass)
    }

    /// Object name when present, otherwise the last path segment
    pub fn title(&self) -> &str {
        if let Some(object) = &self.object {
            return &object.name;
        }
        self.path
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.path)
    }

    /// Timestamp the entry is ordered by
    pub fn last_touched(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
