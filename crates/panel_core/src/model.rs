use std::fmt;

use indexmap::IndexMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a scraping task.
///
/// The service may hand out ids as JSON strings or integers; both decode to the
/// same textual id so lookups never depend on the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireTaskId", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTaskId {
    Text(String),
    Number(i64),
}

impl From<WireTaskId> for TaskId {
    fn from(value: WireTaskId) -> Self {
        match value {
            WireTaskId::Text(text) => Self(text),
            WireTaskId::Number(number) => Self(number.to_string()),
        }
    }
}

/// Contact details extracted for one company.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default, deserialize_with = "null_as_default")]
    pub emails: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phones: Vec<String>,
}

/// One extracted company record of a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultRow {
    pub url: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contacts: Contacts,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub services: Vec<String>,
    /// Platform name -> profile URL, in the order the service sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_media: IndexMap<String, String>,
    #[serde(default)]
    pub industry: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
