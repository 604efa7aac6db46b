use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Candidate details extracted by the completion service.
///
/// Only the outer shape is checked: the content must be a JSON object. Keys
/// and value types are whatever the model produced, and the object is echoed
/// back to callers unchanged. Column values are derived from it on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedResume(Map<String, Value>);

impl ParsedResume {
    pub fn name(&self) -> Option<String> {
        self.text("name")
    }

    pub fn email(&self) -> Option<String> {
        self.text("email")
    }

    pub fn phone(&self) -> Option<String> {
        self.text("phone")
    }

    pub fn skills(&self) -> Option<Vec<String>> {
        self.text_list("skills")
    }

    pub fn experience(&self) -> Option<Vec<String>> {
        self.text_list("experience")
    }

    pub fn education(&self) -> Option<Vec<String>> {
        self.text_list("education")
    }

    /// `TEXT` column value: absent or null is NULL.
    fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(column_text)
    }

    /// `TEXT[]` column value: absent is an empty array, null is NULL, and a
    /// lone value becomes a one-element array.
    fn text_list(&self, key: &str) -> Option<Vec<String>> {
        match self.0.get(key) {
            None => Some(Vec::new()),
            Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|item| column_text(item).unwrap_or_else(|| "null".to_string()))
                    .collect(),
            ),
            Some(other) => column_text(other).map(|text| vec![text]),
        }
    }
}

/// Strings are stored as-is; every other value as its JSON text.
fn column_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A row about to be written to the `resumes` table.
/// The table is insert-only; `id` is assigned by the database.
#[derive(Debug, Clone)]
pub struct NewResumeRecord {
    pub user_id: String,
    pub file_key: String,
    pub bucket_name: String,
    pub parsed: ParsedResume,
    pub parsed_at: NaiveDateTime,
}
