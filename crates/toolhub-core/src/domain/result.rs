//! Tool arguments, result items and the normalized response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Argument map passed to a tool invocation.
pub type Arguments = Map<String, Value>;

/// Key that marks a result item as an error.
pub const ERROR_KEY: &str = "error";

/// One element of the list a tool execution returns.
///
/// Either a content item (free-form map, commonly with a `type` key) or an
/// error item (a map containing an `error` key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultItem(Map<String, Value>);

impl ResultItem {
    /// Create an error item.
    pub fn error(message: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ERROR_KEY.to_string(), Value::String(message.into()));
        Self(fields)
    }

    /// Build an item from a JSON value. Non-object values are stored under `value`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            other => {
                let mut fields = Map::new();
                fields.insert("value".to_string(), other);
                Self(fields)
            }
        }
    }

    /// Add a field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Whether this is an error item.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.0.contains_key(ERROR_KEY)
    }

    /// The error message, rendered as text, if this is an error item.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.0.get(ERROR_KEY).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for ResultItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Build a standalone error item as a JSON value (`{"error": message}`).
pub fn error_value(message: impl Into<String>) -> Value {
    json!({ ERROR_KEY: message.into() })
}

/// A single content element of a normalized response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Content discriminator (always `text` for normalized responses).
    #[serde(rename = "type")]
    pub kind: String,
    /// Rendered text.
    pub text: String,
}

impl ContentItem {
    /// Create a text content item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Uniform output envelope: `{"content": [{"type": "text", "text": ...}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub content: Vec<ContentItem>,
}

impl ToolResponse {
    /// Wrap rendered text in a single-item envelope.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(text)],
        }
    }

    /// Build the standard error envelope.
    pub fn error(message: impl AsRef<str>) -> Self {
        Self::text(format!("❌ Error: {}", message.as_ref()))
    }

    /// Concatenated text of every content item.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether this envelope carries the standard error prefix.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.content
            .first()
            .is_some_and(|c| c.text.starts_with("❌ Error:"))
    }

    /// Convert into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({ "content": self.content })
    }
}
