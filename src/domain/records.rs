use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque record identifier. The backend hands out integers, but nothing
/// here relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "WireId")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Int(i64),
    Text(String),
}

impl From<WireId> for RecordId {
    fn from(w: WireId) -> Self {
        match w {
            WireId::Int(n) => Self(n.to_string()),
            WireId::Text(s) => Self(s),
        }
    }
}

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two collections the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Contact,
    Template,
}

impl Resource {
    /// Path segment under the API base, e.g. `/api/contacts`.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Contact => "contacts",
            Resource::Template => "templates",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            Resource::Contact => "contact",
            Resource::Template => "template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: RecordId,
    pub title: String,
    pub subject: String,
    pub body: String,
}

/// Body of `POST /api/contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
}

/// Body of `POST /api/templates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplate {
    pub title: String,
    pub subject: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let c: Contact =
            serde_json::from_str(r#"{"id": 7, "name": "Jo", "email": "jo@x.com"}"#)
                .expect("numeric id should parse");
        assert_eq!(c.id.as_str(), "7");

        let t: Template = serde_json::from_str(
            r#"{"id": "a1", "title": "Hi", "subject": "S", "body": "B"}"#,
        )
        .expect("string id should parse");
        assert_eq!(t.id, RecordId::new("a1"));
    }

    #[test]
    fn resource_paths_match_backend_routes() {
        assert_eq!(Resource::Contact.path(), "contacts");
        assert_eq!(Resource::Template.path(), "templates");
    }
}
