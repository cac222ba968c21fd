use std::collections::HashMap;

use serde::Serialize;

use super::schema::{FieldValue, TableSchema};

/// Form field names that carry secrets and must never be logged or echoed.
const SECRET_FIELDS: [&str; 2] = ["password", "password_hash"];

// Accepted field names per column, first non-empty wins
const FULL_NAME: &[&str] = &["full_name", "name", "fullname", "fullName"];
const USERNAME: &[&str] = &["username", "user"];
const PASSWORD: &[&str] = &["password_hash", "password"];
const FATHER_NAME: &[&str] = &["father_name", "father"];
const MOTHER_NAME: &[&str] = &["mother_name", "mother"];

/// A submitted registration, normalised from the raw form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub full_name: Option<String>,
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub address: Option<String>,
    pub age: Option<i64>,
}

fn pick(fields: &HashMap<String, String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find(|value| !value.is_empty())
        .cloned()
}

impl RegistrationForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        Self {
            full_name: pick(fields, FULL_NAME),
            user_id: pick(fields, &["user_id"]),
            username: pick(fields, USERNAME),
            password: pick(fields, PASSWORD),
            email: pick(fields, &["email"]),
            phone: pick(fields, &["phone"]),
            father_name: pick(fields, FATHER_NAME),
            mother_name: pick(fields, MOTHER_NAME),
            address: pick(fields, &["address"]),
            age: pick(fields, &["age"]).and_then(|age| age.trim().parse().ok()),
        }
    }

    /// Name used when logging who registered.
    pub fn display_name(&self) -> Option<&str> {
        self.username.as_deref().or(self.user_id.as_deref())
    }

    /// Builds the value for each known column.
    ///
    /// `user_id` follows the column type: an integer column only takes a
    /// numeric id (leaving room for the sequence default), any other column
    /// falls back to the username.
    pub fn candidates(
        &self,
        schema: &TableSchema,
        password_hash: Option<String>,
    ) -> HashMap<&'static str, FieldValue> {
        let user_id = match schema.column("user_id") {
            Some(meta) if meta.is_integer() => self
                .user_id
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok())
                .map(FieldValue::Int),
            Some(_) => self
                .user_id
                .clone()
                .or_else(|| self.username.clone())
                .map(FieldValue::Text),
            None => None,
        };

        let text = |value: &Option<String>| value.clone().map(FieldValue::Text);

        [
            ("full_name", text(&self.full_name)),
            ("user_id", user_id),
            ("username", text(&self.username)),
            ("password_hash", password_hash.map(FieldValue::Text)),
            ("email", text(&self.email)),
            ("phone", text(&self.phone)),
            ("father_name", text(&self.father_name)),
            ("mother_name", text(&self.mother_name)),
            ("address", text(&self.address)),
            ("age", self.age.map(FieldValue::Int)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }
}

/// Raw form fields with secrets masked, for logs and error pages.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct RedactedFields<'a>(std::collections::BTreeMap<&'a str, &'a str>);

impl<'a> RedactedFields<'a> {
    pub fn new(fields: &'a HashMap<String, String>) -> Self {
        Self(
            fields
                .iter()
                .map(|(key, value)| {
                    let shown = if SECRET_FIELDS.contains(&key.as_str()) {
                        "********"
                    } else {
                        value.as_str()
                    };
                    (key.as_str(), shown)
                })
                .collect(),
        )
    }
}

impl std::fmt::Display for RedactedFields<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}
