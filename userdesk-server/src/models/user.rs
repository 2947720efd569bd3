//! User input validation
//!
//! `NewUser` requires both fields; `UserChanges` takes any subset of the
//! writable columns. Both expect fields already passed through
//! [`strip_empty`](super::strip_empty).

use serde_json::Value;

use super::validation::{is_valid_email, ValidationErrors};
use crate::db::users::USER_COLUMNS;
use crate::db::Fields;

fn text<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Validated input for creating a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    /// Require `name` and `email`, and check the email format.
    pub fn validate(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = text(fields, "name");
        let email = text(fields, "email");

        if name.is_none() {
            errors.required("name");
        }
        match email {
            None => errors.required("email"),
            Some(email) if !is_valid_email(email) => errors.invalid_email("email"),
            Some(_) => {}
        }
        errors.into_result()?;

        Ok(Self {
            name: name.unwrap_or_default().to_owned(),
            email: email.unwrap_or_default().to_owned(),
        })
    }

    /// Columns to insert, `name` then `email`.
    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), Value::String(self.name));
        fields.insert("email".into(), Value::String(self.email));
        fields
    }
}

/// Validated partial update for a user
#[derive(Debug, Clone, PartialEq)]
pub struct UserChanges {
    fields: Fields,
}

impl UserChanges {
    /// Keep only writable columns, in submitted order, and check the email
    /// format when one is given.
    pub fn validate(fields: &Fields) -> Result<Self, ValidationErrors> {
        if let Some(email) = text(fields, "email") {
            if !is_valid_email(email) {
                let mut errors = ValidationErrors::new();
                errors.invalid_email("email");
                return Err(errors);
            }
        }

        let fields = fields
            .iter()
            .filter(|(key, _)| USER_COLUMNS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self { fields })
    }

    pub fn email(&self) -> Option<&str> {
        text(&self.fields, "email")
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}
