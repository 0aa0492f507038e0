use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::Value;

/// Field-level validation failures, carried back together with the submitted
/// form so the caller can redisplay what was entered.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
    form: Value,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn form(&self) -> &Value {
        &self.form
    }

    pub fn with_form<T: Serialize>(mut self, form: &T) -> Self {
        self.form = serde_json::to_value(form).unwrap_or(Value::Null);
        self
    }

    /// `Ok(())` when nothing was recorded, otherwise the errors as an `AppError`.
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", fields.join(", "))
    }
}
