use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationErrors};

pub const MAX_NAME_LEN: usize = 100;

/// Form shared by product types and special tags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl NameForm {
    /// Identifier carried by an edit form. Blank or malformed values count as absent.
    pub fn submitted_id(&self) -> Option<i32> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .and_then(|id| id.parse().ok())
    }

    /// Returns the trimmed name.
    pub fn validate(&self) -> Result<String> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim();

        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add(
                "name",
                format!("Name must be at most {} characters", MAX_NAME_LEN),
            );
        }

        errors.with_form(self).into_result()?;
        Ok(name.to_string())
    }
}
