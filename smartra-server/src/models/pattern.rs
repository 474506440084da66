//! Knitting pattern input
//!
//! Patterns arrive as multipart forms, so text fields are collected one at
//! a time into [`PatternFields`] and converted into a [`NewPattern`] once
//! the whole form has been read.

use serde::Deserialize;

use super::ValidationError;

/// Fields for creating a pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPattern {
    pub title: String,
    pub description: String,
    /// beginner, intermediate, advanced
    pub difficulty: String,
    /// scarf, hat, sweater, ...
    pub category: String,
    pub yarn_weight: Option<String>,
    pub needle_size: Option<String>,
    pub estimated_time: Option<String>,
    pub author_id: i64,
    pub image_url: Option<String>,
    pub pattern_file_url: Option<String>,
}

/// Text fields of a pattern form, gathered before conversion
#[derive(Debug, Clone, Default)]
pub struct PatternFields {
    title: Option<String>,
    description: Option<String>,
    difficulty: Option<String>,
    category: Option<String>,
    yarn_weight: Option<String>,
    needle_size: Option<String>,
    estimated_time: Option<String>,
    author_id: Option<String>,
}

impl PatternFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text field. Returns `false` for names the form does not use.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "difficulty" => &mut self.difficulty,
            "category" => &mut self.category,
            "yarn_weight" => &mut self.yarn_weight,
            "needle_size" => &mut self.needle_size,
            "estimated_time" => &mut self.estimated_time,
            "author_id" => &mut self.author_id,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Convert into a [`NewPattern`] without attachments.
    pub fn into_new_pattern(self) -> Result<NewPattern, ValidationError> {
        let author_id = required(self.author_id, "author_id")?;
        let author_id = author_id.trim().parse::<i64>().map_err(|_| {
            ValidationError::InvalidFormat {
                field: "author_id",
                reason: "must be an integer",
            }
        })?;

        Ok(NewPattern {
            title: required(self.title, "title")?,
            description: required(self.description, "description")?,
            difficulty: required(self.difficulty, "difficulty")?,
            category: required(self.category, "category")?,
            yarn_weight: optional(self.yarn_weight),
            needle_size: optional(self.needle_size),
            estimated_time: optional(self.estimated_time),
            author_id,
            image_url: None,
            pattern_file_url: None,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value.ok_or(ValidationError::Missing { field })
}

// Browsers send empty strings for untouched optional inputs.
fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Optional filters for listing patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PatternFilter {
    pub difficulty: Option<String>,
    pub category: Option<String>,
}

impl PatternFilter {
    /// Empty strings mean "no filter".
    pub fn normalized(self) -> Self {
        Self {
            difficulty: self.difficulty.filter(|d| !d.is_empty()),
            category: self.category.filter(|c| !c.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> PatternFields {
        let mut fields = PatternFields::new();
        for (name, value) in [
            ("title", "Seed stitch cowl"),
            ("description", "Quick weekend knit"),
            ("difficulty", "beginner"),
            ("category", "scarf"),
            ("author_id", "7"),
        ] {
            assert!(fields.set(name, value.to_string()));
        }
        fields
    }

    #[test]
    fn converts_complete_form() {
        let pattern = full_form().into_new_pattern().unwrap();
        assert_eq!(pattern.title, "Seed stitch cowl");
        assert_eq!(pattern.author_id, 7);
        assert_eq!(pattern.yarn_weight, None);
        assert_eq!(pattern.image_url, None);
    }

    #[test]
    fn missing_required_field() {
        let mut fields = PatternFields::new();
        fields.set("author_id", "1".into());
        let err = fields.into_new_pattern().unwrap_err();
        assert!(matches!(err, ValidationError::Missing { field: "title" }));
    }

    #[test]
    fn author_id_must_be_integer() {
        let mut fields = full_form();
        fields.set("author_id", "seven".into());
        let err = fields.into_new_pattern().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { field: "author_id", .. }
        ));
    }

    #[test]
    fn empty_optionals_become_none() {
        let mut fields = full_form();
        fields.set("needle_size", String::new());
        fields.set("yarn_weight", "worsted".into());
        let pattern = fields.into_new_pattern().unwrap();
        assert_eq!(pattern.needle_size, None);
        assert_eq!(pattern.yarn_weight.as_deref(), Some("worsted"));
    }

    #[test]
    fn unknown_field_is_reported() {
        let mut fields = PatternFields::new();
        assert!(!fields.set("is_public", "false".into()));
    }

    #[test]
    fn filter_drops_empty_values() {
        let filter = PatternFilter {
            difficulty: Some(String::new()),
            category: Some("hat".into()),
        }
        .normalized();
        assert_eq!(filter.difficulty, None);
        assert_eq!(filter.category.as_deref(), Some("hat"));
    }
}
