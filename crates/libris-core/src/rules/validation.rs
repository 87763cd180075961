//! Semantic validation of representations.
//!
//! Validators run after the structural check and report every failing field
//! at once, keyed by the external (camelCase) field name.

use std::collections::BTreeMap;

use serde_json::Value;
use uuid::Uuid;

use crate::model::author::MAX_NAME_LENGTH;
use crate::model::book::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use crate::representation::field;

/// Field path to messages. Empty means valid.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Checks a representation and reports every field error.
pub trait Validator {
    fn validate(&self, representation: &Value) -> ValidationErrors;
}

fn push(errors: &mut ValidationErrors, name: &str, message: String) {
    errors.entry(name.to_string()).or_default().push(message);
}

fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn text<'v>(representation: &'v Value, name: &str) -> Option<&'v str> {
    field(representation, name).and_then(Value::as_str)
}

fn require_text(errors: &mut ValidationErrors, representation: &Value, name: &str) {
    if text(representation, name).map_or(true, |s| s.trim().is_empty()) {
        push(errors, name, format!("The {} field is required.", display_name(name)));
    }
}

fn max_length(errors: &mut ValidationErrors, representation: &Value, name: &str, max: usize) {
    if let Some(value) = text(representation, name) {
        if value.chars().count() > max {
            push(
                errors,
                name,
                format!(
                    "The field {} must be a string with a maximum length of {}.",
                    display_name(name),
                    max
                ),
            );
        }
    }
}

/// Rules for the `AuthorForUpdate` input shape
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorForUpdateValidator;

impl Validator for AuthorForUpdateValidator {
    fn validate(&self, representation: &Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for name in ["firstName", "lastName"] {
            require_text(&mut errors, representation, name);
            max_length(&mut errors, representation, name, MAX_NAME_LENGTH);
        }
        errors
    }
}

/// Rules for both book creation shapes.
///
/// A body `authorId`, when present, must name the author in the route.
#[derive(Debug, Clone, Copy)]
pub struct BookForCreationValidator {
    pub route_author_id: Uuid,
    /// The page-count shape makes `amountOfPages` mandatory
    pub require_pages: bool,
}

impl Validator for BookForCreationValidator {
    fn validate(&self, representation: &Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        require_text(&mut errors, representation, "title");
        max_length(&mut errors, representation, "title", MAX_TITLE_LENGTH);
        max_length(&mut errors, representation, "description", MAX_DESCRIPTION_LENGTH);

        if self.require_pages {
            match field(representation, "amountOfPages").and_then(Value::as_i64) {
                None => push(
                    &mut errors,
                    "amountOfPages",
                    "The AmountOfPages field is required.".to_string(),
                ),
                Some(pages) if pages < 1 => push(
                    &mut errors,
                    "amountOfPages",
                    "The field AmountOfPages must be at least 1.".to_string(),
                ),
                Some(_) => {}
            }
        }

        if let Some(body_author) = text(representation, "authorId") {
            if Uuid::parse_str(body_author).ok() != Some(self.route_author_id) {
                push(
                    &mut errors,
                    "authorId",
                    "The AuthorId must match the author in the route.".to_string(),
                );
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_author_names_required() {
        let errors = AuthorForUpdateValidator.validate(&json!({"firstName": "  ", "lastName": null}));
        assert_eq!(errors["firstName"], vec!["The FirstName field is required.".to_string()]);
        assert_eq!(errors["lastName"], vec!["The LastName field is required.".to_string()]);
    }

    #[test]
    fn test_author_name_length() {
        let long = "x".repeat(151);
        let errors = AuthorForUpdateValidator.validate(&json!({"firstName": long, "lastName": "ok"}));
        assert_eq!(errors.len(), 1);
        assert!(errors["firstName"][0].contains("150"));

        let exact = "x".repeat(150);
        assert!(AuthorForUpdateValidator
            .validate(&json!({"firstName": exact, "lastName": "ok"}))
            .is_empty());
    }

    #[test]
    fn test_case_insensitive_field_names() {
        assert!(AuthorForUpdateValidator
            .validate(&json!({"FirstName": "Ann", "lastname": "Lee"}))
            .is_empty());
    }

    #[test]
    fn test_book_rules() {
        let author = Uuid::new_v4();
        let plain = BookForCreationValidator {
            route_author_id: author,
            require_pages: false,
        };
        assert!(plain.validate(&json!({"title": "T"})).is_empty());

        let errors = plain.validate(&json!({
            "title": "",
            "description": "d".repeat(2501),
            "authorId": Uuid::new_v4().to_string()
        }));
        assert_eq!(
            errors.keys().collect::<Vec<_>>(),
            vec!["authorId", "description", "title"]
        );

        let pages = BookForCreationValidator {
            route_author_id: author,
            require_pages: true,
        };
        let errors = pages.validate(&json!({"title": "T", "authorId": author.to_string()}));
        assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["amountOfPages"]);
        assert!(pages.validate(&json!({"title": "T", "amountOfPages": 300})).is_empty());
    }
}
