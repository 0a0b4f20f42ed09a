//! Schema validation for the feedback submission payload.
//!
//! The handler accepts the raw JSON value rather than a typed DTO so every
//! violation can be reported per field in one pass: a payload with a bad
//! rating and an oversized comment produces both errors, in declaration
//! order. Unknown fields are dropped silently.

use serde_json::Value;

use crate::domain::{
    FeedbackSubmission, MAX_COMMENT_CHARS, MAX_MAIN_CONTENT_CHARS, Rating,
};
use crate::models::FieldError;

/// Validate the submission payload, reporting every violation at once.
pub fn validate_feedback(body: &Value) -> Result<FeedbackSubmission, Vec<FieldError>> {
    let Some(map) = body.as_object() else {
        return Err(vec![FieldError::new(
            "body",
            "Request body must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();
    let rating = validate_rating(map.get("rating"), &mut errors);
    let main_content = validate_text(
        map.get("main_content"),
        "main_content",
        "Main content",
        MAX_MAIN_CONTENT_CHARS,
        &mut errors,
    );
    let comment = validate_text(
        map.get("comment"),
        "comment",
        "Comment",
        MAX_COMMENT_CHARS,
        &mut errors,
    );

    match (rating, errors.is_empty()) {
        (Some(rating), true) => Ok(FeedbackSubmission {
            rating,
            main_content,
            comment,
        }),
        _ => Err(errors),
    }
}

fn validate_rating(value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Rating> {
    let Some(value) = value else {
        errors.push(FieldError::new("rating", "Rating is required"));
        return None;
    };

    let integral = if let Some(integral) = value.as_i64() {
        integral
    } else if let Some(float) = value.as_f64() {
        if float.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&float) {
            float as i64
        } else {
            errors.push(FieldError::new("rating", "Rating must be an integer"));
            return None;
        }
    } else {
        errors.push(FieldError::new("rating", "Rating must be a number"));
        return None;
    };

    match Rating::new(integral) {
        Ok(rating) => Some(rating),
        Err(_) if integral < 1 => {
            errors.push(FieldError::new("rating", "Rating must be at least 1"));
            None
        }
        Err(_) => {
            errors.push(FieldError::new("rating", "Rating must be at most 5"));
            None
        }
    }
}

fn validate_text(
    value: Option<&Value>,
    field: &str,
    label: &str,
    max_chars: usize,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = value?;
    match value.as_str() {
        Some(text) if text.chars().count() <= max_chars => Some(text.to_owned()),
        Some(_) => {
            errors.push(FieldError::new(
                field,
                format!("{label} must not exceed {max_chars} characters"),
            ));
            None
        }
        None => {
            errors.push(FieldError::new(field, format!("{label} must be a string")));
            None
        }
    }
}
