//! Write-time field rules for new snippets.
//!
//! Both store backends run [`validate_new_snippet`] before writing, and
//! the service runs [`validate_text`] before calling the summarizer so
//! invalid input never costs a provider round trip.
//!
//! Values are trimmed before the rules apply, and the trimmed value is
//! what gets stored. Length is counted in Unicode scalar values.

use crate::error::{FieldError, ValidationErrors};

/// Minimum snippet text length, in characters, after trimming.
pub const MIN_TEXT_LEN: usize = 30;

pub const TEXT_REQUIRED: &str = "Text is required";
pub const TEXT_TOO_SHORT: &str = "Text must be at least 30 characters long";
pub const SUMMARY_REQUIRED: &str = "Summary is required";

/// Fields of a snippet that passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSnippet {
    pub text: String,
    pub summary: String,
}

fn check_text(text: Option<&str>) -> Result<String, FieldError> {
    let trimmed = text.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::new("text", TEXT_REQUIRED));
    }
    if trimmed.chars().count() < MIN_TEXT_LEN {
        return Err(FieldError::new("text", TEXT_TOO_SHORT));
    }
    Ok(trimmed.to_string())
}

fn check_summary(summary: Option<&str>) -> Result<String, FieldError> {
    let trimmed = summary.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::new("summary", SUMMARY_REQUIRED));
    }
    Ok(trimmed.to_string())
}

/// Validate snippet text alone, returning the trimmed value.
pub fn validate_text(text: Option<&str>) -> Result<String, ValidationErrors> {
    check_text(text).map_err(|e| ValidationErrors(vec![e]))
}

/// Validate both fields of a new snippet, collecting every violation.
pub fn validate_new_snippet(
    text: Option<&str>,
    summary: Option<&str>,
) -> Result<NewSnippet, ValidationErrors> {
    match (check_text(text), check_summary(summary)) {
        (Ok(text), Ok(summary)) => Ok(NewSnippet { text, summary }),
        (text, summary) => Err(ValidationErrors(
            [text.err(), summary.err()].into_iter().flatten().collect(),
        )),
    }
}
