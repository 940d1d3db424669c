//! Field rules for user records.
//!
//! Each rule is a pure function usable as a `validator` custom rule. Lengths
//! are counted in UTF-8 bytes.

use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub const FIRST_NAME_LEN: (usize, usize) = (2, 20);
pub const LAST_NAME_LEN: (usize, usize) = (4, 40);
pub const NICK_NAME_LEN: (usize, usize) = (4, 20);

pub fn validate_first_name(first_name: &str) -> Result<(), ValidationError> {
    check_length(first_name, FIRST_NAME_LEN, "first_name_length", "firstname")
}

pub fn validate_last_name(last_name: &str) -> Result<(), ValidationError> {
    check_length(last_name, LAST_NAME_LEN, "last_name_length", "lastname")
}

pub fn validate_nick_name(nick_name: &str) -> Result<(), ValidationError> {
    check_length(nick_name, NICK_NAME_LEN, "nick_name_length", "nickname")
}

/// Exactly one `@`, and exactly one `.` in the host part.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let Some((_, host)) = email.split_once('@') else {
        return Err(rule("email_at", "an email should contain one '@'"));
    };
    if host.contains('@') {
        return Err(rule("email_at", "an email should contain one '@'"));
    }
    if host.matches('.').count() != 1 {
        return Err(rule(
            "email_host",
            "an email should contain one '.' in the host part",
        ));
    }
    Ok(())
}

/// Flattens validator output into one reason string, ordered by field name.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut reasons: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", error.code),
            })
        })
        .collect();
    reasons.sort();
    reasons.join("; ")
}

fn check_length(
    value: &str,
    (min, max): (usize, usize),
    code: &'static str,
    label: &str,
) -> Result<(), ValidationError> {
    let len = value.len();
    if len < min || len > max {
        return Err(ValidationError::new(code).with_message(Cow::Owned(format!(
            "{label} should have a length between {min} and {max}"
        ))));
    }
    Ok(())
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}
