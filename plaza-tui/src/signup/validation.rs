use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::form::{FormField, SignUpForm};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Loose `local@domain.tld` shape: no whitespace, no extra `@`
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

pub const FIRST_NAME_REQUIRED: &str = "First name is required";
pub const LAST_NAME_REQUIRED: &str = "Last name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const CONFIRM_PASSWORD_REQUIRED: &str = "Please confirm your password";
pub const EMAIL_INVALID: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORDS_MISMATCH: &str = "Passwords do not match";

/// Field-level messages plus an optional submission-level banner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<FormField, String>,
    submit: Option<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors consisting of a single banner message
    pub fn submit_only(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            submit: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.submit.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn submit(&self) -> Option<&str> {
        self.submit.as_deref()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    /// Drop the message for one field; returns whether there was one
    pub fn clear_field(&mut self, field: FormField) -> bool {
        self.fields.remove(&field).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.fields.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate the form. Every rule runs; a later rule overwrites an earlier
/// message for the same field. An empty result means the form is valid.
pub fn validate(form: &SignUpForm) -> FormErrors {
    let mut errors = FormErrors::new();

    // Required fields
    if form.first_name.trim().is_empty() {
        errors.insert(FormField::FirstName, FIRST_NAME_REQUIRED);
    }
    if form.last_name.trim().is_empty() {
        errors.insert(FormField::LastName, LAST_NAME_REQUIRED);
    }
    if form.email.trim().is_empty() {
        errors.insert(FormField::Email, EMAIL_REQUIRED);
    }
    if form.password.trim().is_empty() {
        errors.insert(FormField::Password, PASSWORD_REQUIRED);
    }
    // Confirmation is checked as typed, not trimmed
    if form.confirm_password.is_empty() {
        errors.insert(FormField::ConfirmPassword, CONFIRM_PASSWORD_REQUIRED);
    }

    if !form.email.is_empty() && !is_valid_email(&form.email) {
        errors.insert(FormField::Email, EMAIL_INVALID);
    }

    if !form.password.is_empty() && form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(FormField::Password, PASSWORD_TOO_SHORT);
    }

    if form.password != form.confirm_password {
        errors.insert(FormField::ConfirmPassword, PASSWORDS_MISMATCH);
    }

    errors
}
