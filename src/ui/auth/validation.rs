// SPDX-License-Identifier: MPL-2.0
//! Local field validation mirroring the service's account rules.
//!
//! These checks run before submission so obviously malformed input never
//! reaches the network; the service remains the authority and its field
//! errors override anything decided here.

use super::FieldError;

/// Maximum username length accepted by the service.
pub const MAX_USERNAME_LEN: usize = 150;

/// Maximum email length accepted by the service.
pub const MAX_EMAIL_LEN: usize = 320;

/// Usernames may contain letters, digits and `@ . + - _`.
fn is_valid_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

/// Validates a username: required, bounded length, restricted charset.
pub fn username(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Key("validation-required"));
    }
    if value.chars().count() > MAX_USERNAME_LEN {
        return Some(FieldError::Key("validation-username-too-long"));
    }
    if !value.chars().all(is_valid_username_char) {
        return Some(FieldError::Key("validation-username-charset"));
    }
    None
}

/// Validates an email address: required, bounded length, plausible shape.
///
/// The shape check is deliberately loose (one `@` with non-empty local part
/// and a dotted domain); the service performs the real validation.
pub fn email(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        return Some(FieldError::Key("validation-required"));
    }
    if value.chars().count() > MAX_EMAIL_LEN {
        return Some(FieldError::Key("validation-email-too-long"));
    }

    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    let plausible = !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.');

    if !plausible {
        return Some(FieldError::Key("validation-email-invalid"));
    }
    None
}

/// Validates that a required field is present.
pub fn required(value: &str) -> Option<FieldError> {
    if value.is_empty() {
        Some(FieldError::Key("validation-required"))
    } else {
        None
    }
}

/// Validates the confirmation copy of a password.
pub fn password_confirmation(password: &str, confirmation: &str) -> Option<FieldError> {
    if confirmation.is_empty() {
        return Some(FieldError::Key("validation-required"));
    }
    if password != confirmation {
        return Some(FieldError::Key("validation-password-mismatch"));
    }
    None
}
