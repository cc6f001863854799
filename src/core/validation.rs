//! Validation of user-supplied sheet credentials
//!
//! Names and passwords for new sheets share one rule set: they must not
//! look like a command (leading `/`) and must be at least three bytes long.
//! Sheet IDs must be hyphenated UUIDs.
//!
//! The `Display` text of every [`ValidationError`] is the exact reply shown
//! to the user, so handlers can forward it unchanged.

use thiserror::Error;
use uuid::Uuid;

use crate::core::config::validation::{MIN_SHEET_NAME_LEN, MIN_SHEET_PASSWORD_LEN};
use crate::core::messages;

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", messages::INCORRECT_NEW_SHEET_NAME_SLASH)]
    SheetNameStartsWithSlash,

    #[error("{}", messages::INCORRECT_NEW_SHEET_NAME_TOO_SHORT)]
    SheetNameTooShort,

    #[error("{}", messages::INCORRECT_NEW_PASSWORD_SLASH)]
    SheetPasswordStartsWithSlash,

    #[error("{}", messages::INCORRECT_NEW_PASSWORD_TOO_SHORT)]
    SheetPasswordTooShort,

    #[error("{}", messages::INCORRECT_SHEET_ID_FORMAT)]
    MalformedSheetId,
}

/// Validates the name of a sheet about to be created.
///
/// # Examples
/// ```
/// use budgetbot::core::validation::validate_new_sheet_name;
///
/// assert!(validate_new_sheet_name("Budget").is_ok());
/// assert!(validate_new_sheet_name("ab").is_err());
/// assert!(validate_new_sheet_name("/listSheets").is_err());
/// ```
pub fn validate_new_sheet_name(name: &str) -> Result<(), ValidationError> {
    if name.starts_with('/') {
        return Err(ValidationError::SheetNameStartsWithSlash);
    }

    if name.len() < MIN_SHEET_NAME_LEN {
        return Err(ValidationError::SheetNameTooShort);
    }

    Ok(())
}

/// Validates the password of a sheet about to be created.
///
/// Same rules as [`validate_new_sheet_name`], different messages.
pub fn validate_new_sheet_password(password: &str) -> Result<(), ValidationError> {
    if password.starts_with('/') {
        return Err(ValidationError::SheetPasswordStartsWithSlash);
    }

    if password.len() < MIN_SHEET_PASSWORD_LEN {
        return Err(ValidationError::SheetPasswordTooShort);
    }

    Ok(())
}

/// Parses a sheet ID typed by the user.
///
/// Only the hyphenated form `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` is
/// accepted (the form shown when a sheet is created); surrounding
/// whitespace is ignored.
///
/// # Examples
/// ```
/// use budgetbot::core::validation::parse_sheet_id;
///
/// assert!(parse_sheet_id("e72e1f4c-fb53-4455-9f0e-a1e9d0e1bc4d").is_ok());
/// assert!(parse_sheet_id("e72e1f4cfb5344559f0ea1e9d0e1bc4d").is_err());
/// assert!(parse_sheet_id("my sheet").is_err());
/// ```
pub fn parse_sheet_id(text: &str) -> Result<Uuid, ValidationError> {
    let candidate = text.trim();
    if candidate.len() != 36 {
        return Err(ValidationError::MalformedSheetId);
    }
    Uuid::try_parse(candidate).map_err(|_| ValidationError::MalformedSheetId)
}
