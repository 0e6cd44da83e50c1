//! Pure field validators.
//!
//! Each validator maps a raw input value to either a normalized value or a
//! [`FieldError`] carrying the user-facing message. No validator touches the
//! UI; the orchestrator decides where verdicts are displayed.

use crate::config::{GithubMode, NameMode};

/// A field-scoped validation failure with its user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// Name input was empty after trimming.
    #[error("Please enter your name.")]
    EmptyName,
    /// Full-name mode requires an interior space.
    #[error("Please enter your first and last name.")]
    MissingSurname,
    /// First-name mode rejects interior spaces.
    #[error("Please enter your first name only.")]
    UnexpectedSurname,
    /// Email input was empty after trimming.
    #[error("Please enter your email.")]
    EmptyEmail,
    /// Email lacks an `@` character.
    #[error("Please enter a valid email containing \"@\".")]
    MissingAtSign,
    /// Email lacks the `gmail` substring.
    #[error("Please use a Google email (\"@gmail\").")]
    NotGoogleDomain,
    /// GitHub input was empty after trimming.
    #[error("Please enter your GitHub username.")]
    EmptyGithub,
    /// Strict GitHub mode requires the raw input to start with `@`.
    #[error("Please include \"@\" in your GitHub username.")]
    GithubMissingAt,
    /// No avatar file selected at submit time.
    #[error("Please select an avatar image.")]
    MissingFile,
    /// Selected file is not an image.
    #[error("Please select image files only.")]
    WrongType,
    /// Selected image exceeds the size limit.
    #[error("File too large. Please upload a photo under 500KB.")]
    TooLarge,
}

/// Validate the name field, returning the trimmed value.
pub fn validate_name(raw: &str, mode: NameMode) -> Result<String, FieldError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(FieldError::EmptyName);
    }
    match mode {
        NameMode::Full if !name.contains(' ') => Err(FieldError::MissingSurname),
        NameMode::First if name.contains(' ') => Err(FieldError::UnexpectedSurname),
        _ => Ok(name.to_string()),
    }
}

/// Validate the email field, returning the trimmed value.
///
/// This is a deliberately narrow policy check (substring presence), not
/// general email-format validation.
pub fn validate_email(raw: &str) -> Result<String, FieldError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(FieldError::EmptyEmail);
    }
    if !email.contains('@') {
        return Err(FieldError::MissingAtSign);
    }
    if !email.contains("gmail") {
        return Err(FieldError::NotGoogleDomain);
    }
    Ok(email.to_string())
}

/// Validate and normalize the GitHub handle.
///
/// Any run of leading `@` characters collapses to the single canonical one.
/// Strict mode checks the *original* trimmed input for a leading `@`, after
/// the stripped candidate has already been computed.
pub fn process_github_username(raw: &str, mode: GithubMode) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::EmptyGithub);
    }
    let stripped = trimmed.trim_start_matches('@');
    if mode == GithubMode::RequireAt && !trimmed.starts_with('@') {
        return Err(FieldError::GithubMissingAt);
    }
    Ok(format!("@{stripped}"))
}
