//! Credential rules for registration and login.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, CoreResult};
use crate::models::auth::UserField;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9._%+-]*@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Check registration input before any store access.
pub fn validate_registration(username: &str, email: &str, password: &str) -> CoreResult<()> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(CoreError::validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !is_valid_email(email) {
        return Err(CoreError::validation("Invalid email address"));
    }
    Ok(())
}

/// Which column a login identifier refers to.
pub fn login_field(account: &str) -> UserField {
    if account.contains('@') {
        UserField::Email
    } else {
        UserField::Username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accepts_reasonable_input() {
        assert!(validate_registration("ada", "ada@example.com", "secret1").is_ok());
    }

    #[test]
    fn rejects_short_fields_and_bad_email() {
        for (u, e, p) in [
            ("ad", "ada@example.com", "secret1"),
            ("ada", "ada@example.com", "12345"),
            ("ada", "ada.example.com", "secret1"),
            ("ada", "ada@example", "secret1"),
            ("ada", ".ada@example.com", "secret1"),
        ] {
            let err = validate_registration(u, e, p).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{u} {e} {p}");
        }
    }

    #[test]
    fn login_identifier_picks_column() {
        assert_eq!(login_field("ada"), UserField::Username);
        assert_eq!(login_field("ada@example.com"), UserField::Email);
    }
}
