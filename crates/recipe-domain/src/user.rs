//! User account rules.

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 5;

/// Maximum length of the e-mail and name columns.
pub const MAX_USER_FIELD_LEN: usize = 255;

/// Normalize an e-mail address by lower-casing the domain part.
///
/// The local part is case-sensitive per RFC 5321 and is kept as given.
/// Input without an `@` is returned unchanged (after trimming).
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

/// Returns `true` if the password satisfies [`MIN_PASSWORD_LEN`].
pub fn is_password_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Account flags. A superuser is always staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserFlags {
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl UserFlags {
    pub fn regular() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}
