//! Authentication primitives such as sign-in credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{AccountValidationError, EmailAddress};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// The email is missing or malformed.
    Email(AccountValidationError),
    /// The password is shorter than [`PASSWORD_MIN_LEN`].
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated sign-up or sign-in credentials.
///
/// ## Invariants
/// - `email` is normalised by [`EmailAddress::new`].
/// - `password` is at least [`PASSWORD_MIN_LEN`] characters and keeps any
///   caller-provided whitespace. It is wiped from memory on drop.
///
/// # Examples
/// ```
/// use bloodlink::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("donor@example.com", "hunter22").unwrap();
/// assert_eq!(creds.email().as_ref(), "donor@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = EmailAddress::new(email).map_err(CredentialsValidationError::Email)?;
        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(CredentialsValidationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret1", CredentialsValidationError::Email(AccountValidationError::EmptyEmail))]
    #[case("bad", "secret1", CredentialsValidationError::Email(AccountValidationError::InvalidEmail))]
    #[case("a@b.co", "12345", CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN_LEN })]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = Credentials::try_from_parts(email, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let creds = Credentials::try_from_parts("a@b.co", "topsecret").expect("valid credentials");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("a@b.co"));
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = Credentials::try_from_parts("a@b.co", " spaced ").expect("valid credentials");
        assert_eq!(creds.password(), " spaced ");
    }
}
