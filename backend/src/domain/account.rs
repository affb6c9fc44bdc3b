//! Accounts: the identity record shared by donors and hospitals.
//!
//! One email maps to one account and one role. The role decides which
//! profile the account owns and which portal it may sign in to.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by account primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// The account identifier is not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// The email address is blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address does not look like `local@domain.tld`.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// The role is neither `donor` nor `hospital`.
    #[error("role must be one of: donor, hospital")]
    UnknownRole,
}

/// Stable account identifier issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Parse an identifier from its textual UUID form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        Uuid::parse_str(raw.as_ref().trim())
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }

    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Normalised (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use bloodlink::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ward@CityHospital.org ").unwrap();
    /// assert_eq!(email.as_ref(), "ward@cityhospital.org");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(AccountValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Portal an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Registers as a blood donor.
    Donor,
    /// Registers as a hospital issuing blood requests.
    Hospital,
}

impl Role {
    /// Lowercase wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Hospital => "hospital",
        }
    }

    /// The counterpart role.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Donor => Self::Hospital,
            Self::Hospital => Self::Donor,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donor" => Ok(Self::Donor),
            "hospital" => Ok(Self::Hospital),
            _ => Err(AccountValidationError::UnknownRole),
        }
    }
}

/// Registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Identity-provider issued identifier.
    pub id: AccountId,
    /// Sign-in email; unique across both roles.
    pub email: EmailAddress,
    /// Portal the account belongs to.
    pub role: Role,
    /// Set once the role-specific profile has been saved.
    pub profile_completed: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// A freshly registered account without a profile.
    #[must_use]
    pub const fn register(id: AccountId, email: EmailAddress, role: Role, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            role,
            profile_completed: false,
            created_at,
        }
    }

    /// Where the client should go after signing in.
    #[must_use]
    pub const fn next_step(&self) -> NextStep {
        if self.profile_completed {
            NextStep::Dashboard
        } else {
            NextStep::ProfileSetup
        }
    }
}

/// Routing hint returned after a successful sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    /// The role-specific profile has not been saved yet.
    ProfileSetup,
    /// The account can use its dashboard.
    Dashboard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("donor@example.com", "donor@example.com")]
    #[case("  Mixed.Case@Example.ORG ", "mixed.case@example.org")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", AccountValidationError::EmptyEmail)]
    #[case("   ", AccountValidationError::EmptyEmail)]
    #[case("no-at-sign", AccountValidationError::InvalidEmail)]
    #[case("user@nodot", AccountValidationError::InvalidEmail)]
    #[case("two words@example.com", AccountValidationError::InvalidEmail)]
    fn email_rejects_invalid_input(#[case] raw: &str, #[case] expected: AccountValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    #[case("donor", Role::Donor)]
    #[case("HOSPITAL", Role::Hospital)]
    fn role_parses_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[test]
    fn role_rejects_unknown_values() {
        assert_eq!("admin".parse::<Role>(), Err(AccountValidationError::UnknownRole));
    }

    #[test]
    fn other_role_is_symmetric() {
        assert_eq!(Role::Donor.other(), Role::Hospital);
        assert_eq!(Role::Hospital.other(), Role::Donor);
    }

    #[test]
    fn account_id_rejects_garbage() {
        assert_eq!(AccountId::new("nope"), Err(AccountValidationError::InvalidId));
    }

    #[test]
    fn next_step_follows_profile_completion() {
        let email = EmailAddress::new("a@b.co").expect("valid email");
        let mut account = Account::register(AccountId::random(), email, Role::Donor, Utc::now());
        assert_eq!(account.next_step(), NextStep::ProfileSetup);
        account.profile_completed = true;
        assert_eq!(account.next_step(), NextStep::Dashboard);
    }
}
