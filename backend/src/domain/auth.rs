//! Authentication primitives: registration forms and login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! The `Display` text of each validation error is the message shown to the
//! web client.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, PersonName, UserValidationError};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Domain error returned when a registration payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// At least one field was missing or blank.
    MissingFields,
    /// The email did not look like an address.
    InvalidEmail,
    /// A name exceeded the allowed length.
    NameTooLong { max: usize },
    /// Password shorter than [`MIN_PASSWORD_LEN`].
    PasswordTooShort,
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Please enter all required fields."),
            Self::InvalidEmail => write!(f, "Please enter a valid email address."),
            Self::NameTooLong { max } => {
                write!(f, "Names must be at most {max} characters.")
            }
            Self::PasswordTooShort => write!(
                f,
                "Please enter a password of at least {MIN_PASSWORD_LEN} characters."
            ),
            Self::PasswordMismatch => write!(f, "Please enter the same password twice."),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration request.
///
/// ## Invariants
/// - Names are trimmed and non-empty.
/// - `email` is lower-cased.
/// - `password` has at least [`MIN_PASSWORD_LEN`] characters and matched its
///   confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw form fields.
    ///
    /// # Examples
    /// ```
    /// use lister::domain::Registration;
    ///
    /// let form = Registration::try_from_parts(
    ///     "Ada", "Lovelace", "ada@example.com", "analytical", "analytical",
    /// )
    /// .unwrap();
    /// assert_eq!(form.email().as_ref(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        password_verify: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let required = [first_name, last_name, email];
        if required.iter().any(|field| field.trim().is_empty())
            || password.is_empty()
            || password_verify.is_empty()
        {
            return Err(RegistrationValidationError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        if password != password_verify {
            return Err(RegistrationValidationError::PasswordMismatch);
        }

        let first_name = PersonName::new(first_name).map_err(map_name_error)?;
        let last_name = PersonName::new(last_name).map_err(map_name_error)?;
        let email =
            EmailAddress::new(email).map_err(|_| RegistrationValidationError::InvalidEmail)?;

        Ok(Self {
            first_name,
            last_name,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain-text password, zeroed on drop.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

fn map_name_error(error: UserValidationError) -> RegistrationValidationError {
    match error {
        UserValidationError::NameTooLong { max } => RegistrationValidationError::NameTooLong { max },
        _ => RegistrationValidationError::MissingFields,
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Please enter email."),
            Self::EmptyPassword => write!(f, "Please enter password."),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty but retains caller-provided whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Lower-cased email suitable for account lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Lovelace", "ada@example.com", "analytical", "analytical", RegistrationValidationError::MissingFields)]
    #[case("Ada", "  ", "ada@example.com", "analytical", "analytical", RegistrationValidationError::MissingFields)]
    #[case("Ada", "Lovelace", "", "analytical", "analytical", RegistrationValidationError::MissingFields)]
    #[case("Ada", "Lovelace", "ada@example.com", "", "analytical", RegistrationValidationError::MissingFields)]
    #[case("Ada", "Lovelace", "ada@example.com", "short", "short", RegistrationValidationError::PasswordTooShort)]
    #[case("Ada", "Lovelace", "ada@example.com", "analytical", "analytics!", RegistrationValidationError::PasswordMismatch)]
    #[case("Ada", "Lovelace", "not-an-email", "analytical", "analytical", RegistrationValidationError::InvalidEmail)]
    fn invalid_registrations(
        #[case] first: &str,
        #[case] last: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] verify: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_from_parts(first, last, email, password, verify)
            .expect_err("invalid registration must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn registration_messages_match_client_copy() {
        assert_eq!(
            RegistrationValidationError::MissingFields.to_string(),
            "Please enter all required fields."
        );
        assert_eq!(
            RegistrationValidationError::PasswordTooShort.to_string(),
            "Please enter a password of at least 8 characters."
        );
        assert_eq!(
            RegistrationValidationError::PasswordMismatch.to_string(),
            "Please enter the same password twice."
        );
    }

    #[rstest]
    fn registration_normalises_fields() {
        let form = Registration::try_from_parts(
            " Ada ",
            "Lovelace",
            "ADA@Example.com",
            "analytical",
            "analytical",
        )
        .expect("valid registration");
        assert_eq!(form.first_name().as_ref(), "Ada");
        assert_eq!(form.email().as_ref(), "ada@example.com");
        assert_eq!(form.password(), "analytical");
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  Ada@Example.com  ", "secret", "ada@example.com")]
    #[case("grace@example.com", " correct horse ", "grace@example.com")]
    fn valid_credentials_normalise_email(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected_email: &str,
    ) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), expected_email);
        assert_eq!(creds.password(), password);
    }
}
