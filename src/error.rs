use std::fmt;

use thiserror::Error;

/// A named scrypt option, as it appears in an options mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    N,
    R,
    P,
    DkLen,
}

impl Param {
    /// The key used for this option in an options mapping.
    pub fn key(&self) -> &'static str {
        match self {
            Param::N => "N",
            Param::R => "r",
            Param::P => "p",
            Param::DkLen => "dkLen",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A request rejected by the admission checks.
///
/// Each variant names the first rule the request violated. Nothing was
/// derived; fix the input and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Salt must not be empty")]
    EmptySalt,

    #[error("Password length must not exceed 1024 bytes (got {0})")]
    PasswordTooLong(usize),

    #[error("Salt length must be between 8 and 32 bytes (got {0})")]
    SaltLength(usize),

    #[error("{0} parameter is required")]
    MissingParameter(Param),

    #[error("N must be a power of 2 (got {0})")]
    NotPowerOfTwo(i64),

    #[error("N must be between 2 and 2^24 (got {0})")]
    NOutOfRange(i64),

    #[error("r must be between 1 and 256 (got {0})")]
    ROutOfRange(i64),

    #[error("p must be between 1 and 256 (got {0})")]
    POutOfRange(i64),

    #[error("dkLen must be between 1 and 64 (got {0})")]
    DkLenOutOfRange(i64),

    #[error("r * p must be less than 2^30 (got {0})")]
    BlockBudgetExceeded(i64),
}

/// Which input of a call shape failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Password,
    Salt,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Password => f.write_str("password"),
            Field::Salt => f.write_str("salt"),
        }
    }
}

/// Coarse classification of a [`ScryptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied malformed or unsafe input.
    InvalidInput,
    /// The host could not provide the memory the parameters require.
    ResourceExhausted,
    /// The scrypt primitive failed unexpectedly.
    Internal,
}

#[derive(Debug, Error)]
pub enum ScryptError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid base64 {field}: {reason}")]
    Encoding { field: Field, reason: String },

    #[error("Failed to allocate memory for scrypt operation")]
    OutOfMemory,

    #[error("Scrypt operation failed: {0}")]
    Primitive(String),
}

impl ScryptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScryptError::Validation(_) | ScryptError::Encoding { .. } => ErrorKind::InvalidInput,
            ScryptError::OutOfMemory => ErrorKind::ResourceExhausted,
            ScryptError::Primitive(_) => ErrorKind::Internal,
        }
    }

    /// Returns the violated admission rule, if this is a validation error.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ScryptError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScryptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_the_mapping_key() {
        let err = ValidationError::MissingParameter(Param::DkLen);
        assert_eq!(err.to_string(), "dkLen parameter is required");
    }

    #[test]
    fn out_of_memory_has_fixed_message() {
        assert_eq!(
            ScryptError::OutOfMemory.to_string(),
            "Failed to allocate memory for scrypt operation"
        );
    }

    #[test]
    fn kinds_separate_caller_and_environment_failures() {
        let validation: ScryptError = ValidationError::EmptySalt.into();
        assert_eq!(validation.kind(), ErrorKind::InvalidInput);
        assert_eq!(ScryptError::OutOfMemory.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(
            ScryptError::Primitive("boom".into()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            validation.validation(),
            Some(&ValidationError::EmptySalt)
        );
    }
}
