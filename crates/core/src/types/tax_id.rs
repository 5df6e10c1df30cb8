//! Tax registration number (CNPJ) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TaxIdError {
    /// The input string is empty after trimming.
    #[error("tax id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("tax id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A company tax registration number (CNPJ).
///
/// Stored as entered, minus surrounding whitespace. The exact string is the
/// uniqueness key: `"11.222.333/0001-44"` and `"11222333000144"` are treated
/// as different registrations, matching how the ids were captured upstream.
///
/// ## Examples
///
/// ```
/// use quitanda_core::TaxId;
///
/// assert!(TaxId::parse("11.222.333/0001-44").is_ok());
/// assert!(TaxId::parse("  11222333000144  ").is_ok()); // trimmed
/// assert!(TaxId::parse("   ").is_err());               // empty
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Maximum length of a tax id. Formatted CNPJs are 18 characters; the
    /// cap leaves room without admitting junk.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `TaxId` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Self::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(TaxIdError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(TaxIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the tax id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `TaxId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatted_cnpj() {
        let id = TaxId::parse("11.222.333/0001-44").unwrap();
        assert_eq!(id.as_str(), "11.222.333/0001-44");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = TaxId::parse("  11222333000144  ").unwrap();
        assert_eq!(id.as_str(), "11222333000144");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(TaxId::parse(""), Err(TaxIdError::Empty)));
        assert!(matches!(TaxId::parse("   "), Err(TaxIdError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "9".repeat(33);
        assert!(matches!(
            TaxId::parse(&long),
            Err(TaxIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_formatting_is_significant() {
        let formatted = TaxId::parse("11.222.333/0001-44").unwrap();
        let bare = TaxId::parse("11222333000144").unwrap();
        assert_ne!(formatted, bare);
    }

    #[test]
    fn test_display() {
        let id = TaxId::parse("11.222.333/0001-44").unwrap();
        assert_eq!(format!("{id}"), "11.222.333/0001-44");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = TaxId::parse("11.222.333/0001-44").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"11.222.333/0001-44\"");

        let parsed: TaxId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
