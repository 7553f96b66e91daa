//! Validated identifier types shared across the chartview crates.
//!
//! Path segments arriving over HTTP are untrusted text. These types are the
//! only way an identifier enters the query layer: construction parses and
//! validates, so a `PatientId` or `EncounterId` in hand is always a plain
//! positive integer that can be bound as a query parameter.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace
    #[error("identifier cannot be empty")]
    Empty,
    /// The input was not a positive decimal integer
    #[error("identifier must be a positive integer, got {0:?}")]
    NotNumeric(String),
}

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            /// Parses an identifier from untrusted text.
            ///
            /// The input is trimmed; it must then be a non-empty string of
            /// ASCII digits representing a positive 64-bit integer.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` for blank input and
            /// `IdError::NotNumeric` for anything that is not a positive
            /// decimal integer.
            pub fn parse(input: impl AsRef<str>) -> Result<Self, IdError> {
                let trimmed = input.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(IdError::Empty);
                }
                let value: i64 = trimmed
                    .parse()
                    .map_err(|_| IdError::NotNumeric(trimmed.to_owned()))?;
                if value <= 0 {
                    return Err(IdError::NotNumeric(trimmed.to_owned()));
                }
                Ok(Self(value))
            }

            /// Returns the numeric value for query binding.
            pub fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i64(self.0)
            }
        }
    };
}

numeric_id!(
    /// A de-identified patient number (`patient_num` in the source schema).
    PatientId
);

numeric_id!(
    /// An encounter number, scoped to a patient (`encounter_num` in the
    /// source schema).
    EncounterId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_patient_id() {
        let id = PatientId::parse("34512").unwrap();
        assert_eq!(id.as_i64(), 34512);
        assert_eq!(id.to_string(), "34512");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = EncounterId::parse("  7 ").unwrap();
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(PatientId::parse(""), Err(IdError::Empty)));
        assert!(matches!(PatientId::parse("   "), Err(IdError::Empty)));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(PatientId::parse("42; DROP TABLE demographics").is_err());
        assert!(PatientId::parse("forty-two").is_err());
        assert!(PatientId::parse("4 2").is_err());
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        assert!(PatientId::parse("0").is_err());
        assert!(PatientId::parse("-7").is_err());
    }

    #[test]
    fn test_from_str_round_trip() {
        let id: EncounterId = "99".parse().unwrap();
        assert_eq!(i64::from(id), 99);
    }
}
