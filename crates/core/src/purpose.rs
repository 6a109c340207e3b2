//! Consent purposes - the fixed enumeration a consent can be granted for
//!
//! The dashboard only offers these purposes; anything else is rejected at
//! the point of submission, before any signing or network call.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Errors that can occur when parsing a consent purpose
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PurposeError {
    #[error("Purpose is required")]
    Empty,

    #[error("Unknown consent purpose: {0}")]
    Unknown(String),
}

/// Purpose of a consent grant
///
/// Serialized as the exact human-readable strings the platform uses, since
/// the purpose text is part of the signed consent message.
///
/// # Examples
/// ```
/// use medledger_core::ConsentPurpose;
///
/// let purpose: ConsentPurpose = "Insurance Provider Access".parse().unwrap();
/// assert_eq!(purpose, ConsentPurpose::InsuranceProviderAccess);
/// assert_eq!(purpose.to_string(), "Insurance Provider Access");
///
/// assert!("Anything else".parse::<ConsentPurpose>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum ConsentPurpose {
    #[strum(serialize = "Research Study Participation")]
    ResearchStudyParticipation,

    #[strum(serialize = "Data Sharing with Research Institution")]
    DataSharingWithResearchInstitution,

    #[strum(serialize = "Third-Party Analytics Access")]
    ThirdPartyAnalyticsAccess,

    #[strum(serialize = "Insurance Provider Access")]
    InsuranceProviderAccess,
}

impl ConsentPurpose {
    /// Parse a user-supplied purpose string, rejecting anything outside
    /// the enumeration
    pub fn parse(s: &str) -> Result<Self, PurposeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PurposeError::Empty);
        }
        s.parse::<ConsentPurpose>()
            .map_err(|_| PurposeError::Unknown(s.to_string()))
    }

    /// All purposes the platform accepts, in display order
    pub fn all() -> Vec<ConsentPurpose> {
        ConsentPurpose::iter().collect()
    }
}

impl TryFrom<String> for ConsentPurpose {
    type Error = PurposeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ConsentPurpose::parse(&s)
    }
}

impl From<ConsentPurpose> for String {
    fn from(p: ConsentPurpose) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_purposes() {
        assert_eq!(
            ConsentPurpose::parse("Research Study Participation").unwrap(),
            ConsentPurpose::ResearchStudyParticipation
        );
        assert_eq!(
            ConsentPurpose::parse("Insurance Provider Access").unwrap(),
            ConsentPurpose::InsuranceProviderAccess
        );
    }

    #[test]
    fn test_free_text_rejected() {
        let result = ConsentPurpose::parse("Marketing Outreach");
        assert!(matches!(result, Err(PurposeError::Unknown(_))));
    }

    #[test]
    fn test_empty_purpose_rejected() {
        assert_eq!(ConsentPurpose::parse(""), Err(PurposeError::Empty));
        assert_eq!(ConsentPurpose::parse("   "), Err(PurposeError::Empty));
    }

    #[test]
    fn test_display_is_exact() {
        assert_eq!(
            ConsentPurpose::ThirdPartyAnalyticsAccess.to_string(),
            "Third-Party Analytics Access"
        );
        assert_eq!(
            ConsentPurpose::DataSharingWithResearchInstitution.to_string(),
            "Data Sharing with Research Institution"
        );
    }

    #[test]
    fn test_all_purposes_listed() {
        let all = ConsentPurpose::all();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&ConsentPurpose::ResearchStudyParticipation));
    }

    #[test]
    fn test_serde_roundtrip() {
        for purpose in ConsentPurpose::all() {
            let json = serde_json::to_string(&purpose).unwrap();
            let parsed: ConsentPurpose = serde_json::from_str(&json).unwrap();
            assert_eq!(purpose, parsed);
        }
    }

    #[test]
    fn test_serde_rejects_unknown() {
        let result: Result<ConsentPurpose, _> =
            serde_json::from_str(r#""Totally Made Up""#);
        assert!(result.is_err());
    }
}
