//! Profile domain model.
//!
//! # Responsibility
//! - Define the biographical/entry record listed by the profile directory.
//! - Validate record shape before it reaches the repository.
//!
//! # Invariants
//! - `id` is stable and never reused for another profile.
//! - `name` is never blank.
//! - `entry_date` is an ISO `YYYY-MM-DD` calendar date.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a profile record.
pub type ProfileId = Uuid;

pub const MAX_PROFILE_AGE: u32 = 130;

/// Case status shown in the listing badge column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Active,
    UnderInvestigation,
    PendingVerification,
}

impl ProfileStatus {
    pub const ALL: [ProfileStatus; 3] = [
        ProfileStatus::Active,
        ProfileStatus::UnderInvestigation,
        ProfileStatus::PendingVerification,
    ];

    /// Storage/wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::UnderInvestigation => "under_investigation",
            Self::PendingVerification => "pending_verification",
        }
    }

    /// Human label used by the listing.
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::UnderInvestigation => "Under Investigation",
            Self::PendingVerification => "Pending Verification",
        }
    }

    /// Accepts either the storage token or the human label, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Validation failures for profile records and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileValidationError {
    NilId,
    EmptyName,
    AgeOutOfRange(u32),
    InvalidDate { field: &'static str, value: String },
    InvalidPassport(String),
    InvalidContact(String),
    EntryBeforeBirth { birth: String, entry: String },
}

impl Display for ProfileValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "profile id must not be nil"),
            Self::EmptyName => write!(f, "profile name must not be empty"),
            Self::AgeOutOfRange(age) => {
                write!(f, "age ({age}) must be <= {MAX_PROFILE_AGE}")
            }
            Self::InvalidDate { field, value } => {
                write!(f, "{field} must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidPassport(value) => write!(f, "invalid passport number `{value}`"),
            Self::InvalidContact(value) => write!(f, "invalid contact number `{value}`"),
            Self::EntryBeforeBirth { birth, entry } => {
                write!(f, "entry_date ({entry}) must be >= date_of_birth ({birth})")
            }
        }
    }
}

impl Error for ProfileValidationError {}

/// Listing record for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub alias: String,
    pub gender: Gender,
    pub age: u32,
    pub entry_point: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub entry_date: String,
    pub occupation: String,
    pub criminal_background: bool,
    pub status: ProfileStatus,
    /// Unix epoch milliseconds.
    pub last_updated_ms: i64,
}

impl Profile {
    pub fn new(name: impl Into<String>, gender: Gender, age: u32) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            alias: derive_alias(&name),
            name,
            gender,
            age,
            entry_point: String::new(),
            entry_date: String::new(),
            occupation: String::new(),
            criminal_background: false,
            status: ProfileStatus::PendingVerification,
            last_updated_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.id.is_nil() {
            return Err(ProfileValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if self.age > MAX_PROFILE_AGE {
            return Err(ProfileValidationError::AgeOutOfRange(self.age));
        }
        if !self.entry_date.is_empty() && !is_iso_date(&self.entry_date) {
            return Err(ProfileValidationError::InvalidDate {
                field: "entry_date",
                value: self.entry_date.clone(),
            });
        }
        Ok(())
    }

    /// Case-insensitive match against name, alias, occupation and entry point.
    ///
    /// A blank term matches every profile.
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.name, &self.alias, &self.occupation, &self.entry_point]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Initials of the first two words, upper-cased (`"John Smith"` -> `"JS"`).
pub fn derive_alias(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Loose `YYYY-MM-DD` shape check with month/day ranges.
pub fn is_iso_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() != 3 || parts[0].len() != 4 || parts[1].len() != 2 || parts[2].len() != 2 {
        return false;
    }
    let parsed: Option<Vec<u32>> = parts.iter().map(|part| part.parse().ok()).collect();
    match parsed.as_deref() {
        Some([_, month, day]) => (1..=12).contains(month) && (1..=31).contains(day),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{derive_alias, is_iso_date, Gender, Profile, ProfileStatus};

    #[test]
    fn status_parse_accepts_labels_and_tokens() {
        assert_eq!(
            ProfileStatus::parse("Under Investigation"),
            Some(ProfileStatus::UnderInvestigation)
        );
        assert_eq!(
            ProfileStatus::parse("pending_verification"),
            Some(ProfileStatus::PendingVerification)
        );
        assert_eq!(ProfileStatus::parse("all"), None);
    }

    #[test]
    fn alias_uses_initials() {
        assert_eq!(derive_alias("maria garcia"), "MG");
        assert_eq!(derive_alias("Li"), "L");
        assert_eq!(derive_alias("  "), "");
    }

    #[test]
    fn iso_date_rejects_bad_shapes() {
        assert!(is_iso_date("2024-01-18"));
        assert!(!is_iso_date("2024-13-01"));
        assert!(!is_iso_date("18/01/2024"));
    }

    #[test]
    fn search_matches_entry_point_case_insensitively() {
        let mut profile = Profile::new("Li Wei", Gender::Male, 29);
        profile.entry_point = "North Sector".to_string();
        assert!(profile.matches_search("north"));
        assert!(profile.matches_search(""));
        assert!(!profile.matches_search("south"));
    }

    #[test]
    fn search_folds_non_ascii_letters() {
        let profile = Profile::new("Émile Örsted", Gender::Male, 41);
        assert!(profile.matches_search("émile"));
        assert!(profile.matches_search("ÖRSTED"));
        assert!(!profile.matches_search("emile"));
    }
}
