//! Detailed profile form draft.
//!
//! # Responsibility
//! - Hold the full intake form (personal, entry, legal sections).
//! - Validate free-text identifiers and date ordering.
//! - Report form completion progress.
//!
//! # Invariants
//! - `completion_percent()` is always within `0..=100`.
//! - Checkbox groups (languages/locations/id proofs) never contain duplicates.

use crate::model::profile::{
    derive_alias, is_iso_date, Gender, Profile, ProfileValidationError, MAX_PROFILE_AGE,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static PASSPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][0-9]{7,8}$").expect("valid passport regex"));
static CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()\-]+$").expect("valid contact regex"));

const MIN_CONTACT_DIGITS: usize = 7;
/// Dates of birth/entry plus the language and location groups.
const EXTRA_PROGRESS_FIELDS: usize = 4;

/// Court proceedings state for the legal section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtProceedings {
    #[default]
    NotApplicable,
    Pending,
    Ongoing,
    Concluded,
}

/// Mode of entry recorded by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    Land,
    Sea,
    Air,
}

/// Full intake form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub alias: String,
    pub father_name: String,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub contact: String,
    pub passport: String,
    pub visa: String,
    pub physical: String,
    pub occupation: String,
    pub entry_mode: Option<EntryMode>,
    pub entry_point: String,
    pub assisting: String,
    pub support_network: String,
    pub last_stay: String,
    pub native_address: String,
    pub case_details: String,
    pub detained_by: String,
    pub court_proceedings: Option<CourtProceedings>,
    pub embassy_details: String,
    pub remarks: String,
    pub date_of_birth: Option<String>,
    pub entry_date: Option<String>,
    pub languages: Vec<String>,
    pub locations: Vec<String>,
    pub id_proofs: Vec<String>,
    pub criminal_background: bool,
    pub embassy_contacted: bool,
}

impl ProfileDraft {
    /// Checks the draft before it can become a profile.
    ///
    /// # Errors
    /// - `EmptyName` for blank names.
    /// - `AgeOutOfRange` for ages above the supported maximum.
    /// - `InvalidPassport`/`InvalidContact` for malformed identifiers.
    /// - `InvalidDate`/`EntryBeforeBirth` for malformed or reversed dates.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyName);
        }
        if let Some(age) = self.age {
            if age > MAX_PROFILE_AGE {
                return Err(ProfileValidationError::AgeOutOfRange(age));
            }
        }

        let passport = self.passport.trim();
        if !passport.is_empty() && !PASSPORT_RE.is_match(passport) {
            return Err(ProfileValidationError::InvalidPassport(passport.to_string()));
        }

        let contact = self.contact.trim();
        if !contact.is_empty() {
            let digits = contact.chars().filter(char::is_ascii_digit).count();
            if !CONTACT_RE.is_match(contact) || digits < MIN_CONTACT_DIGITS {
                return Err(ProfileValidationError::InvalidContact(contact.to_string()));
            }
        }

        let birth = checked_date("date_of_birth", self.date_of_birth.as_deref())?;
        let entry = checked_date("entry_date", self.entry_date.as_deref())?;
        if let (Some(birth), Some(entry)) = (birth, entry) {
            // ISO dates order lexicographically.
            if entry < birth {
                return Err(ProfileValidationError::EntryBeforeBirth {
                    birth: birth.to_string(),
                    entry: entry.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Percentage of filled form fields, rounded to the nearest integer.
    pub fn completion_percent(&self) -> u8 {
        let text_fields = self.text_fields();
        let total = text_fields.len() + EXTRA_PROGRESS_FIELDS;
        let mut filled = text_fields.iter().filter(|filled| **filled).count();

        filled += usize::from(self.date_of_birth.is_some());
        filled += usize::from(self.entry_date.is_some());
        filled += usize::from(!self.languages.is_empty());
        filled += usize::from(!self.locations.is_empty());

        ((filled as f64 / total as f64) * 100.0).round() as u8
    }

    pub fn toggle_language(&mut self, language: &str) {
        toggle(&mut self.languages, language);
    }

    pub fn toggle_location(&mut self, location: &str) {
        toggle(&mut self.locations, location);
    }

    pub fn toggle_id_proof(&mut self, id_proof: &str) {
        toggle(&mut self.id_proofs, id_proof);
    }

    /// Applies the listing-relevant fields onto `profile`.
    ///
    /// Callers must validate the draft first.
    pub fn apply_to(&self, profile: &mut Profile) {
        profile.name = self.name.trim().to_string();
        profile.alias = if self.alias.trim().is_empty() {
            derive_alias(&profile.name)
        } else {
            self.alias.trim().to_string()
        };
        if let Some(gender) = self.gender {
            profile.gender = gender;
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        profile.entry_point = self.entry_point.trim().to_string();
        if let Some(entry_date) = &self.entry_date {
            profile.entry_date = entry_date.clone();
        }
        profile.occupation = self.occupation.trim().to_string();
        profile.criminal_background = self.criminal_background;
    }

    /// Builds a new listing record from this draft.
    pub fn to_profile(&self) -> Profile {
        let mut profile = Profile::new(
            self.name.trim(),
            self.gender.unwrap_or(Gender::Other),
            self.age.unwrap_or(0),
        );
        self.apply_to(&mut profile);
        profile
    }

    // Selects count as filled once chosen; text fields once non-blank.
    fn text_fields(&self) -> [bool; 20] {
        let text = |value: &String| !value.trim().is_empty();
        [
            text(&self.name),
            text(&self.alias),
            text(&self.father_name),
            self.gender.is_some(),
            text(&self.contact),
            text(&self.passport),
            text(&self.visa),
            text(&self.physical),
            text(&self.occupation),
            self.entry_mode.is_some(),
            text(&self.entry_point),
            text(&self.assisting),
            text(&self.support_network),
            text(&self.last_stay),
            text(&self.native_address),
            text(&self.case_details),
            text(&self.detained_by),
            self.court_proceedings.is_some(),
            text(&self.embassy_details),
            text(&self.remarks),
        ]
    }
}

fn checked_date<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<Option<&'a str>, ProfileValidationError> {
    match value {
        Some(date) if !is_iso_date(date) => Err(ProfileValidationError::InvalidDate {
            field,
            value: date.to_string(),
        }),
        other => Ok(other),
    }
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(index) = values.iter().position(|existing| existing == value) {
        values.remove(index);
    } else {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{CourtProceedings, ProfileDraft};
    use crate::model::profile::{Gender, ProfileStatus, ProfileValidationError};

    fn filled_draft() -> ProfileDraft {
        ProfileDraft {
            name: "John Smith".to_string(),
            gender: Some(Gender::Male),
            age: Some(32),
            contact: "+91 98765 43210".to_string(),
            passport: "A12345678".to_string(),
            date_of_birth: Some("1991-04-02".to_string()),
            entry_date: Some("2023-10-15".to_string()),
            ..ProfileDraft::default()
        }
    }

    #[test]
    fn empty_draft_has_zero_progress_and_full_draft_reaches_hundred() {
        assert_eq!(ProfileDraft::default().completion_percent(), 0);

        let mut draft = filled_draft();
        for field in [
            &mut draft.alias,
            &mut draft.father_name,
            &mut draft.visa,
            &mut draft.physical,
            &mut draft.occupation,
            &mut draft.entry_point,
            &mut draft.assisting,
            &mut draft.support_network,
            &mut draft.last_stay,
            &mut draft.native_address,
            &mut draft.case_details,
            &mut draft.detained_by,
            &mut draft.embassy_details,
            &mut draft.remarks,
        ] {
            *field = "x".to_string();
        }
        draft.entry_mode = Some(super::EntryMode::Land);
        draft.court_proceedings = Some(CourtProceedings::NotApplicable);
        draft.toggle_language("english");
        draft.toggle_location("delhi");
        assert_eq!(draft.completion_percent(), 100);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut draft = ProfileDraft::default();
        draft.toggle_id_proof("pan");
        draft.toggle_id_proof("voter");
        draft.toggle_id_proof("pan");
        assert_eq!(draft.id_proofs, vec!["voter".to_string()]);
    }

    #[test]
    fn validate_accepts_well_formed_draft() {
        filled_draft().validate().expect("draft should validate");
    }

    #[test]
    fn validate_rejects_malformed_passport_and_contact() {
        let mut draft = filled_draft();
        draft.passport = "12345".to_string();
        assert!(matches!(
            draft.validate(),
            Err(ProfileValidationError::InvalidPassport(_))
        ));

        let mut draft = filled_draft();
        draft.contact = "call me".to_string();
        assert!(matches!(
            draft.validate(),
            Err(ProfileValidationError::InvalidContact(_))
        ));
    }

    #[test]
    fn validate_rejects_entry_before_birth() {
        let mut draft = filled_draft();
        draft.entry_date = Some("1980-01-01".to_string());
        assert!(matches!(
            draft.validate(),
            Err(ProfileValidationError::EntryBeforeBirth { .. })
        ));
    }

    #[test]
    fn apply_to_records_background_without_touching_status() {
        let mut draft = filled_draft();
        draft.criminal_background = true;
        let mut profile = draft.to_profile();
        profile.status = ProfileStatus::Active;
        draft.apply_to(&mut profile);
        assert!(profile.criminal_background);
        assert_eq!(profile.status, ProfileStatus::Active);
        assert_eq!(profile.alias, "JS");
    }

    #[test]
    fn contact_allows_plus_only_as_country_prefix() {
        let mut draft = filled_draft();
        draft.contact = "+91 (987) 654-3210".to_string();
        draft.validate().expect("prefixed contact should validate");

        draft.contact = "987+6543210".to_string();
        assert!(matches!(
            draft.validate(),
            Err(ProfileValidationError::InvalidContact(_))
        ));
    }
}
