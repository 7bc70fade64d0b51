//! Profile directory use-case service.
//!
//! # Responsibility
//! - Provide listing, search, selection, form submission, refresh and export.
//! - Report user-visible outcomes through the injected `NotificationStore`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Selection only ever contains ids that were listed or created in-session.
//! - Notifications are produced only after the underlying mutation succeeded.

use crate::model::draft::ProfileDraft;
use crate::model::notification::NotificationKind;
use crate::model::profile::{
    derive_alias, Gender, Profile, ProfileId, ProfileStatus, ProfileValidationError,
};
use crate::notify::store::NotificationStore;
use crate::notify::toast::{ToastSurface, ToastVariant};
use crate::repo::profile_repo::{ProfileListQuery, ProfileRepository, RepoError, RepoResult};
use crate::time::now_epoch_ms;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Chance that a manual refresh discovers a new profile.
const REFRESH_NEW_PROFILE_PROBABILITY: f64 = 0.5;

#[derive(Debug)]
pub enum ProfileServiceError {
    Validation(ProfileValidationError),
    ProfileNotFound(ProfileId),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProfileNotFound(id) => write!(f, "profile not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent profile state: {details}")
            }
        }
    }
}

impl Error for ProfileServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProfileServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ProfileNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ProfileValidationError> for ProfileServiceError {
    fn from(value: ProfileValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Status filter of the listing page; `All` disables filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProfileStatus),
}

impl StatusFilter {
    /// Parses `all` or any status token/label.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        ProfileStatus::parse(value).map(Self::Only)
    }

    fn as_status(self) -> Option<ProfileStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

/// Listing result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilesListResult {
    /// Sorted by `last_updated DESC, id ASC`.
    pub items: Vec<Profile>,
    /// Rows in the directory before filtering.
    pub total: u64,
    pub selected_count: usize,
}

/// Output format offered by the export dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
    Excel,
    Json,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Excel => "EXCEL",
            Self::Json => "JSON",
        }
    }
}

/// Section toggles of the export dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub include_personal_info: bool,
    pub include_entry_details: bool,
    pub include_legal_status: bool,
    pub include_attachments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_personal_info: true,
            include_entry_details: true,
            include_legal_status: true,
            include_attachments: false,
        }
    }
}

impl ExportOptions {
    pub fn sections(&self) -> Vec<&'static str> {
        [
            (self.include_personal_info, "personal_info"),
            (self.include_entry_details, "entry_details"),
            (self.include_legal_status, "legal_status"),
            (self.include_attachments, "attachments"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }
}

/// Outcome of a simulated export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub format: ExportFormat,
    pub profile_count: usize,
    pub sections: Vec<&'static str>,
}

/// Outcome of a manual refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new profile was discovered and prepended to the listing.
    NewProfile(Profile),
    /// Nothing new; the listing was only re-read.
    Unchanged,
}

/// Profile directory facade over a repository implementation.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
    selected: BTreeSet<ProfileId>,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            selected: BTreeSet::new(),
        }
    }

    /// Lists profiles matching the search term and status filter.
    pub fn list(
        &self,
        search: &str,
        status: StatusFilter,
    ) -> Result<ProfilesListResult, ProfileServiceError> {
        let query = ProfileListQuery {
            search: Some(search.to_string()),
            status: status.as_status(),
            ..ProfileListQuery::default()
        };
        let items = self.repo.list_profiles(&query)?;
        Ok(ProfilesListResult {
            items,
            total: self.repo.count_profiles()?,
            selected_count: self.selected.len(),
        })
    }

    /// Toast text shown after submitting the search box.
    pub fn search_summary(
        &self,
        search: &str,
        status: StatusFilter,
    ) -> Result<String, ProfileServiceError> {
        let found = self.list(search, status)?.items.len();
        Ok(format!("Found {found} profiles matching \"{search}\""))
    }

    pub fn get(&self, id: ProfileId) -> RepoResult<Option<Profile>> {
        self.repo.get_profile(id)
    }

    /// Validates the draft, stores a new profile and notifies success.
    pub fn create_from_draft(
        &mut self,
        draft: &ProfileDraft,
        notifications: &mut NotificationStore,
    ) -> Result<Profile, ProfileServiceError> {
        draft.validate()?;
        let mut profile = draft.to_profile();
        profile.last_updated_ms = now_epoch_ms();

        let id = self.repo.create_profile(&profile)?;
        let created = self
            .repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::InconsistentState(
                "created profile not found in read-back",
            ))?;

        info!("event=profile_create module=service status=ok profile_id={id}");
        notifications.add(
            NotificationKind::Success,
            "Profile Created",
            "A new profile has been successfully created.",
        );
        Ok(created)
    }

    /// Applies the draft onto an existing profile and notifies success.
    pub fn update_from_draft(
        &mut self,
        id: ProfileId,
        draft: &ProfileDraft,
        notifications: &mut NotificationStore,
    ) -> Result<Profile, ProfileServiceError> {
        draft.validate()?;
        let mut profile = self
            .repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::ProfileNotFound(id))?;
        draft.apply_to(&mut profile);
        profile.last_updated_ms = now_epoch_ms();
        self.repo.update_profile(&profile)?;

        info!("event=profile_update module=service status=ok profile_id={id}");
        notifications.add(
            NotificationKind::Success,
            "Profile Updated",
            format!("Profile #{id} has been successfully updated."),
        );
        Ok(profile)
    }

    /// Sets a new status and bumps `last_updated`.
    pub fn set_status(
        &self,
        id: ProfileId,
        status: ProfileStatus,
    ) -> Result<Profile, ProfileServiceError> {
        let mut profile = self
            .repo
            .get_profile(id)?
            .ok_or(ProfileServiceError::ProfileNotFound(id))?;
        profile.status = status;
        profile.last_updated_ms = now_epoch_ms();
        self.repo.update_profile(&profile)?;
        Ok(profile)
    }

    /// Flips selection of one profile. Returns the new selection state.
    pub fn toggle_selection(&mut self, id: ProfileId) -> Result<bool, ProfileServiceError> {
        if self.selected.remove(&id) {
            return Ok(false);
        }
        if self.repo.get_profile(id)?.is_none() {
            return Err(ProfileServiceError::ProfileNotFound(id));
        }
        self.selected.insert(id);
        Ok(true)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Re-reads the directory; half of the time a new profile shows up.
    ///
    /// Without a new profile only a "Data Refreshed" toast is shown.
    pub fn refresh(
        &mut self,
        rng: &mut impl Rng,
        notifications: &mut NotificationStore,
        toasts: &mut ToastSurface,
    ) -> Result<RefreshOutcome, ProfileServiceError> {
        let now_ms = now_epoch_ms();
        if !rng.gen_bool(REFRESH_NEW_PROFILE_PROBABILITY) {
            info!("event=profile_refresh module=service status=ok new_profiles=0");
            toasts.flash(
                "Data Refreshed",
                "Profile data has been updated.",
                ToastVariant::Default,
                now_ms,
            );
            return Ok(RefreshOutcome::Unchanged);
        }

        let mut profile = Profile::new("Alex Rodriguez", Gender::Male, 27);
        profile.alias = derive_alias(&profile.name);
        profile.entry_point = "Northeast Sector".to_string();
        profile.entry_date = iso_date_from_epoch_ms(now_ms);
        profile.occupation = "Technician".to_string();
        profile.status = ProfileStatus::Active;
        profile.last_updated_ms = now_ms;
        self.repo.create_profile(&profile)?;

        info!("event=profile_refresh module=service status=ok new_profiles=1");
        notifications.add(
            NotificationKind::Info,
            "New Profile Added",
            format!("{} has been added to the system.", profile.name),
        );
        Ok(RefreshOutcome::NewProfile(profile))
    }

    /// Exports the selection, or the whole directory when nothing is selected.
    pub fn export(
        &self,
        format: ExportFormat,
        options: ExportOptions,
        notifications: &mut NotificationStore,
    ) -> Result<ExportReport, ProfileServiceError> {
        let profile_count = if self.selected.is_empty() {
            usize::try_from(self.repo.count_profiles()?).unwrap_or(usize::MAX)
        } else {
            self.selected.len()
        };

        info!(
            "event=profile_export module=service status=ok format={} profiles={profile_count}",
            format.label()
        );
        notifications.add(
            NotificationKind::Success,
            "Export Complete",
            format!(
                "{profile_count} profiles have been exported to {} format.",
                format.label()
            ),
        );
        Ok(ExportReport {
            format,
            profile_count,
            sections: options.sections(),
        })
    }

    /// Exports the form currently being edited to PDF.
    ///
    /// Shows the started/complete toasts and notifies success. The draft is
    /// exported as-is, without validation.
    pub fn export_form(
        &self,
        draft: &ProfileDraft,
        notifications: &mut NotificationStore,
        toasts: &mut ToastSurface,
    ) -> ExportReport {
        let now_ms = now_epoch_ms();
        toasts.flash(
            "Export Started",
            "Exporting profile data to PDF...",
            ToastVariant::Default,
            now_ms,
        );
        info!(
            "event=form_export module=service status=ok format=pdf completion={}",
            draft.completion_percent()
        );
        toasts.flash(
            "Export Complete",
            "Profile data has been exported to PDF.",
            ToastVariant::Default,
            now_ms,
        );
        notifications.add(
            NotificationKind::Success,
            "Export Complete",
            "Profile data has been exported to PDF format.",
        );
        ExportReport {
            format: ExportFormat::Pdf,
            profile_count: 1,
            sections: ExportOptions::default().sections(),
        }
    }
}

/// Civil `YYYY-MM-DD` (UTC) for an epoch-millisecond timestamp.
pub fn iso_date_from_epoch_ms(epoch_ms: i64) -> String {
    let days = epoch_ms.div_euclid(86_400_000);
    // Days-from-civil inverse (proleptic Gregorian).
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}
