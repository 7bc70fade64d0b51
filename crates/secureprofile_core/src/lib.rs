//! Core domain logic for the SecureProfile dashboard.
//! This crate is the single source of truth for session state and invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod sim;
pub mod time;

pub use config::{ConfigError, DashboardConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LogSettings};
pub use model::activity::{ActivityEvent, ActivityKind};
pub use model::draft::ProfileDraft;
pub use model::notification::{Notification, NotificationId, NotificationKind};
pub use model::profile::{Gender, Profile, ProfileId, ProfileStatus, ProfileValidationError};
pub use notify::store::{NotificationEvent, NotificationStore, SidebarDigest};
pub use notify::toast::{Toast, ToastSurface, ToastVariant};
pub use repo::profile_repo::{
    ProfileListQuery, ProfileRepository, RepoError, RepoResult, SqliteProfileRepository,
};
pub use service::dashboard_service::{Dashboard, DashboardSnapshot};
pub use service::profile_service::{
    ExportFormat, ExportOptions, ExportReport, ProfileService, ProfileServiceError,
    RefreshOutcome, StatusFilter,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
