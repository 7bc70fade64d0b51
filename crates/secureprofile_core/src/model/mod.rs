//! Domain model for the profile dashboard.
//!
//! # Responsibility
//! - Define the records shared by the store, directory and simulation.
//! - Keep validation next to the data it guards.
//!
//! # Invariants
//! - Notifications are identified by a creation-ordered `NotificationId`.
//! - Profiles are identified by a stable `ProfileId`.

pub mod activity;
pub mod draft;
pub mod notification;
pub mod profile;
pub mod stats;
