//! In-session notification service and its transient toast surface.
//!
//! # Responsibility
//! - Own the notification sequence shared by producers and consumers.
//! - Turn newly added notifications into short-lived toasts.
//!
//! # Invariants
//! - The store is an owned value passed by reference; there is no global.
//! - Toasts never outlive their configured time-to-live.

pub mod store;
pub mod toast;
