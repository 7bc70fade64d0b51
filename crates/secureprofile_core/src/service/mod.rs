//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and feed events into page-level APIs.
//! - Report outcomes through the injected notification store.

pub mod dashboard_service;
pub mod profile_service;
