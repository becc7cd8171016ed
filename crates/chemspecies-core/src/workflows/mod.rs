//! # Workflows Module
//!
//! High-level procedures built from the core model operations.
//!
//! ## Overview
//!
//! A workflow takes a [`Supermolecule`](crate::core::models::supermolecule::Supermolecule)
//! and a validated configuration, runs a fixed sequence of structural edits and
//! reports what changed. The input system is never modified.
//!
//! - **Edit Workflow** ([`edit`]) - Element removal, island filtering and recentering

pub mod config;
pub mod edit;
pub mod error;

pub use config::{ConfigError, EditConfig, EditConfigBuilder};
pub use edit::{EditReport, run};
pub use error::WorkflowError;
