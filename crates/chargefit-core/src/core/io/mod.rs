//! Provides input/output functionality for the data files the library consumes
//! and produces.
//!
//! This module contains the TOML structure format used to describe molecules, the
//! plain-text charge format used for reference and computed charges, and the shared
//! [`DataFile`](traits::DataFile) trait they implement.

pub mod charges;
pub mod structure;
pub mod traits;
