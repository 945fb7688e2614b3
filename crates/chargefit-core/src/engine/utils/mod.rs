//! Utility functions for the engine module.
//!
//! This module provides helpers that support the parameter search, such as the
//! seeded space-filling design used to pick optimizer start points.

pub mod sampling;
