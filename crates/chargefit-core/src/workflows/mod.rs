//! # Workflows Module
//!
//! This module provides the high-level procedures that tie the `core` data model and
//! the `engine` search together.
//!
//! ## Overview
//!
//! Workflows are the top-level entry points for users of the library. Each one takes
//! already-loaded input data plus a configuration, reports progress through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter), and persists its
//! results to the paths named in the configuration.
//!
//! - **Fit** ([`fit`]) - Classifies a training set, fits the method's parameters against
//!   reference charges, and writes the fitted charges and parameters.
//! - **Calculate** ([`calculate`]) - Applies a stored parameter file to a set of
//!   molecules, dropping the ones it cannot type, and writes their charges.

pub mod calculate;
pub mod fit;

use crate::core::forcefield::method::{ChargeMethod, available_methods, method_by_name};
use crate::engine::error::EngineError;

fn resolve_method(name: &str) -> Result<Box<dyn ChargeMethod>, EngineError> {
    method_by_name(name).ok_or_else(|| EngineError::UnknownMethod {
        name: name.to_string(),
        available: available_methods().join(", "),
    })
}
