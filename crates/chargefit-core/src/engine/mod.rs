//! # Engine Module
//!
//! This module implements the parameter search that fits a charge method to
//! reference charges.
//!
//! ## Overview
//!
//! The search runs in two phases. A seeded Latin-hypercube design samples the
//! parameter box and picks the best candidate; a Nelder-Mead simplex then refines it
//! under a fixed evaluation budget. The objective is the RMSD between computed and
//! reference charges over every atom of the training set.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search settings and workflow configuration builders
//! - **Parameterizer** ([`parameterizer`]) - The objective and the two-phase search
//! - **Optimizer** ([`optimizer`]) - Budgeted derivative-free local minimization
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping the core errors

pub mod config;
pub mod error;
pub mod optimizer;
pub mod parameterizer;
pub mod progress;
pub(crate) mod utils;
