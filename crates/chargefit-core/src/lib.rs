//! # ChargeFit Core Library
//!
//! A library for computing per-atom partial charges with electronegativity-equalization
//! methods and fitting their empirical parameters against reference charges.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `MoleculeSet`),
//!   atom classification, the charge methods themselves, and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The parameter search: Latin-hypercube sampling,
//!   the Nelder-Mead optimizer, configuration and progress reporting.
//!
//! - **[`workflows`]: The Public API.** Complete procedures (fitting parameters,
//!   calculating charges) that tie `core` and `engine` together and persist results.

pub mod core;
pub mod engine;
pub mod workflows;
