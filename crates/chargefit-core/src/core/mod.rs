//! # Core Module
//!
//! This module provides the data model and the stateless algorithms of the library.
//!
//! ## Overview
//!
//! The core module holds everything needed to compute partial charges for a single
//! molecule: the molecule representation, atom classification, the charge methods and
//! their parameters, and the file formats that bring data in and out.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, molecules and molecule sets
//! - **Charge Methods** ([`forcefield`]) - The method abstraction, EQeq/EQeqC and parameter storage
//! - **Atom Classification** ([`topology`]) - Classifiers and atom-type keys
//! - **File I/O** ([`io`]) - Structure and charge file formats
//! - **Statistics** ([`utils`]) - Agreement measures between charge sets

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
