//! # Core Models Module
//!
//! This module contains the data structures used to represent molecules and the
//! element data they refer to.
//!
//! ## Overview
//!
//! - **Represent molecular structure** - Atoms with coordinates and residue metadata,
//!   bonds with their order
//! - **Carry classification state** - Each atom's type index into its set's key table
//! - **Hold computed charges** - Partial charges are stored on the molecule once computed
//!
//! ## Key Components
//!
//! - [`element`] - Element constants and the process-wide periodic table
//! - [`atom`] - Individual atom representation
//! - [`topology`] - Bonds and bond orders
//! - [`molecule`] - A validated molecule with its total charge
//! - [`molecule_set`] - An ordered collection of molecules sharing one type-key table
//!
//! ## Usage
//!
//! ```ignore
//! use chargefit::core::models::{atom::Atom, element::element, molecule::Molecule};
//!
//! let atoms = vec![
//!     Atom::new(element("H")?, "H1", Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new(element("Cl")?, "CL", Point3::new(1.27, 0.0, 0.0)),
//! ];
//! let bonds = vec![Bond::new(0, 1, BondOrder::Single)];
//! let molecule = Molecule::new("hcl", atoms, bonds, 0.0)?;
//! ```

pub mod atom;
pub mod element;
pub mod molecule;
pub mod molecule_set;
pub mod topology;
