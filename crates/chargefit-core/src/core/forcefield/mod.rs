//! # Charge Method Module
//!
//! This module provides the charge-calculation methods and the parameter sets they
//! consume.
//!
//! ## Overview
//!
//! A charge method turns one molecule plus a parameter set into one partial charge per
//! atom. Methods are stateless: the parameters are passed explicitly on every call,
//! which lets the parameterizer rewrite them between evaluations.
//!
//! - **Electronegativity equalization** using a screened Coulomb interaction and a
//!   charge-conservation constraint
//! - **Bond-order correction** (EQeqC) using a per-type `Dz` and a common decay `alpha`
//! - **Parameter persistence** in a human-editable TOML layout
//!
//! ## Key Components
//!
//! - [`method`] - The [`ChargeMethod`](method::ChargeMethod) trait and the method registry
//! - [`eqeq`] - The EQeq and EQeqC implementations
//! - [`params`] - Common and per-atom-type parameter storage
//!
//! ## Usage
//!
//! ```ignore
//! use chargefit::core::forcefield::{method::method_by_name, params::Parameters};
//!
//! let method = method_by_name("eqeqc").unwrap();
//! let parameters = Parameters::load(Path::new("eqeqc.toml"))?;
//! let charges = method.calculate_charges(&molecule, &parameters)?;
//! ```

pub mod eqeq;
pub mod method;
pub mod params;
