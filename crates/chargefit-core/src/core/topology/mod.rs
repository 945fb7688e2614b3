//! # Topology Module
//!
//! This module groups atoms into parameter-sharing classes from their local
//! chemical context.
//!
//! ## Overview
//!
//! Every atom gets a type label from a classifier. Together with the element symbol
//! and the classifier kind, the label forms an [`AtomTypeKey`](classifier::AtomTypeKey),
//! which is how per-atom parameters are looked up.
//!
//! - **Plain** - one class per element
//! - **Heavy-atom bond order** - one class per element and highest bond order to a
//!   non-hydrogen neighbour
//!
//! ## Usage
//!
//! ```ignore
//! use chargefit::core::topology::classifier::ClassifierKind;
//!
//! let kind: ClassifierKind = "hbo".parse()?;
//! set.classify_atoms(kind.classifier().as_ref());
//! ```

pub mod classifier;
