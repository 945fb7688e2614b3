//! Numerical helpers shared by the workflows, such as the agreement
//! statistics between computed and reference charges.

pub mod statistics;
