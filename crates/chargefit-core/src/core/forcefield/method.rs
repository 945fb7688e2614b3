use super::eqeq::{Eqeq, EqeqC};
use super::params::Parameters;
use crate::core::models::molecule::Molecule;
use phf::{Map, phf_map};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ChargeError {
    #[error("Cannot solve linear system for molecule '{molecule}'")]
    SingularSystem { molecule: String },
    #[error("Atoms {i} and {j} of molecule '{molecule}' occupy the same position")]
    CoincidentAtoms {
        molecule: String,
        i: usize,
        j: usize,
    },
    #[error("Atom {atom} of molecule '{molecule}' has no atom type")]
    UnclassifiedAtom { molecule: String, atom: usize },
    #[error("Missing parameter '{name}' for method '{method}'")]
    MissingParameter { method: &'static str, name: String },
}

/// A charge calculation method.
///
/// Implementations receive their parameters explicitly on every call, so a
/// method value holds no mutable state.
pub trait ChargeMethod {
    fn name(&self) -> &'static str;

    fn common_parameter_names(&self) -> &'static [&'static str];

    fn atom_parameter_names(&self) -> &'static [&'static str];

    /// Computes one charge per atom, index-aligned with `molecule.atoms()`.
    fn calculate_charges(
        &self,
        molecule: &Molecule,
        parameters: &Parameters,
    ) -> Result<Vec<f64>, ChargeError>;

    fn has_parameters(&self) -> bool {
        !self.common_parameter_names().is_empty() || !self.atom_parameter_names().is_empty()
    }
}

type MethodFactory = fn() -> Box<dyn ChargeMethod>;

fn new_eqeq() -> Box<dyn ChargeMethod> {
    Box::new(Eqeq)
}

fn new_eqeqc() -> Box<dyn ChargeMethod> {
    Box::new(EqeqC)
}

static METHODS: Map<&'static str, MethodFactory> = phf_map! {
    "eqeq" => new_eqeq as MethodFactory,
    "eqeqc" => new_eqeqc as MethodFactory,
};

/// Looks up a charge method by its name.
pub fn method_by_name(name: &str) -> Option<Box<dyn ChargeMethod>> {
    METHODS
        .get(name.trim().to_ascii_lowercase().as_str())
        .map(|factory| factory())
}

/// Names of all registered methods, sorted.
pub fn available_methods() -> Vec<&'static str> {
    let mut names: Vec<_> = METHODS.keys().copied().collect();
    names.sort_unstable();
    names
}
