//! Extended charge equilibration (EQeq) and its bond-order-corrected variant (EQeqC).
//!
//! Both methods build the same `(n+1) x (n+1)` linear system: one row per atom
//! relating its charge to its electronegativity and the screened Coulomb
//! interaction with every other atom, plus a conservation row forcing the charges
//! to sum to the molecule's total charge. EQeqC adds an empirical, parameterized
//! bond-order correction on top of the solved charges.

use super::method::{ChargeError, ChargeMethod};
use super::params::Parameters;
use crate::core::models::molecule::Molecule;
use nalgebra::{DMatrix, DVector};

/// Coulomb constant in eV·Å/e².
const K: f64 = 14.4;
/// Dielectric screening factor.
const LAMBDA: f64 = 1.2;
/// Electron affinity used for hydrogen instead of its tabulated value (eV).
const HYDROGEN_ELECTRON_AFFINITY: f64 = -2.0;
const MIN_DISTANCE: f64 = 1e-8;

const ALPHA: &str = "alpha";
const DZ: &str = "Dz";

#[derive(Debug, Clone, Copy, Default)]
pub struct Eqeq;

impl ChargeMethod for Eqeq {
    fn name(&self) -> &'static str {
        "eqeq"
    }

    fn common_parameter_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn atom_parameter_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn calculate_charges(
        &self,
        molecule: &Molecule,
        _parameters: &Parameters,
    ) -> Result<Vec<f64>, ChargeError> {
        solve_equalization(molecule)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EqeqC;

impl ChargeMethod for EqeqC {
    fn name(&self) -> &'static str {
        "eqeqc"
    }

    fn common_parameter_names(&self) -> &'static [&'static str] {
        &[ALPHA]
    }

    fn atom_parameter_names(&self) -> &'static [&'static str] {
        &[DZ]
    }

    fn calculate_charges(
        &self,
        molecule: &Molecule,
        parameters: &Parameters,
    ) -> Result<Vec<f64>, ChargeError> {
        let mut charges = solve_equalization(molecule)?;
        let corrections = bond_order_corrections(self.name(), molecule, parameters)?;
        for (q, dq) in charges.iter_mut().zip(corrections) {
            *q += dq;
        }
        Ok(charges)
    }
}

/// Solves the EQeq system and returns the uncorrected charges.
pub(crate) fn solve_equalization(molecule: &Molecule) -> Result<Vec<f64>, ChargeError> {
    let atoms = molecule.atoms();
    let n = atoms.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let m = n + 1;

    let (x, j): (Vec<f64>, Vec<f64>) = atoms
        .iter()
        .map(|atom| {
            let ip = atom.element.ionization_potential;
            let ea = if atom.element.is_hydrogen() {
                HYDROGEN_ELECTRON_AFFINITY
            } else {
                atom.element.electron_affinity
            };
            ((ip + ea) / 2.0, ip - ea)
        })
        .unzip();

    let mut a = DMatrix::<f64>::zeros(m, m);
    let mut b = DVector::<f64>::zeros(m);

    for i in 0..n {
        a[(i, i)] = j[i];
        b[i] = -x[i];
        for k in (i + 1)..n {
            let r = molecule.distance(i, k);
            if r < MIN_DISTANCE {
                return Err(ChargeError::CoincidentAtoms {
                    molecule: molecule.name().to_string(),
                    i,
                    j: k,
                });
            }
            let alpha = (j[i] * j[k]).sqrt() / K;
            let overlap =
                (-alpha * alpha * r * r).exp() * (2.0 * alpha - alpha * alpha * r - 1.0 / r);
            let value = LAMBDA * K / 2.0 * (1.0 / r + overlap);
            a[(i, k)] = value;
            a[(k, i)] = value;
        }
        a[(i, n)] = 1.0;
        a[(n, i)] = 1.0;
    }
    a[(n, n)] = 0.0;
    b[n] = molecule.total_charge();

    let singular = || ChargeError::SingularSystem {
        molecule: molecule.name().to_string(),
    };
    if a.iter().any(|v| !v.is_finite()) {
        return Err(singular());
    }
    let solution = a.lu().solve(&b).ok_or_else(singular)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return Err(singular());
    }

    Ok(solution.iter().take(n).copied().collect())
}

fn bond_order_corrections(
    method: &'static str,
    molecule: &Molecule,
    parameters: &Parameters,
) -> Result<Vec<f64>, ChargeError> {
    let missing = |name: &str| ChargeError::MissingParameter {
        method,
        name: name.to_string(),
    };
    let alpha = parameters.common().get(ALPHA).ok_or_else(|| missing(ALPHA))?;

    let dz = molecule
        .atoms()
        .iter()
        .map(|atom| {
            let type_index = atom.atom_type.ok_or_else(|| ChargeError::UnclassifiedAtom {
                molecule: molecule.name().to_string(),
                atom: atom.index,
            })?;
            parameters
                .atom()
                .get(DZ, type_index)
                .ok_or_else(|| missing(DZ))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let atoms = molecule.atoms();
    let n = atoms.len();
    let corrections = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&k| k != i)
                .map(|k| {
                    let tkk = dz[i] - dz[k];
                    let bkk = (-alpha
                        * (molecule.distance(i, k) - atoms[i].element.covalent_radius
                            + atoms[k].element.covalent_radius))
                        .exp();
                    tkk * bkk
                })
                .sum()
        })
        .collect();
    Ok(corrections)
}
