use super::atom::Atom;
use super::topology::Bond;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Molecule '{molecule}': bond {bond} references atom {atom}, but the molecule has {atom_count} atoms")]
    BondIndexOutOfRange {
        molecule: String,
        bond: usize,
        atom: usize,
        atom_count: usize,
    },
    #[error("Molecule '{molecule}': bond {bond} connects atom {atom} to itself")]
    SelfBond {
        molecule: String,
        bond: usize,
        atom: usize,
    },
    #[error("Molecule '{molecule}': expected {expected} charges, got {actual}")]
    ChargeCountMismatch {
        molecule: String,
        expected: usize,
        actual: usize,
    },
}

/// A molecule: atoms, bonds, net formal charge and, once computed, partial charges.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    total_charge: f64,
    partial_charges: Vec<f64>,
}

impl Molecule {
    /// Builds a molecule, renumbering atoms to their position and validating bonds.
    ///
    /// # Errors
    ///
    /// Returns an error if a bond endpoint is not an index into `atoms` or a bond
    /// connects an atom to itself.
    pub fn new(
        name: &str,
        mut atoms: Vec<Atom>,
        bonds: Vec<Bond>,
        total_charge: f64,
    ) -> Result<Self, MoleculeError> {
        for (idx, atom) in atoms.iter_mut().enumerate() {
            atom.index = idx;
        }

        let atom_count = atoms.len();
        for (bond_idx, bond) in bonds.iter().enumerate() {
            for atom in [bond.atom1, bond.atom2] {
                if atom >= atom_count {
                    return Err(MoleculeError::BondIndexOutOfRange {
                        molecule: name.to_string(),
                        bond: bond_idx,
                        atom,
                        atom_count,
                    });
                }
            }
            if bond.atom1 == bond.atom2 {
                return Err(MoleculeError::SelfBond {
                    molecule: name.to_string(),
                    bond: bond_idx,
                    atom: bond.atom1,
                });
            }
        }

        Ok(Self {
            name: name.to_string(),
            atoms,
            bonds,
            total_charge,
            partial_charges: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub(crate) fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn total_charge(&self) -> f64 {
        self.total_charge
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = &Bond> {
        self.bonds.iter().filter(move |b| b.contains(atom))
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.atoms[i].distance_to(&self.atoms[j])
    }

    pub fn is_fully_classified(&self) -> bool {
        self.atoms.iter().all(Atom::is_classified)
    }

    /// Partial charges from the last charge calculation; empty if none was stored.
    pub fn partial_charges(&self) -> &[f64] {
        &self.partial_charges
    }

    pub fn set_partial_charges(&mut self, charges: Vec<f64>) -> Result<(), MoleculeError> {
        if charges.len() != self.atoms.len() {
            return Err(MoleculeError::ChargeCountMismatch {
                molecule: self.name.clone(),
                expected: self.atoms.len(),
                actual: charges.len(),
            });
        }
        self.partial_charges = charges;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::element::element;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn water_atoms() -> Vec<Atom> {
        vec![
            Atom::new(element("O").unwrap(), "O", Point3::new(0.0, 0.0, 0.0)),
            Atom::new(element("H").unwrap(), "H1", Point3::new(0.96, 0.0, 0.0)),
            Atom::new(element("H").unwrap(), "H2", Point3::new(-0.24, 0.93, 0.0)),
        ]
    }

    #[test]
    fn new_renumbers_atoms_contiguously() {
        let mut atoms = water_atoms();
        atoms[0].index = 42;
        let molecule = Molecule::new("water", atoms, vec![], 0.0).unwrap();
        let indices: Vec<_> = molecule.atoms().iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn new_rejects_out_of_range_bond() {
        let bonds = vec![Bond::new(0, 3, BondOrder::Single)];
        let err = Molecule::new("water", water_atoms(), bonds, 0.0).unwrap_err();
        assert_eq!(
            err,
            MoleculeError::BondIndexOutOfRange {
                molecule: "water".to_string(),
                bond: 0,
                atom: 3,
                atom_count: 3,
            }
        );
    }

    #[test]
    fn new_rejects_self_bond() {
        let bonds = vec![Bond::new(1, 1, BondOrder::Single)];
        let err = Molecule::new("water", water_atoms(), bonds, 0.0).unwrap_err();
        assert!(matches!(err, MoleculeError::SelfBond { atom: 1, .. }));
    }

    #[test]
    fn bonds_of_follows_bonds_in_both_directions() {
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(2, 0, BondOrder::Single),
        ];
        let molecule = Molecule::new("water", water_atoms(), bonds, 0.0).unwrap();
        let partners: Vec<_> = molecule
            .bonds_of(0)
            .filter_map(|b| b.partner(0))
            .collect();
        assert_eq!(partners, vec![1, 2]);
        assert_eq!(molecule.bonds_of(1).count(), 1);
    }

    #[test]
    fn set_partial_charges_validates_length() {
        let mut molecule = Molecule::new("water", water_atoms(), vec![], 0.0).unwrap();
        assert!(molecule.partial_charges().is_empty());
        assert!(molecule.set_partial_charges(vec![0.1, 0.2]).is_err());
        molecule.set_partial_charges(vec![-0.8, 0.4, 0.4]).unwrap();
        assert_eq!(molecule.partial_charges(), &[-0.8, 0.4, 0.4]);
    }

    #[test]
    fn fresh_molecule_is_not_classified() {
        let molecule = Molecule::new("water", water_atoms(), vec![], -1.0).unwrap();
        assert!(!molecule.is_fully_classified());
        assert_eq!(molecule.total_charge(), -1.0);
        assert_eq!(molecule.len(), 3);
    }
}
