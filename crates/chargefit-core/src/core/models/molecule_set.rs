use super::molecule::Molecule;
use crate::core::forcefield::params::Parameters;
use crate::core::topology::classifier::{AtomClassifier, AtomTypeKey};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, instrument, warn};

/// An ordered collection of molecules sharing one atom-type key table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoleculeSet {
    molecules: Vec<Molecule>,
    atom_types: Vec<AtomTypeKey>,
}

impl MoleculeSet {
    pub fn new(molecules: Vec<Molecule>) -> Self {
        Self {
            molecules,
            atom_types: Vec::new(),
        }
    }

    pub fn molecules(&self) -> &[Molecule] {
        &self.molecules
    }

    pub fn molecules_mut(&mut self) -> &mut [Molecule] {
        &mut self.molecules
    }

    pub fn atom_types(&self) -> &[AtomTypeKey] {
        &self.atom_types
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    pub fn atom_count(&self) -> usize {
        self.molecules.iter().map(Molecule::len).sum()
    }

    /// Classifies every atom with `classifier`, growing the type-key table in first-seen order.
    #[instrument(skip_all, fields(classifier = %classifier.kind()))]
    pub fn classify_atoms(&mut self, classifier: &dyn AtomClassifier) {
        let kind = classifier.kind();
        for molecule in &mut self.molecules {
            let labels: Vec<String> = (0..molecule.len())
                .map(|i| classifier.get_type(molecule, i))
                .collect();
            for (atom, label) in molecule.atoms_mut().iter_mut().zip(labels) {
                let key = AtomTypeKey {
                    symbol: atom.element.symbol.clone(),
                    classifier: kind,
                    label,
                };
                let idx = match self.atom_types.iter().position(|k| *k == key) {
                    Some(idx) => idx,
                    None => {
                        self.atom_types.push(key);
                        self.atom_types.len() - 1
                    }
                };
                atom.atom_type = Some(idx);
            }
        }
        info!(
            num_types = self.atom_types.len(),
            "Classified {} atoms.",
            self.atom_count()
        );
    }

    /// Classifies atoms against the type keys of `parameters` and drops every molecule
    /// containing an atom no key matches.
    ///
    /// The type-key table becomes the parameters' key order. Returns the number of
    /// removed molecules.
    #[instrument(skip_all)]
    pub fn classify_atoms_from_parameters(&mut self, parameters: &Parameters) -> usize {
        let keys = parameters.atom().keys();
        self.atom_types = keys.to_vec();

        let before = self.molecules.len();
        self.molecules.retain_mut(|molecule| {
            let assignment = match_molecule(keys, molecule);
            for (atom, atom_type) in molecule.atoms_mut().iter_mut().zip(&assignment) {
                atom.atom_type = *atom_type;
            }
            assignment.iter().all(Option::is_some)
        });
        let removed = before - self.molecules.len();

        if removed > 0 {
            warn!("Number of unclassified molecules: {}", removed);
        } else {
            info!("All {} molecules classified.", before);
        }
        removed
    }

    /// Number of molecules [`classify_atoms_from_parameters`](Self::classify_atoms_from_parameters)
    /// would remove for `parameters`.
    pub fn unclassified_molecules_count(&self, parameters: &Parameters) -> usize {
        let keys = parameters.atom().keys();
        self.molecules
            .iter()
            .filter(|molecule| match_molecule(keys, molecule).iter().any(Option::is_none))
            .count()
    }

    /// Atom counts per classified type key, in key order.
    pub fn type_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for atom in self.molecules.iter().flat_map(|m| m.atoms()) {
            if let Some(idx) = atom.atom_type {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn summary(&self) -> SetSummary<'_> {
        SetSummary { set: self }
    }
}

/// First matching key index for every atom of `molecule`.
fn match_molecule(keys: &[AtomTypeKey], molecule: &Molecule) -> Vec<Option<usize>> {
    (0..molecule.len())
        .map(|atom| keys.iter().position(|key| key.matches(molecule, atom)))
        .collect()
}

/// Human-readable overview of a [`MoleculeSet`].
pub struct SetSummary<'a> {
    set: &'a MoleculeSet,
}

impl fmt::Display for SetSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of molecules: {}", self.set.len())?;
        writeln!(f, "Number of atoms: {}", self.set.atom_count())?;
        for (idx, count) in self.set.type_counts() {
            if let Some(key) = self.set.atom_types.get(idx) {
                writeln!(f, "{}: {}", key, count)?;
            }
        }
        Ok(())
    }
}
