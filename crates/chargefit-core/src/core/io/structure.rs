use super::traits::DataFile;
use crate::core::models::atom::Atom;
use crate::core::models::element::{ElementError, element};
use crate::core::models::molecule::{Molecule, MoleculeError};
use crate::core::models::molecule_set::MoleculeSet;
use crate::core::models::topology::{Bond, BondOrder};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Molecule '{molecule}', atom {atom}: {source}")]
    Element {
        molecule: String,
        atom: usize,
        source: ElementError,
    },
    #[error("Molecule '{molecule}', bond {bond}: invalid bond order '{value}'")]
    BondOrder {
        molecule: String,
        bond: usize,
        value: String,
    },
    #[error(transparent)]
    Molecule(#[from] MoleculeError),
}

/// TOML structure file holding any number of `[[molecules]]` tables.
///
/// ```toml
/// [[molecules]]
/// name = "water"
/// total-charge = 0.0
/// atoms = [
///     { element = "O", position = [0.0, 0.0, 0.0] },
///     { element = "H", position = [0.957, 0.0, 0.0] },
///     { element = "H", position = [-0.24, 0.927, 0.0] },
/// ]
/// bonds = [{ atoms = [0, 1] }, { atoms = [0, 2], order = "1" }]
/// ```
pub struct StructureFile;

impl DataFile for StructureFile {
    type Data = MoleculeSet;
    type Error = StructureError;

    fn read_from(reader: &mut impl BufRead) -> Result<MoleculeSet, StructureError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        let document: StructureDocument = toml::from_str(&content)?;

        let molecules = document
            .molecules
            .into_iter()
            .map(MoleculeEntry::into_molecule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MoleculeSet::new(molecules))
    }

    fn write_to(set: &MoleculeSet, writer: &mut impl Write) -> Result<(), StructureError> {
        let document = StructureDocument {
            molecules: set.molecules().iter().map(MoleculeEntry::from).collect(),
        };
        writer.write_all(toml::to_string(&document)?.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StructureDocument {
    #[serde(default)]
    molecules: Vec<MoleculeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct MoleculeEntry {
    name: String,
    #[serde(default)]
    total_charge: f64,
    #[serde(default)]
    atoms: Vec<AtomEntry>,
    #[serde(default)]
    bonds: Vec<BondEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct AtomEntry {
    element: String,
    position: [f64; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    residue_id: i32,
    #[serde(default)]
    residue_name: String,
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    hetatm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct BondEntry {
    atoms: [usize; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<String>,
}

impl MoleculeEntry {
    fn into_molecule(self) -> Result<Molecule, StructureError> {
        let name = self.name;

        let atoms = self
            .atoms
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                let element =
                    element(&entry.element).map_err(|source| StructureError::Element {
                        molecule: name.clone(),
                        atom: idx,
                        source,
                    })?;
                let [x, y, z] = entry.position;
                let atom_name = entry.name.unwrap_or_else(|| element.symbol.clone());
                let mut atom = Atom::new(element, &atom_name, Point3::new(x, y, z)).with_residue(
                    entry.residue_id,
                    &entry.residue_name,
                    &entry.chain_id,
                );
                atom.hetatm = entry.hetatm;
                Ok(atom)
            })
            .collect::<Result<Vec<_>, StructureError>>()?;

        let bonds = self
            .bonds
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| {
                let order = match entry.order {
                    None => BondOrder::default(),
                    Some(value) => {
                        value
                            .parse::<BondOrder>()
                            .map_err(|_| StructureError::BondOrder {
                                molecule: name.clone(),
                                bond: idx,
                                value,
                            })?
                    }
                };
                Ok(Bond::new(entry.atoms[0], entry.atoms[1], order))
            })
            .collect::<Result<Vec<_>, StructureError>>()?;

        Ok(Molecule::new(&name, atoms, bonds, self.total_charge)?)
    }
}

impl From<&Molecule> for MoleculeEntry {
    fn from(molecule: &Molecule) -> Self {
        Self {
            name: molecule.name().to_string(),
            total_charge: molecule.total_charge(),
            atoms: molecule
                .atoms()
                .iter()
                .map(|atom| AtomEntry {
                    element: atom.element.symbol.clone(),
                    position: [atom.position.x, atom.position.y, atom.position.z],
                    name: Some(atom.name.clone()),
                    residue_id: atom.residue_id,
                    residue_name: atom.residue_name.clone(),
                    chain_id: atom.chain_id.clone(),
                    hetatm: atom.hetatm,
                })
                .collect(),
            bonds: molecule
                .bonds()
                .iter()
                .map(|bond| BondEntry {
                    atoms: [bond.atom1, bond.atom2],
                    order: Some(bond.order.label().to_string()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"
        [[molecules]]
        name = "formaldehyde"
        atoms = [
            { element = "C", position = [0.0, 0.0, 0.0], name = "C1", residue-id = 1, residue-name = "FOR", chain-id = "A", hetatm = true },
            { element = "O", position = [1.21, 0.0, 0.0] },
            { element = "H", position = [-0.55, 0.94, 0.0] },
            { element = "H", position = [-0.55, -0.94, 0.0] },
        ]
        bonds = [
            { atoms = [0, 1], order = "2" },
            { atoms = [0, 2] },
            { atoms = [0, 3], order = "1" },
        ]

        [[molecules]]
        name = "hydroxide"
        total-charge = -1.0
        atoms = [
            { element = "O", position = [0.0, 0.0, 0.0] },
            { element = "H", position = [0.97, 0.0, 0.0] },
        ]
        bonds = [{ atoms = [0, 1] }]
    "#;

    fn read(content: &str) -> Result<MoleculeSet, StructureError> {
        StructureFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_molecules_atoms_and_bonds() {
        let set = read(SAMPLE).unwrap();
        assert_eq!(set.len(), 2);

        let formaldehyde = &set.molecules()[0];
        assert_eq!(formaldehyde.name(), "formaldehyde");
        assert_eq!(formaldehyde.len(), 4);
        assert_eq!(formaldehyde.total_charge(), 0.0);
        assert_eq!(formaldehyde.bonds()[0].order, BondOrder::Double);
        assert_eq!(formaldehyde.bonds()[1].order, BondOrder::Single);

        let carbon = &formaldehyde.atoms()[0];
        assert_eq!(carbon.name, "C1");
        assert_eq!(carbon.residue_id, 1);
        assert_eq!(carbon.residue_name, "FOR");
        assert_eq!(carbon.chain_id, "A");
        assert!(carbon.hetatm);
        assert_eq!(formaldehyde.atoms()[1].name, "O");
        assert_eq!(formaldehyde.atoms()[3].index, 3);

        assert_eq!(set.molecules()[1].total_charge(), -1.0);
    }

    #[test]
    fn unknown_element_is_rejected() {
        let content = SAMPLE.replace("element = \"O\", position = [1.21", "element = \"Xx\", position = [1.21");
        assert!(matches!(
            read(&content),
            Err(StructureError::Element { ref molecule, atom: 1, .. }) if molecule == "formaldehyde"
        ));
    }

    #[test]
    fn out_of_range_bond_is_rejected() {
        let content = SAMPLE.replace("atoms = [0, 1] }]", "atoms = [0, 5] }]");
        assert!(matches!(
            read(&content),
            Err(StructureError::Molecule(MoleculeError::BondIndexOutOfRange { atom: 5, .. }))
        ));
    }

    #[test]
    fn invalid_bond_order_is_rejected() {
        let content = SAMPLE.replace("order = \"2\"", "order = \"quadruple\"");
        assert!(matches!(
            read(&content),
            Err(StructureError::BondOrder { bond: 0, ref value, .. }) if value == "quadruple"
        ));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let content = "[[molecules]]\nname = \"x\"\ncolor = \"red\"\n";
        assert!(matches!(read(content), Err(StructureError::Toml(_))));
    }

    #[test]
    fn written_file_reads_back_to_the_same_molecules() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("set.toml");
        let set = read(SAMPLE).unwrap();

        StructureFile::write_to_path(&set, &path).unwrap();
        let loaded = StructureFile::read_from_path(&path).unwrap();
        assert_eq!(loaded, set);
    }
}
