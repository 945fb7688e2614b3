use super::element::Element;
use nalgebra::Point3;

/// An atom of a molecule.
///
/// The element is shared with the global periodic table. The atom-type index
/// points into the owning [`MoleculeSet`](super::molecule_set::MoleculeSet)'s
/// type-key table and stays `None` until the atom is classified.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Position within the owning molecule (0-based, contiguous).
    pub index: usize,
    pub element: &'static Element,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// The name of the atom (e.g., "CA", "O1").
    pub name: String,
    pub residue_id: i32,
    pub residue_name: String,
    pub chain_id: String,
    /// Whether the atom came from a HETATM record.
    pub hetatm: bool,
    pub atom_type: Option<usize>,
}

impl Atom {
    /// Creates a new `Atom` with empty residue information.
    ///
    /// The index is provisional; [`Molecule::new`](super::molecule::Molecule::new)
    /// renumbers atoms to their position in the molecule.
    pub fn new(element: &'static Element, name: &str, position: Point3<f64>) -> Self {
        Self {
            index: 0,
            element,
            position,
            name: name.to_string(),
            residue_id: 0,
            residue_name: String::new(),
            chain_id: String::new(),
            hetatm: false,
            atom_type: None,
        }
    }

    pub fn with_residue(mut self, residue_id: i32, residue_name: &str, chain_id: &str) -> Self {
        self.residue_id = residue_id;
        self.residue_name = residue_name.to_string();
        self.chain_id = chain_id.to_string();
        self
    }

    pub fn symbol(&self) -> &str {
        &self.element.symbol
    }

    pub fn is_classified(&self) -> bool {
        self.atom_type.is_some()
    }

    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
