use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Label produced by [`PlainClassifier`] for every atom.
pub const PLAIN_LABEL: &str = "*";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Classifier '{0}' not found")]
pub struct UnknownClassifier(pub String);

/// The closed set of atom classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassifierKind {
    /// Classifies purely by element.
    Plain,
    /// Classifies by the highest bond order to a heavy-atom neighbour.
    Hbo,
}

impl ClassifierKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Hbo => "hbo",
        }
    }

    pub fn classifier(self) -> Box<dyn AtomClassifier> {
        match self {
            Self::Plain => Box::new(PlainClassifier),
            Self::Hbo => Box::new(HboClassifier),
        }
    }

    /// Whether an atom belongs to the class `(kind, label)`, ignoring its element.
    pub fn accepts(self, label: &str, molecule: &Molecule, atom: usize) -> bool {
        match self {
            Self::Plain => true,
            Self::Hbo => HboClassifier.get_type(molecule, atom) == label,
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = UnknownClassifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "hbo" => Ok(Self::Hbo),
            _ => Err(UnknownClassifier(s.to_string())),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a parameter-sharing class of atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomTypeKey {
    pub symbol: String,
    pub classifier: ClassifierKind,
    pub label: String,
}

impl AtomTypeKey {
    pub fn new(symbol: &str, classifier: ClassifierKind, label: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            classifier,
            label: label.to_string(),
        }
    }

    /// Whether the atom at `atom` in `molecule` belongs to this class.
    pub fn matches(&self, molecule: &Molecule, atom: usize) -> bool {
        molecule.atoms()[atom].symbol() == self.symbol
            && self.classifier.accepts(&self.label, molecule, atom)
    }
}

impl fmt::Display for AtomTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.symbol, self.classifier, self.label)
    }
}

/// Assigns a type label to an atom from its local chemical context.
pub trait AtomClassifier {
    fn kind(&self) -> ClassifierKind;

    fn get_type(&self, molecule: &Molecule, atom: usize) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainClassifier;

impl AtomClassifier for PlainClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Plain
    }

    fn get_type(&self, _molecule: &Molecule, _atom: usize) -> String {
        PLAIN_LABEL.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HboClassifier;

impl AtomClassifier for HboClassifier {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::Hbo
    }

    fn get_type(&self, molecule: &Molecule, atom: usize) -> String {
        molecule
            .bonds_of(atom)
            .filter_map(|bond| {
                let partner = bond.partner(atom)?;
                (!molecule.atoms()[partner].element.is_hydrogen()).then_some(bond.order)
            })
            .max_by_key(|order| order.rank())
            .unwrap_or(BondOrder::Single)
            .label()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::element;
    use crate::core::models::topology::Bond;
    use nalgebra::Point3;

    // Formaldehyde-like fragment: C(=O)(H)H plus a lone N.
    fn fragment() -> Molecule {
        let atoms = vec![
            Atom::new(element("C").unwrap(), "C", Point3::new(0.0, 0.0, 0.0)),
            Atom::new(element("O").unwrap(), "O", Point3::new(1.2, 0.0, 0.0)),
            Atom::new(element("H").unwrap(), "H1", Point3::new(-0.5, 0.9, 0.0)),
            Atom::new(element("H").unwrap(), "H2", Point3::new(-0.5, -0.9, 0.0)),
            Atom::new(element("N").unwrap(), "N", Point3::new(5.0, 0.0, 0.0)),
        ];
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Double),
            Bond::new(0, 2, BondOrder::Single),
            Bond::new(0, 3, BondOrder::Single),
        ];
        Molecule::new("fragment", atoms, bonds, 0.0).unwrap()
    }

    #[test]
    fn classifier_kind_parses_known_names() {
        assert_eq!("plain".parse::<ClassifierKind>(), Ok(ClassifierKind::Plain));
        assert_eq!("HBO".parse::<ClassifierKind>(), Ok(ClassifierKind::Hbo));
    }

    #[test]
    fn classifier_kind_rejects_unknown_names() {
        assert_eq!(
            "foo".parse::<ClassifierKind>(),
            Err(UnknownClassifier("foo".to_string()))
        );
        assert!("".parse::<ClassifierKind>().is_err());
    }

    #[test]
    fn classifier_kind_display_round_trips() {
        for kind in [ClassifierKind::Plain, ClassifierKind::Hbo] {
            assert_eq!(kind.to_string().parse::<ClassifierKind>(), Ok(kind));
            assert_eq!(kind.classifier().kind(), kind);
        }
    }

    #[test]
    fn plain_classifier_returns_constant_label() {
        let molecule = fragment();
        for i in 0..molecule.len() {
            assert_eq!(PlainClassifier.get_type(&molecule, i), PLAIN_LABEL);
        }
    }

    #[test]
    fn hbo_classifier_uses_highest_heavy_atom_bond_order() {
        let molecule = fragment();
        assert_eq!(HboClassifier.get_type(&molecule, 0), "2");
        assert_eq!(HboClassifier.get_type(&molecule, 1), "2");
    }

    #[test]
    fn hbo_classifier_ignores_hydrogen_neighbours_and_defaults_to_single() {
        let molecule = fragment();
        // Hydrogens bond only to carbon, a heavy atom, through single bonds.
        assert_eq!(HboClassifier.get_type(&molecule, 2), "1");
        // Isolated nitrogen has no bonds at all.
        assert_eq!(HboClassifier.get_type(&molecule, 4), "1");
    }

    #[test]
    fn hbo_classifier_ranks_aromatic_below_double() {
        let atoms = vec![
            Atom::new(element("C").unwrap(), "C1", Point3::new(0.0, 0.0, 0.0)),
            Atom::new(element("C").unwrap(), "C2", Point3::new(1.4, 0.0, 0.0)),
            Atom::new(element("C").unwrap(), "C3", Point3::new(-1.4, 0.0, 0.0)),
        ];
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Aromatic),
            Bond::new(0, 2, BondOrder::Single),
        ];
        let molecule = Molecule::new("ring", atoms, bonds, 0.0).unwrap();
        assert_eq!(HboClassifier.get_type(&molecule, 0), "ar");
        assert_eq!(HboClassifier.get_type(&molecule, 2), "1");
    }

    #[test]
    fn type_key_matching_checks_symbol_and_label() {
        let molecule = fragment();
        let c_double = AtomTypeKey::new("C", ClassifierKind::Hbo, "2");
        let c_single = AtomTypeKey::new("C", ClassifierKind::Hbo, "1");
        let c_plain = AtomTypeKey::new("C", ClassifierKind::Plain, "whatever");

        assert!(c_double.matches(&molecule, 0));
        assert!(!c_single.matches(&molecule, 0));
        assert!(c_plain.matches(&molecule, 0));
        assert!(!c_plain.matches(&molecule, 1));
    }
}
