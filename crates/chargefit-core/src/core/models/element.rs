use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};

/// Physical constants of a chemical element.
///
/// Energies are in electronvolts and radii in Angstroms. Elements live in the
/// process-wide [`PeriodicTable`] and atoms hold `&'static` references into it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: String,
    pub name: String,
    /// Pauling electronegativity (0.0 where undefined).
    pub electronegativity: f64,
    pub ionization_potential: f64,
    pub electron_affinity: f64,
    pub covalent_radius: f64,
}

impl Element {
    pub fn is_hydrogen(&self) -> bool {
        self.atomic_number == 1
    }
}

#[derive(Debug, Error)]
pub enum ElementError {
    #[error("Unknown element symbol: '{0}'")]
    UnknownSymbol(String),
    #[error("Unknown atomic number: {0}")]
    UnknownAtomicNumber(u8),
    #[error("Duplicate element '{symbol}' in table")]
    Duplicate { symbol: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("The global periodic table has already been initialized")]
    AlreadyInitialized,
}

// (Z, symbol, name, electronegativity, ionization potential, electron affinity, covalent radius)
#[rustfmt::skip]
const BUILTIN_ELEMENTS: &[(u8, &str, &str, f64, f64, f64, f64)] = &[
    (1,  "H",  "Hydrogen",   2.20, 13.598, 0.754, 0.31),
    (2,  "He", "Helium",     0.00, 24.587, 0.000, 0.28),
    (3,  "Li", "Lithium",    0.98,  5.392, 0.618, 1.28),
    (4,  "Be", "Beryllium",  1.57,  9.323, 0.000, 0.96),
    (5,  "B",  "Boron",      2.04,  8.298, 0.277, 0.84),
    (6,  "C",  "Carbon",     2.55, 11.260, 1.262, 0.76),
    (7,  "N",  "Nitrogen",   3.04, 14.534, -0.070, 0.71),
    (8,  "O",  "Oxygen",     3.44, 13.618, 1.461, 0.66),
    (9,  "F",  "Fluorine",   3.98, 17.423, 3.401, 0.57),
    (10, "Ne", "Neon",       0.00, 21.565, 0.000, 0.58),
    (11, "Na", "Sodium",     0.93,  5.139, 0.548, 1.66),
    (12, "Mg", "Magnesium",  1.31,  7.646, 0.000, 1.41),
    (13, "Al", "Aluminium",  1.61,  5.986, 0.433, 1.21),
    (14, "Si", "Silicon",    1.90,  8.152, 1.390, 1.11),
    (15, "P",  "Phosphorus", 2.19, 10.487, 0.747, 1.07),
    (16, "S",  "Sulfur",     2.58, 10.360, 2.077, 1.05),
    (17, "Cl", "Chlorine",   3.16, 12.968, 3.613, 1.02),
    (18, "Ar", "Argon",      0.00, 15.760, 0.000, 1.06),
    (19, "K",  "Potassium",  0.82,  4.341, 0.501, 2.03),
    (20, "Ca", "Calcium",    1.00,  6.113, 0.025, 1.76),
    (21, "Sc", "Scandium",   1.36,  6.561, 0.188, 1.70),
    (22, "Ti", "Titanium",   1.54,  6.828, 0.079, 1.60),
    (23, "V",  "Vanadium",   1.63,  6.746, 0.525, 1.53),
    (24, "Cr", "Chromium",   1.66,  6.767, 0.666, 1.39),
    (25, "Mn", "Manganese",  1.55,  7.434, 0.000, 1.39),
    (26, "Fe", "Iron",       1.83,  7.902, 0.151, 1.32),
    (27, "Co", "Cobalt",     1.88,  7.881, 0.662, 1.26),
    (28, "Ni", "Nickel",     1.91,  7.640, 1.156, 1.24),
    (29, "Cu", "Copper",     1.90,  7.726, 1.235, 1.32),
    (30, "Zn", "Zinc",       1.65,  9.394, 0.000, 1.22),
    (31, "Ga", "Gallium",    1.81,  5.999, 0.430, 1.22),
    (32, "Ge", "Germanium",  2.01,  7.899, 1.233, 1.20),
    (33, "As", "Arsenic",    2.18,  9.789, 0.804, 1.19),
    (34, "Se", "Selenium",   2.55,  9.752, 2.021, 1.20),
    (35, "Br", "Bromine",    2.96, 11.814, 3.364, 1.20),
    (36, "Kr", "Krypton",    3.00, 14.000, 0.000, 1.16),
    (53, "I",  "Iodine",     2.66, 10.451, 3.059, 1.39),
];

static GLOBAL_TABLE: OnceLock<PeriodicTable> = OnceLock::new();

/// Read-only element lookup by atomic number and by symbol.
#[derive(Debug, Clone, Default)]
pub struct PeriodicTable {
    elements: Vec<Element>,
    by_symbol: HashMap<String, usize>,
    by_number: HashMap<u8, usize>,
}

impl PeriodicTable {
    pub fn from_elements(elements: Vec<Element>) -> Result<Self, ElementError> {
        let mut by_symbol = HashMap::with_capacity(elements.len());
        let mut by_number = HashMap::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            if by_symbol.insert(element.symbol.clone(), idx).is_some()
                || by_number.insert(element.atomic_number, idx).is_some()
            {
                return Err(ElementError::Duplicate {
                    symbol: element.symbol.clone(),
                });
            }
        }
        Ok(Self {
            elements,
            by_symbol,
            by_number,
        })
    }

    pub fn builtin() -> Self {
        let elements = BUILTIN_ELEMENTS
            .iter()
            .map(|&(z, symbol, name, en, ip, ea, rcov)| Element {
                atomic_number: z,
                symbol: symbol.to_string(),
                name: name.to_string(),
                electronegativity: en,
                ionization_potential: ip,
                electron_affinity: ea,
                covalent_radius: rcov,
            })
            .collect();
        // The built-in data has unique symbols and numbers.
        Self::from_elements(elements).unwrap_or_default()
    }

    pub fn load_csv(path: &Path) -> Result<Self, ElementError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| ElementError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut elements = Vec::new();
        for result in reader.deserialize::<Element>() {
            let element = result.map_err(|e| ElementError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            elements.push(element);
        }
        debug!(count = elements.len(), "Loaded element table from CSV.");
        Self::from_elements(elements)
    }

    /// Returns the process-wide table, initializing it with the built-in data on first use.
    pub fn global() -> &'static PeriodicTable {
        GLOBAL_TABLE.get_or_init(PeriodicTable::builtin)
    }

    /// Installs `table` as the process-wide table. Must happen before the first lookup.
    pub fn install(table: PeriodicTable) -> Result<(), ElementError> {
        let count = table.len();
        GLOBAL_TABLE
            .set(table)
            .map_err(|_| ElementError::AlreadyInitialized)?;
        info!("Installed custom periodic table with {} elements.", count);
        Ok(())
    }

    pub fn by_symbol(&self, symbol: &str) -> Result<&Element, ElementError> {
        self.by_symbol
            .get(symbol)
            .or_else(|| self.by_symbol.get(normalize_symbol(symbol).as_str()))
            .map(|&idx| &self.elements[idx])
            .ok_or_else(|| ElementError::UnknownSymbol(symbol.to_string()))
    }

    pub fn by_atomic_number(&self, atomic_number: u8) -> Result<&Element, ElementError> {
        self.by_number
            .get(&atomic_number)
            .map(|&idx| &self.elements[idx])
            .ok_or(ElementError::UnknownAtomicNumber(atomic_number))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Shorthand for a symbol lookup in the global table.
pub fn element(symbol: &str) -> Result<&'static Element, ElementError> {
    PeriodicTable::global().by_symbol(symbol)
}

fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn builtin_table_contains_common_organic_elements() {
        let table = PeriodicTable::builtin();
        for symbol in ["H", "C", "N", "O", "S", "P", "Cl", "Br", "I"] {
            assert!(table.by_symbol(symbol).is_ok(), "missing {}", symbol);
        }
        assert_eq!(table.by_atomic_number(6).unwrap().symbol, "C");
    }

    #[test]
    fn symbol_lookup_is_case_tolerant() {
        let table = PeriodicTable::builtin();
        assert_eq!(table.by_symbol("CL").unwrap().atomic_number, 17);
        assert_eq!(table.by_symbol(" br").unwrap().atomic_number, 35);
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let table = PeriodicTable::builtin();
        assert!(matches!(
            table.by_symbol("Xx"),
            Err(ElementError::UnknownSymbol(s)) if s == "Xx"
        ));
        assert!(matches!(
            table.by_atomic_number(118),
            Err(ElementError::UnknownAtomicNumber(118))
        ));
    }

    #[test]
    fn global_table_resolves_hydrogen() {
        let h = element("H").unwrap();
        assert!(h.is_hydrogen());
        assert!(std::ptr::eq(h, element("H").unwrap()));
    }

    #[test]
    fn load_csv_succeeds_with_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pte.csv");
        fs::write(
            &path,
            "atomic_number,symbol,name,electronegativity,ionization_potential,electron_affinity,covalent_radius\n\
             1,H,Hydrogen,2.2,13.6,0.75,0.31\n\
             6,C,Carbon,2.55,11.26,1.26,0.76\n",
        )
        .unwrap();

        let table = PeriodicTable::load_csv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.by_symbol("C").unwrap().ionization_potential, 11.26);
    }

    #[test]
    fn load_csv_rejects_duplicates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pte.csv");
        fs::write(
            &path,
            "atomic_number,symbol,name,electronegativity,ionization_potential,electron_affinity,covalent_radius\n\
             1,H,Hydrogen,2.2,13.6,0.75,0.31\n\
             1,H,Hydrogen,2.2,13.6,0.75,0.31\n",
        )
        .unwrap();

        assert!(matches!(
            PeriodicTable::load_csv(&path),
            Err(ElementError::Duplicate { .. })
        ));
    }

    #[test]
    fn load_csv_fails_for_malformed_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pte.csv");
        fs::write(&path, "atomic_number,symbol\nfoo,H\n").unwrap();
        assert!(matches!(
            PeriodicTable::load_csv(&path),
            Err(ElementError::Csv { .. })
        ));
    }
}
