use super::traits::DataFile;
use crate::core::models::molecule_set::MoleculeSet;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: molecule '{name}' has no charge line")]
    MissingValues { line: usize, name: String },
    #[error("Line {line}: invalid charge value '{value}'")]
    InvalidValue { line: usize, value: String },
}

/// Per-atom charges keyed by molecule name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Charges {
    names: Vec<String>,
    values: HashMap<String, Vec<f64>>,
}

impl Charges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the partial charges currently stored on each molecule of `set`.
    pub fn from_molecules(set: &MoleculeSet) -> Self {
        let mut charges = Self::new();
        for molecule in set.molecules() {
            charges.insert(molecule.name(), molecule.partial_charges().to_vec());
        }
        charges
    }

    /// Stores `values` for `name`. Re-inserting a name replaces its values
    /// but keeps its original position.
    pub fn insert(&mut self, name: &str, values: Vec<f64>) {
        if self.values.insert(name.to_string(), values).is_none() {
            self.names.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.values.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.values[name].as_slice()))
    }
}

/// Plain-text charge file: a molecule name line followed by a line of
/// whitespace-separated charges, repeated.
pub struct ChargesFile;

impl DataFile for ChargesFile {
    type Data = Charges;
    type Error = ChargesError;

    fn read_from(reader: &mut impl BufRead) -> Result<Charges, ChargesError> {
        let mut charges = Charges::new();
        let mut lines = reader.lines().enumerate();

        while let Some((idx, line)) = lines.next() {
            let line = line?;
            let name = line.trim();
            if name.is_empty() {
                continue;
            }

            let (values_idx, values_line) = match lines.next() {
                Some((i, l)) => (i, l?),
                None => {
                    return Err(ChargesError::MissingValues {
                        line: idx + 1,
                        name: name.to_string(),
                    });
                }
            };

            let values = values_line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| ChargesError::InvalidValue {
                        line: values_idx + 1,
                        value: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            charges.insert(name, values);
        }

        Ok(charges)
    }

    fn write_to(charges: &Charges, writer: &mut impl Write) -> Result<(), ChargesError> {
        for (name, values) in charges.iter() {
            writeln!(writer, "{}", name)?;
            let line = values
                .iter()
                .map(|v| format!("{:.6}", v))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const SAMPLE: &str = "water\n-0.8 0.4 0.4\nmethane\n-0.4 0.1 0.1 0.1 0.1\n\n\n";

    fn read(content: &str) -> Result<Charges, ChargesError> {
        ChargesFile::read_from(&mut Cursor::new(content))
    }

    #[test]
    fn reads_records_in_order_and_tolerates_trailing_blank_lines() {
        let charges = read(SAMPLE).unwrap();
        assert_eq!(charges.names(), &["water".to_string(), "methane".to_string()]);
        assert_eq!(charges.get("water"), Some(&[-0.8, 0.4, 0.4][..]));
        assert_eq!(charges.get("methane").unwrap().len(), 5);
        assert_eq!(charges.get("ethane"), None);
    }

    #[test]
    fn name_without_values_is_an_error() {
        let err = read("water\n-0.8 0.4 0.4\nlonely\n").unwrap_err();
        assert!(matches!(
            err,
            ChargesError::MissingValues { line: 3, ref name } if name == "lonely"
        ));
    }

    #[test]
    fn malformed_value_reports_its_line() {
        let err = read("water\n-0.8 abc 0.4\n").unwrap_err();
        assert!(matches!(
            err,
            ChargesError::InvalidValue { line: 2, ref value } if value == "abc"
        ));
    }

    #[test]
    fn reinserting_replaces_values_but_keeps_position() {
        let mut charges = Charges::new();
        charges.insert("a", vec![1.0]);
        charges.insert("b", vec![2.0]);
        charges.insert("a", vec![3.0, 4.0]);

        assert_eq!(charges.len(), 2);
        assert_eq!(charges.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(charges.get("a"), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn writes_six_decimals_separated_by_single_spaces() {
        let mut charges = Charges::new();
        charges.insert("hcl", vec![0.25, -0.25]);
        let mut out = Vec::new();
        ChargesFile::write_to(&charges, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hcl\n0.250000 -0.250000\n");
    }

    #[test]
    fn file_written_to_path_can_be_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charges.txt");
        let charges = read(SAMPLE).unwrap();

        ChargesFile::write_to_path(&charges, &path).unwrap();
        let loaded = ChargesFile::read_from_path(&path).unwrap();
        assert_eq!(loaded, charges);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = ChargesFile::read_from_path(dir.path().join("missing.txt"));
        assert!(matches!(result, Err(ChargesError::Io(_))));
    }
}
