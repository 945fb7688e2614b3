use super::method::ChargeMethod;
use crate::core::models::molecule_set::MoleculeSet;
use crate::core::topology::classifier::{AtomTypeKey, ClassifierKind, UnknownClassifier};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid classifier for atom type of '{element}': {source}")]
    Classifier {
        element: String,
        source: UnknownClassifier,
    },
    #[error("Common parameters: {names} names but {values} values")]
    CommonLength { names: usize, values: usize },
    #[error("Atom type '{key}' has {actual} values, expected {expected}")]
    RowLength {
        key: String,
        expected: usize,
        actual: usize,
    },
    #[error("Atom type '{0}' is defined more than once")]
    DuplicateKey(String),
    #[error("Parameter vector has length {actual}, expected {expected}")]
    VectorLength { expected: usize, actual: usize },
}

/// Scalars shared by all atoms (e.g. a decay constant).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommonParameters {
    names: Vec<String>,
    values: Vec<f64>,
}

impl CommonParameters {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index_of(name).map(|idx| self.values[idx])
    }
}

/// Per-atom-type values, one row per type key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomParameters {
    names: Vec<String>,
    keys: Vec<AtomTypeKey>,
    values: Vec<Vec<f64>>,
}

impl AtomParameters {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn keys(&self) -> &[AtomTypeKey] {
        &self.keys
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn get(&self, name: &str, type_index: usize) -> Option<f64> {
        let column = self.index_of(name)?;
        self.values.get(type_index).map(|row| row[column])
    }
}

/// A charge method's parameters.
///
/// The flat vector layout used by the optimizer is the common values followed
/// by each atom-type row in key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters {
    method: String,
    common: CommonParameters,
    atom: AtomParameters,
}

impl Parameters {
    /// Creates a zero-initialized parameter set.
    pub fn new(
        method: &str,
        common_names: &[&str],
        atom_names: &[&str],
        keys: Vec<AtomTypeKey>,
    ) -> Self {
        let values = vec![vec![0.0; atom_names.len()]; keys.len()];
        Self {
            method: method.to_string(),
            common: CommonParameters {
                names: common_names.iter().map(|s| s.to_string()).collect(),
                values: vec![0.0; common_names.len()],
            },
            atom: AtomParameters {
                names: atom_names.iter().map(|s| s.to_string()).collect(),
                keys,
                values,
            },
        }
    }

    /// Creates a zero-initialized parameter set for `method` covering the type keys of `set`.
    pub fn for_method(set: &MoleculeSet, method: &dyn ChargeMethod) -> Self {
        Self::new(
            method.name(),
            method.common_parameter_names(),
            method.atom_parameter_names(),
            set.atom_types().to_vec(),
        )
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn common(&self) -> &CommonParameters {
        &self.common
    }

    pub fn atom(&self) -> &AtomParameters {
        &self.atom
    }

    /// Number of entries in the flat vector.
    pub fn len(&self) -> usize {
        self.common.values.len() + self.atom.keys.len() * self.atom.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vector(&self) -> Vec<f64> {
        let mut vector = Vec::with_capacity(self.len());
        vector.extend_from_slice(&self.common.values);
        for row in &self.atom.values {
            vector.extend_from_slice(row);
        }
        vector
    }

    pub fn set_from_vector(&mut self, vector: &[f64]) -> Result<(), ParameterError> {
        if vector.len() != self.len() {
            return Err(ParameterError::VectorLength {
                expected: self.len(),
                actual: vector.len(),
            });
        }
        let (common, rest) = vector.split_at(self.common.values.len());
        self.common.values.copy_from_slice(common);

        let width = self.atom.names.len();
        if width > 0 {
            for (row, chunk) in self.atom.values.iter_mut().zip(rest.chunks_exact(width)) {
                row.copy_from_slice(chunk);
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ParameterError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParameterError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), ParameterError> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ParameterError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ParameterError> {
        let file: ParametersFile = toml::from_str(content)?;
        file.try_into()
    }

    pub fn to_toml_string(&self) -> Result<String, ParameterError> {
        Ok(toml::to_string(&ParametersFile::from(self))?)
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Method: {}", self.method)?;
        if !self.common.names.is_empty() {
            writeln!(f, "Common parameters")?;
            for (name, value) in self.common.names.iter().zip(&self.common.values) {
                writeln!(f, "  {:<8} {:>10.4}", name, value)?;
            }
        }
        if !self.atom.keys.is_empty() {
            write!(f, "Atom parameters\n  {:<16}", "")?;
            for name in &self.atom.names {
                write!(f, " {:>10}", name)?;
            }
            writeln!(f)?;
            for (key, row) in self.atom.keys.iter().zip(&self.atom.values) {
                write!(f, "  {:<16}", key.to_string())?;
                for value in row {
                    write!(f, " {:>10.4}", value)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParametersFile {
    method: String,
    #[serde(default)]
    common: CommonSection,
    #[serde(default)]
    atom: AtomSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommonSection {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    values: Vec<f64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomSection {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    types: Vec<AtomTypeEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtomTypeEntry {
    element: String,
    classifier: String,
    label: String,
    values: Vec<f64>,
}

impl TryFrom<ParametersFile> for Parameters {
    type Error = ParameterError;

    fn try_from(file: ParametersFile) -> Result<Self, Self::Error> {
        if file.common.names.len() != file.common.values.len() {
            return Err(ParameterError::CommonLength {
                names: file.common.names.len(),
                values: file.common.values.len(),
            });
        }

        let width = file.atom.names.len();
        let mut seen = HashSet::new();
        let mut keys = Vec::with_capacity(file.atom.types.len());
        let mut values = Vec::with_capacity(file.atom.types.len());
        for entry in file.atom.types {
            let classifier = entry.classifier.parse::<ClassifierKind>().map_err(|source| {
                ParameterError::Classifier {
                    element: entry.element.clone(),
                    source,
                }
            })?;
            let key = AtomTypeKey::new(&entry.element, classifier, &entry.label);
            if entry.values.len() != width {
                return Err(ParameterError::RowLength {
                    key: key.to_string(),
                    expected: width,
                    actual: entry.values.len(),
                });
            }
            if !seen.insert(key.clone()) {
                return Err(ParameterError::DuplicateKey(key.to_string()));
            }
            keys.push(key);
            values.push(entry.values);
        }

        Ok(Self {
            method: file.method,
            common: CommonParameters {
                names: file.common.names,
                values: file.common.values,
            },
            atom: AtomParameters {
                names: file.atom.names,
                keys,
                values,
            },
        })
    }
}

impl From<&Parameters> for ParametersFile {
    fn from(p: &Parameters) -> Self {
        Self {
            method: p.method.clone(),
            common: CommonSection {
                names: p.common.names.clone(),
                values: p.common.values.clone(),
            },
            atom: AtomSection {
                names: p.atom.names.clone(),
                types: p
                    .atom
                    .keys
                    .iter()
                    .zip(&p.atom.values)
                    .map(|(key, row)| AtomTypeEntry {
                        element: key.symbol.clone(),
                        classifier: key.classifier.name().to_string(),
                        label: key.label.clone(),
                        values: row.clone(),
                    })
                    .collect(),
            },
        }
    }
}
