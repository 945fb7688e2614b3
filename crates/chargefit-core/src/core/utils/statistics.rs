use crate::core::io::charges::Charges;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatisticsError {
    #[error("Molecule '{0}' has no reference charges")]
    MissingMolecule(String),
    #[error("Molecule '{molecule}': {actual} computed charges but {expected} reference charges")]
    LengthMismatch {
        molecule: String,
        expected: usize,
        actual: usize,
    },
    #[error("No charges to compare")]
    Empty,
    #[error("Charges have zero variance")]
    ZeroVariance,
}

/// Pairs every computed charge with its reference by molecule name, then atom index.
fn paired(reference: &Charges, computed: &Charges) -> Result<Vec<(f64, f64)>, StatisticsError> {
    let mut pairs = Vec::new();
    for (name, values) in computed.iter() {
        let expected = reference
            .get(name)
            .ok_or_else(|| StatisticsError::MissingMolecule(name.to_string()))?;
        if expected.len() != values.len() {
            return Err(StatisticsError::LengthMismatch {
                molecule: name.to_string(),
                expected: expected.len(),
                actual: values.len(),
            });
        }
        pairs.extend(expected.iter().copied().zip(values.iter().copied()));
    }
    if pairs.is_empty() {
        return Err(StatisticsError::Empty);
    }
    Ok(pairs)
}

/// Root-mean-square deviation over all atoms of all molecules in `computed`.
pub fn rmsd(reference: &Charges, computed: &Charges) -> Result<f64, StatisticsError> {
    let pairs = paired(reference, computed)?;
    let sum: f64 = pairs.iter().map(|(r, c)| (r - c).powi(2)).sum();
    Ok((sum / pairs.len() as f64).sqrt())
}

/// Squared Pearson correlation coefficient between reference and computed charges.
pub fn pearson_r2(reference: &Charges, computed: &Charges) -> Result<f64, StatisticsError> {
    let pairs = paired(reference, computed)?;
    let n = pairs.len() as f64;
    let mean_r = pairs.iter().map(|(r, _)| r).sum::<f64>() / n;
    let mean_c = pairs.iter().map(|(_, c)| c).sum::<f64>() / n;

    let (cov, var_r, var_c) = pairs.iter().fold((0.0, 0.0, 0.0), |(cov, vr, vc), (r, c)| {
        let dr = r - mean_r;
        let dc = c - mean_c;
        (cov + dr * dc, vr + dr * dr, vc + dc * dc)
    });

    if var_r <= f64::EPSILON || var_c <= f64::EPSILON {
        return Err(StatisticsError::ZeroVariance);
    }
    Ok(cov * cov / (var_r * var_c))
}
