use super::resolve_method;
use crate::core::forcefield::params::Parameters;
use crate::core::io::charges::{Charges, ChargesFile};
use crate::core::io::traits::DataFile;
use crate::core::models::molecule_set::MoleculeSet;
use crate::engine::config::ChargesConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct CalculationResult {
    /// The molecules that were kept, each carrying its computed charges.
    pub set: MoleculeSet,
    pub charges: Charges,
    pub parameters: Parameters,
    /// Molecules dropped because an atom matched no parameterized type.
    pub removed: usize,
}

/// Computes charges for `set` with a stored parameter file and writes them out.
#[instrument(skip_all, name = "charges_workflow")]
pub fn run(
    mut set: MoleculeSet,
    config: &ChargesConfig,
    reporter: &ProgressReporter,
) -> Result<CalculationResult, EngineError> {
    // === Phase 0: Preparation ===
    let (method, parameters, removed) = reporter.phase("Preparation", || {
        let parameters = Parameters::load(&config.parameters_path)?;
        let method = resolve_method(parameters.method())?;
        let removed = if method.atom_parameter_names().is_empty() {
            0
        } else {
            set.classify_atoms_from_parameters(&parameters)
        };
        Ok::<_, EngineError>((method, parameters, removed))
    })?;

    if set.is_empty() {
        warn!("No molecule could be classified with the given parameters.");
        return Err(EngineError::EmptyMoleculeSet);
    }

    // === Phase 1: Charge calculation ===
    reporter.phase("Computing Charges", || {
        reporter.report(Progress::TaskStart {
            total_steps: set.len() as u64,
        });
        for molecule in set.molecules_mut() {
            let charges = method.calculate_charges(molecule, &parameters)?;
            molecule.set_partial_charges(charges)?;
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        Ok::<_, EngineError>(())
    })?;

    // === Phase 2: Persist results ===
    let charges = Charges::from_molecules(&set);
    ChargesFile::write_to_path(&charges, &config.charges_output)?;
    info!(
        molecules = charges.len(),
        removed,
        "Charges written to '{}'.",
        config.charges_output.display()
    );

    Ok(CalculationResult {
        set,
        charges,
        parameters,
        removed,
    })
}
