use super::resolve_method;
use crate::core::forcefield::params::Parameters;
use crate::core::io::charges::{Charges, ChargesFile};
use crate::core::io::traits::DataFile;
use crate::core::models::molecule_set::MoleculeSet;
use crate::engine::config::FitConfig;
use crate::engine::error::EngineError;
use crate::engine::parameterizer::{ParameterizationResult, Parameterizer};
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

/// Fits the configured method to `reference` and writes the fitted charges
/// (and, when requested, the parameters) to the configured outputs.
#[instrument(skip_all, name = "fit_workflow", fields(method = %config.method))]
pub fn run(
    mut set: MoleculeSet,
    reference: &Charges,
    config: &FitConfig,
    reporter: &ProgressReporter,
) -> Result<ParameterizationResult, EngineError> {
    // === Phase 0: Preparation ===
    let (method, parameters) = reporter.phase("Preparation", || {
        let method = resolve_method(&config.method)?;
        set.classify_atoms(config.classifier.classifier().as_ref());
        let parameters = Parameters::for_method(&set, method.as_ref());
        info!(
            types = set.atom_types().len(),
            parameters = parameters.len(),
            "Classified training set with the '{}' classifier.",
            config.classifier
        );
        Ok::<_, EngineError>((method, parameters))
    })?;

    // === Phase 1: Parameterization ===
    let result = Parameterizer::new(set, method, parameters, reference)
        .parametrize(&config.parameterization, reporter)?;

    // === Phase 2: Persist results ===
    ChargesFile::write_to_path(&result.charges, &config.charges_output)?;
    info!("Charges written to '{}'.", config.charges_output.display());
    if let Some(path) = &config.parameters_output {
        result.parameters.save(path)?;
        info!("Parameters written to '{}'.", path.display());
    }

    Ok(result)
}
