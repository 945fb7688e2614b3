use super::config::ParameterizationConfig;
use super::error::EngineError;
use super::optimizer::{NelderMead, OptimizationOutcome, OptimizationStatus};
use super::progress::{Progress, ProgressReporter};
use super::utils::sampling::{SamplingError, latin_hypercube, scale_to_bounds};
use crate::core::forcefield::method::ChargeMethod;
use crate::core::forcefield::params::Parameters;
use crate::core::io::charges::Charges;
use crate::core::models::molecule_set::MoleculeSet;
use crate::core::utils::statistics::{pearson_r2, rmsd};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ParameterizationResult {
    pub parameters: Parameters,
    /// The training set with the final charges stored on every molecule.
    pub set: MoleculeSet,
    pub charges: Charges,
    pub rmsd: f64,
    /// `None` when the charges have no variance.
    pub r2: Option<f64>,
    /// Best RMSD among the sampled start candidates.
    pub sampling_rmsd: f64,
    pub outcome: OptimizationOutcome,
}

/// Fits a charge method's parameters to reference charges.
///
/// The parameter vector is written into one owned [`Parameters`] instance before
/// every evaluation, so evaluations run one at a time.
pub struct Parameterizer<'a> {
    set: MoleculeSet,
    method: Box<dyn ChargeMethod>,
    parameters: Parameters,
    reference: &'a Charges,
}

impl<'a> Parameterizer<'a> {
    /// `set` must already be classified against the type keys of `parameters`.
    pub fn new(
        set: MoleculeSet,
        method: Box<dyn ChargeMethod>,
        parameters: Parameters,
        reference: &'a Charges,
    ) -> Self {
        Self {
            set,
            method,
            parameters,
            reference,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Charges of every training molecule under the current parameters.
    pub fn compute_charges(&self) -> Result<Charges, EngineError> {
        let mut charges = Charges::new();
        for molecule in self.set.molecules() {
            let values = self.method.calculate_charges(molecule, &self.parameters)?;
            charges.insert(molecule.name(), values);
        }
        Ok(charges)
    }

    /// RMSD against the reference after loading `x` into the parameters.
    pub fn objective(&mut self, x: &[f64]) -> Result<f64, EngineError> {
        self.parameters.set_from_vector(x)?;
        let computed = self.compute_charges()?;
        Ok(rmsd(self.reference, &computed)?)
    }

    #[instrument(skip_all, name = "parameterization", fields(method = self.method.name()))]
    pub fn parametrize(
        mut self,
        config: &ParameterizationConfig,
        reporter: &ProgressReporter,
    ) -> Result<ParameterizationResult, EngineError> {
        if self.set.is_empty() {
            return Err(EngineError::EmptyMoleculeSet);
        }
        let n = self.parameters.len();
        if n == 0 {
            return Err(EngineError::NothingToFit {
                method: self.method.name().to_string(),
            });
        }
        info!(
            molecules = self.set.len(),
            atoms = self.set.atom_count(),
            parameters = n,
            "Starting parameterization."
        );

        // === Phase 1: Global sampling ===
        let (start, sampling_rmsd) =
            reporter.phase("Sampling Parameter Space", || self.sample(config, reporter))?;
        info!("Best sampled RMSD = {:.6}", sampling_rmsd);
        reporter.report(Progress::BestValue(sampling_rmsd));

        // === Phase 2: Local optimization ===
        let outcome = reporter.phase("Local Optimization", || {
            Ok::<_, EngineError>(self.optimize(config, reporter, start, sampling_rmsd))
        })?;

        // === Phase 3: Final charges ===
        let (charges, final_rmsd) = reporter.phase("Computing Final Charges", || {
            self.parameters.set_from_vector(&outcome.best_point)?;
            let charges = self.compute_charges()?;
            for molecule in self.set.molecules_mut() {
                if let Some(values) = charges.get(molecule.name()) {
                    molecule.set_partial_charges(values.to_vec())?;
                }
            }
            let final_rmsd = rmsd(self.reference, &charges)?;
            reporter.report(Progress::Message(format!("Best RMSD = {:.6}", final_rmsd)));
            Ok::<_, EngineError>((charges, final_rmsd))
        })?;
        let r2 = pearson_r2(self.reference, &charges).ok();

        info!("Best RMSD = {:.6}", final_rmsd);
        info!("Fitted parameters:\n{}", self.parameters);

        Ok(ParameterizationResult {
            parameters: self.parameters,
            set: self.set,
            charges,
            rmsd: final_rmsd,
            r2,
            sampling_rmsd,
            outcome,
        })
    }

    /// Evaluates every Latin-hypercube candidate and returns the best one.
    fn sample(
        &mut self,
        config: &ParameterizationConfig,
        reporter: &ProgressReporter,
    ) -> Result<(Vec<f64>, f64), EngineError> {
        let sampling = &config.sampling;
        let mut candidates =
            latin_hypercube(self.parameters.len(), sampling.num_samples, sampling.seed)?;
        scale_to_bounds(&mut candidates, sampling.lower_bound, sampling.upper_bound)?;

        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });
        let mut best: Option<(Vec<f64>, f64)> = None;
        for candidate in candidates {
            let value = self.objective(&candidate)?;
            reporter.report(Progress::TaskIncrement);
            if best.as_ref().is_none_or(|(_, b)| value < *b) {
                best = Some((candidate, value));
            }
        }
        reporter.report(Progress::TaskFinish);

        best.ok_or_else(|| {
            EngineError::from(SamplingError::EmptyDesign {
                dims: self.parameters.len(),
                points: sampling.num_samples,
            })
        })
    }

    /// Runs Nelder-Mead from `start`. Optimizer failures fall back to `start`.
    fn optimize(
        &mut self,
        config: &ParameterizationConfig,
        reporter: &ProgressReporter,
        start: Vec<f64>,
        start_value: f64,
    ) -> OptimizationOutcome {
        let optimizer = NelderMead::new(config.optimization.clone());
        reporter.report(Progress::TaskStart {
            total_steps: config.optimization.max_evaluations as u64,
        });

        let mut best = start_value;
        let result = optimizer.minimize(
            |x: &[f64]| {
                reporter.report(Progress::TaskIncrement);
                let value = self.objective(x)?;
                if value < best {
                    best = value;
                    reporter.report(Progress::BestValue(value));
                }
                Ok::<_, EngineError>(value)
            },
            &start,
        );
        reporter.report(Progress::TaskFinish);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => OptimizationOutcome {
                best_point: start,
                best_value: start_value,
                start_value,
                evaluations: 0,
                status: OptimizationStatus::Aborted(e.to_string()),
            },
        };

        match &outcome.status {
            OptimizationStatus::Aborted(reason) => {
                warn!("Local optimization failed: {}", reason);
                reporter.report(Progress::Message(format!(
                    "Local optimization failed: {}",
                    reason
                )));
            }
            status => debug!(evaluations = outcome.evaluations, "Local optimization {}.", status),
        }
        outcome
    }
}
