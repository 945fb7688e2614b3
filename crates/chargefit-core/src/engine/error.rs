use thiserror::Error;

use super::config::ConfigError;
use super::optimizer::OptimizerError;
use super::utils::sampling::SamplingError;
use crate::core::forcefield::method::ChargeError;
use crate::core::forcefield::params::ParameterError;
use crate::core::io::charges::ChargesError;
use crate::core::models::molecule::MoleculeError;
use crate::core::utils::statistics::StatisticsError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown charge method '{name}' (available: {available})")]
    UnknownMethod { name: String, available: String },

    #[error("Method '{method}' has no parameters to fit")]
    NothingToFit { method: String },

    #[error("No molecules left to process")]
    EmptyMoleculeSet,

    #[error("Charge calculation failed: {source}")]
    Charge {
        #[from]
        source: ChargeError,
    },

    #[error("Parameter error: {source}")]
    Parameter {
        #[from]
        source: ParameterError,
    },

    #[error("Charge comparison failed: {source}")]
    Statistics {
        #[from]
        source: StatisticsError,
    },

    #[error(transparent)]
    Molecule(#[from] MoleculeError),

    #[error("Charge file error: {source}")]
    Charges {
        #[from]
        source: ChargesError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Sampling failed: {0}")]
    Sampling(#[from] SamplingError),

    #[error("Optimization failed: {0}")]
    Optimizer(#[from] OptimizerError),
}
