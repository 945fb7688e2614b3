use crate::core::topology::classifier::ClassifierKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Global design phase: Latin-hypercube samples over a box.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    pub num_samples: usize,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub seed: u64,
}

/// Local phase: Nelder-Mead simplex search.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig {
    pub max_evaluations: usize,
    /// Edge length of the initial simplex around the start point.
    pub initial_step: f64,
    /// Stop once the spread of objective values across the simplex falls below this.
    pub function_tolerance: f64,
    /// Stop once every vertex lies within this distance of the best vertex.
    pub parameter_tolerance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizationConfig {
    pub sampling: SamplingConfig,
    pub optimization: OptimizationConfig,
}

impl Default for ParameterizationConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingConfig {
                num_samples: DEFAULT_NUM_SAMPLES,
                lower_bound: DEFAULT_LOWER_BOUND,
                upper_bound: DEFAULT_UPPER_BOUND,
                seed: DEFAULT_SEED,
            },
            optimization: OptimizationConfig {
                max_evaluations: DEFAULT_MAX_EVALUATIONS,
                initial_step: DEFAULT_INITIAL_STEP,
                function_tolerance: DEFAULT_FUNCTION_TOLERANCE,
                parameter_tolerance: DEFAULT_PARAMETER_TOLERANCE,
            },
        }
    }
}

pub const DEFAULT_NUM_SAMPLES: usize = 100;
pub const DEFAULT_LOWER_BOUND: f64 = 0.0;
pub const DEFAULT_UPPER_BOUND: f64 = 3.0;
pub const DEFAULT_SEED: u64 = 1;
pub const DEFAULT_MAX_EVALUATIONS: usize = 500;
pub const DEFAULT_INITIAL_STEP: f64 = 0.1;
pub const DEFAULT_FUNCTION_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_PARAMETER_TOLERANCE: f64 = 1e-8;

/// Builds a [`ParameterizationConfig`]; every unset value takes its default.
#[derive(Default)]
pub struct ParameterizationConfigBuilder {
    num_samples: Option<usize>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    seed: Option<u64>,
    max_evaluations: Option<usize>,
    initial_step: Option<f64>,
    function_tolerance: Option<f64>,
    parameter_tolerance: Option<f64>,
}

impl ParameterizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_samples(mut self, n: usize) -> Self {
        self.num_samples = Some(n);
        self
    }
    pub fn bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = Some(lower);
        self.upper_bound = Some(upper);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = Some(n);
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }
    pub fn function_tolerance(mut self, tolerance: f64) -> Self {
        self.function_tolerance = Some(tolerance);
        self
    }
    pub fn parameter_tolerance(mut self, tolerance: f64) -> Self {
        self.parameter_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<ParameterizationConfig, ConfigError> {
        let sampling = SamplingConfig {
            num_samples: self.num_samples.unwrap_or(DEFAULT_NUM_SAMPLES),
            lower_bound: self.lower_bound.unwrap_or(DEFAULT_LOWER_BOUND),
            upper_bound: self.upper_bound.unwrap_or(DEFAULT_UPPER_BOUND),
            seed: self.seed.unwrap_or(DEFAULT_SEED),
        };
        let optimization = OptimizationConfig {
            max_evaluations: self.max_evaluations.unwrap_or(DEFAULT_MAX_EVALUATIONS),
            initial_step: self.initial_step.unwrap_or(DEFAULT_INITIAL_STEP),
            function_tolerance: self
                .function_tolerance
                .unwrap_or(DEFAULT_FUNCTION_TOLERANCE),
            parameter_tolerance: self
                .parameter_tolerance
                .unwrap_or(DEFAULT_PARAMETER_TOLERANCE),
        };

        if sampling.num_samples == 0 {
            return Err(ConfigError::InvalidValue {
                name: "num_samples",
                reason: "at least one sample is required".to_string(),
            });
        }
        if !(sampling.lower_bound.is_finite()
            && sampling.upper_bound.is_finite()
            && sampling.lower_bound < sampling.upper_bound)
        {
            return Err(ConfigError::InvalidValue {
                name: "bounds",
                reason: format!(
                    "expected finite lower < upper, got [{}, {}]",
                    sampling.lower_bound, sampling.upper_bound
                ),
            });
        }
        if !(optimization.initial_step.is_finite() && optimization.initial_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "initial_step",
                reason: format!("must be positive, got {}", optimization.initial_step),
            });
        }
        for (name, value) in [
            ("function_tolerance", optimization.function_tolerance),
            ("parameter_tolerance", optimization.parameter_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidValue {
                    name,
                    reason: format!("must be non-negative, got {}", value),
                });
            }
        }

        Ok(ParameterizationConfig {
            sampling,
            optimization,
        })
    }
}

pub const DEFAULT_METHOD: &str = "eqeqc";
pub const DEFAULT_CLASSIFIER: ClassifierKind = ClassifierKind::Hbo;

/// Everything the fit workflow needs besides its input data.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub method: String,
    pub classifier: ClassifierKind,
    pub charges_output: PathBuf,
    pub parameters_output: Option<PathBuf>,
    pub parameterization: ParameterizationConfig,
}

#[derive(Default)]
pub struct FitConfigBuilder {
    method: Option<String>,
    classifier: Option<ClassifierKind>,
    charges_output: Option<PathBuf>,
    parameters_output: Option<PathBuf>,
    parameterization: Option<ParameterizationConfig>,
}

impl FitConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, name: &str) -> Self {
        self.method = Some(name.to_string());
        self
    }
    pub fn classifier(mut self, kind: ClassifierKind) -> Self {
        self.classifier = Some(kind);
        self
    }
    pub fn charges_output(mut self, path: PathBuf) -> Self {
        self.charges_output = Some(path);
        self
    }
    pub fn parameters_output(mut self, path: Option<PathBuf>) -> Self {
        self.parameters_output = path;
        self
    }
    pub fn parameterization(mut self, config: ParameterizationConfig) -> Self {
        self.parameterization = Some(config);
        self
    }

    pub fn build(self) -> Result<FitConfig, ConfigError> {
        Ok(FitConfig {
            method: self.method.unwrap_or_else(|| DEFAULT_METHOD.to_string()),
            classifier: self.classifier.unwrap_or(DEFAULT_CLASSIFIER),
            charges_output: self
                .charges_output
                .ok_or(ConfigError::MissingParameter("charges_output"))?,
            parameters_output: self.parameters_output,
            parameterization: self.parameterization.unwrap_or_default(),
        })
    }
}

/// Everything the charge-calculation workflow needs besides the structures.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargesConfig {
    pub parameters_path: PathBuf,
    pub charges_output: PathBuf,
}

#[derive(Default)]
pub struct ChargesConfigBuilder {
    parameters_path: Option<PathBuf>,
    charges_output: Option<PathBuf>,
}

impl ChargesConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameters_path(mut self, path: PathBuf) -> Self {
        self.parameters_path = Some(path);
        self
    }
    pub fn charges_output(mut self, path: PathBuf) -> Self {
        self.charges_output = Some(path);
        self
    }

    pub fn build(self) -> Result<ChargesConfig, ConfigError> {
        Ok(ChargesConfig {
            parameters_path: self
                .parameters_path
                .ok_or(ConfigError::MissingParameter("parameters_path"))?,
            charges_output: self
                .charges_output
                .ok_or(ConfigError::MissingParameter("charges_output"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_documented_values() {
        let config = ParameterizationConfigBuilder::new().build().unwrap();
        assert_eq!(config.sampling.num_samples, 100);
        assert_eq!(config.sampling.lower_bound, 0.0);
        assert_eq!(config.sampling.upper_bound, 3.0);
        assert_eq!(config.sampling.seed, 1);
        assert_eq!(config.optimization.max_evaluations, 500);
        assert_eq!(config, ParameterizationConfig::default());
    }

    #[test]
    fn builder_applies_overrides() {
        let config = ParameterizationConfigBuilder::new()
            .num_samples(10)
            .bounds(-1.0, 1.0)
            .seed(42)
            .max_evaluations(50)
            .initial_step(0.5)
            .build()
            .unwrap();
        assert_eq!(config.sampling.num_samples, 10);
        assert_eq!(config.sampling.lower_bound, -1.0);
        assert_eq!(config.sampling.seed, 42);
        assert_eq!(config.optimization.max_evaluations, 50);
        assert_eq!(config.optimization.initial_step, 0.5);
    }

    #[test]
    fn builder_rejects_inverted_bounds() {
        let result = ParameterizationConfigBuilder::new().bounds(3.0, 0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "bounds", .. })
        ));
    }

    #[test]
    fn builder_rejects_zero_samples() {
        let result = ParameterizationConfigBuilder::new().num_samples(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "num_samples", .. })
        ));
    }

    #[test]
    fn builder_rejects_non_positive_step() {
        let result = ParameterizationConfigBuilder::new().initial_step(0.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "initial_step", .. })
        ));
    }

    #[test]
    fn fit_builder_requires_output_and_fills_defaults() {
        assert_eq!(
            FitConfigBuilder::new().build(),
            Err(ConfigError::MissingParameter("charges_output"))
        );

        let config = FitConfigBuilder::new()
            .charges_output(PathBuf::from("out.txt"))
            .build()
            .unwrap();
        assert_eq!(config.method, "eqeqc");
        assert_eq!(config.classifier, ClassifierKind::Hbo);
        assert_eq!(config.parameters_output, None);
        assert_eq!(config.parameterization, ParameterizationConfig::default());
    }

    #[test]
    fn charges_builder_requires_both_paths() {
        assert_eq!(
            ChargesConfigBuilder::new()
                .charges_output(PathBuf::from("out.txt"))
                .build(),
            Err(ConfigError::MissingParameter("parameters_path"))
        );
        assert!(
            ChargesConfigBuilder::new()
                .parameters_path(PathBuf::from("p.toml"))
                .charges_output(PathBuf::from("out.txt"))
                .build()
                .is_ok()
        );
    }
}
