use crate::cli::FitArgs;
use crate::error::{CliError, Result};
use chargefit::core::topology::classifier::ClassifierKind;
use chargefit::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSamplingConfig {
    samples: Option<usize>,
    lower_bound: Option<f64>,
    upper_bound: Option<f64>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOptimizationConfig {
    max_evaluations: Option<usize>,
    initial_step: Option<f64>,
    function_tolerance: Option<f64>,
    parameter_tolerance: Option<f64>,
}

/// The `fit` configuration as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialFitConfig {
    method: Option<String>,
    classifier: Option<String>,
    sampling: Option<PartialSamplingConfig>,
    optimization: Option<PartialOptimizationConfig>,
}

impl PartialFitConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::parsing(path, e))
    }

    /// Resolves the final configuration. Precedence: dedicated CLI flags, then `--set`
    /// values, then the config file, then the library defaults.
    pub fn merge_with_cli(mut self, args: &FitArgs) -> Result<core_config::FitConfig> {
        self.apply_set_values(&args.set_values)?;

        let sampling = self.sampling.take().unwrap_or_default();
        let optimization = self.optimization.take().unwrap_or_default();

        let mut search = core_config::ParameterizationConfigBuilder::new();
        if let Some(n) = args.samples.or(sampling.samples) {
            search = search.num_samples(n);
        }
        if let Some(seed) = args.seed.or(sampling.seed) {
            search = search.seed(seed);
        }
        match (sampling.lower_bound, sampling.upper_bound) {
            (None, None) => {}
            (lower, upper) => {
                search = search.bounds(
                    lower.unwrap_or(core_config::DEFAULT_LOWER_BOUND),
                    upper.unwrap_or(core_config::DEFAULT_UPPER_BOUND),
                );
            }
        }
        if let Some(n) = args.max_evaluations.or(optimization.max_evaluations) {
            search = search.max_evaluations(n);
        }
        if let Some(step) = optimization.initial_step {
            search = search.initial_step(step);
        }
        if let Some(tol) = optimization.function_tolerance {
            search = search.function_tolerance(tol);
        }
        if let Some(tol) = optimization.parameter_tolerance {
            search = search.parameter_tolerance(tol);
        }
        let parameterization = search.build().map_err(|e| CliError::Config(e.to_string()))?;

        let classifier = match (args.classifier, self.classifier.as_deref()) {
            (Some(kind), _) => kind,
            (None, Some(name)) => {
                ClassifierKind::from_str(name).map_err(|e| CliError::Config(e.to_string()))?
            }
            (None, None) => core_config::DEFAULT_CLASSIFIER,
        };
        let method = args
            .method
            .as_deref()
            .or(self.method.as_deref())
            .unwrap_or(core_config::DEFAULT_METHOD);

        core_config::FitConfigBuilder::new()
            .method(method)
            .classifier(classifier)
            .charges_output(args.output.clone())
            .parameters_output(args.parameters_out.clone())
            .parameterization(parameterization)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let (key, value) = (key.trim(), value.trim());

            match key {
                "method" => self.method = Some(value.to_string()),
                "classifier" => self.classifier = Some(value.to_string()),
                "sampling.samples" => {
                    self.sampling_mut().samples = Some(parse_value(key, value)?);
                }
                "sampling.lower-bound" => {
                    self.sampling_mut().lower_bound = Some(parse_value(key, value)?);
                }
                "sampling.upper-bound" => {
                    self.sampling_mut().upper_bound = Some(parse_value(key, value)?);
                }
                "sampling.seed" => {
                    self.sampling_mut().seed = Some(parse_value(key, value)?);
                }
                "optimization.max-evaluations" => {
                    self.optimization_mut().max_evaluations = Some(parse_value(key, value)?);
                }
                "optimization.initial-step" => {
                    self.optimization_mut().initial_step = Some(parse_value(key, value)?);
                }
                "optimization.function-tolerance" => {
                    self.optimization_mut().function_tolerance = Some(parse_value(key, value)?);
                }
                "optimization.parameter-tolerance" => {
                    self.optimization_mut().parameter_tolerance = Some(parse_value(key, value)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn sampling_mut(&mut self) -> &mut PartialSamplingConfig {
        self.sampling.get_or_insert_with(Default::default)
    }

    fn optimization_mut(&mut self) -> &mut PartialOptimizationConfig {
        self.optimization.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}
