use super::config::OptimizationConfig;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, instrument};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum OptimizerError {
    #[error("Cannot optimize over an empty parameter vector")]
    EmptyStart,
    #[error("The evaluation budget must allow at least one evaluation")]
    ZeroBudget,
    #[error("Objective failed at the start point: {0}")]
    InvalidStart(String),
}

/// Why the search stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationStatus {
    Converged,
    BudgetExhausted,
    /// The best value found is not lower than the value at the start point.
    NoImprovement,
    /// The objective failed or returned a non-finite value.
    Aborted(String),
}

impl fmt::Display for OptimizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged => write!(f, "converged"),
            Self::BudgetExhausted => write!(f, "evaluation budget exhausted"),
            Self::NoImprovement => write!(f, "no improvement over the start point"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub best_point: Vec<f64>,
    pub best_value: f64,
    pub start_value: f64,
    pub evaluations: usize,
    pub status: OptimizationStatus,
}

enum Stop {
    Budget,
    Failed(String),
}

/// Counts evaluations against the budget and remembers the best point seen.
struct Evaluator<F, E> {
    objective: F,
    _error: PhantomData<fn() -> E>,
    evaluations: usize,
    max_evaluations: usize,
    best: Option<(Vec<f64>, f64)>,
}

impl<F, E> Evaluator<F, E>
where
    F: FnMut(&[f64]) -> Result<f64, E>,
    E: fmt::Display,
{
    fn eval(&mut self, x: &[f64]) -> Result<f64, Stop> {
        if self.evaluations >= self.max_evaluations {
            return Err(Stop::Budget);
        }
        self.evaluations += 1;
        let value = (self.objective)(x).map_err(|e| Stop::Failed(e.to_string()))?;
        if !value.is_finite() {
            return Err(Stop::Failed(format!(
                "objective returned {} at {:?}",
                value, x
            )));
        }
        if self.best.as_ref().is_none_or(|(_, best)| value < *best) {
            self.best = Some((x.to_vec(), value));
        }
        Ok(value)
    }
}

/// Derivative-free Nelder-Mead simplex minimizer with an evaluation budget.
#[derive(Debug, Clone)]
pub struct NelderMead {
    config: OptimizationConfig,
}

impl NelderMead {
    pub fn new(config: OptimizationConfig) -> Self {
        Self { config }
    }

    /// Minimizes `objective` starting from `start`.
    ///
    /// Failures after the start point are not errors: the search stops, the best
    /// point found so far is returned and the status records the reason.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is empty, the budget is zero, or the objective
    /// fails at `start`.
    #[instrument(skip_all, fields(dims = start.len()))]
    pub fn minimize<F, E>(
        &self,
        objective: F,
        start: &[f64],
    ) -> Result<OptimizationOutcome, OptimizerError>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: fmt::Display,
    {
        if start.is_empty() {
            return Err(OptimizerError::EmptyStart);
        }
        if self.config.max_evaluations == 0 {
            return Err(OptimizerError::ZeroBudget);
        }

        let mut evaluator = Evaluator {
            objective,
            _error: PhantomData,
            evaluations: 0,
            max_evaluations: self.config.max_evaluations,
            best: None,
        };
        let start_value = match evaluator.eval(start) {
            Ok(value) => value,
            Err(Stop::Failed(reason)) => return Err(OptimizerError::InvalidStart(reason)),
            Err(Stop::Budget) => return Err(OptimizerError::ZeroBudget),
        };

        let status = match self.search(&mut evaluator, start, start_value) {
            Ok(()) => OptimizationStatus::Converged,
            Err(Stop::Budget) => OptimizationStatus::BudgetExhausted,
            Err(Stop::Failed(reason)) => OptimizationStatus::Aborted(reason),
        };

        let (best_point, best_value) = evaluator
            .best
            .unwrap_or_else(|| (start.to_vec(), start_value));
        let status = match status {
            OptimizationStatus::Aborted(_) => status,
            _ if best_value >= start_value => OptimizationStatus::NoImprovement,
            _ => status,
        };

        debug!(
            evaluations = evaluator.evaluations,
            best_value, start_value, "Nelder-Mead finished: {}", status
        );
        Ok(OptimizationOutcome {
            best_point,
            best_value,
            start_value,
            evaluations: evaluator.evaluations,
            status,
        })
    }

    fn search<F, E>(
        &self,
        evaluator: &mut Evaluator<F, E>,
        start: &[f64],
        start_value: f64,
    ) -> Result<(), Stop>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
        E: fmt::Display,
    {
        let n = start.len();
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((start.to_vec(), start_value));
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.config.initial_step;
            let value = evaluator.eval(&vertex)?;
            simplex.push((vertex, value));
        }

        loop {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            if self.has_converged(&simplex) {
                return Ok(());
            }

            let worst_value = simplex[n].1;
            let second_worst_value = simplex[n - 1].1;
            let best_value = simplex[0].1;
            let centroid = centroid(&simplex[..n]);
            let worst = simplex[n].0.clone();

            let reflected = along(&centroid, &worst, -REFLECTION);
            let reflected_value = evaluator.eval(&reflected)?;

            if reflected_value < best_value {
                let expanded = along(&centroid, &worst, -REFLECTION * EXPANSION);
                let expanded_value = evaluator.eval(&expanded)?;
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < second_worst_value {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            let (contracted, limit) = if reflected_value < worst_value {
                (
                    along(&centroid, &worst, -REFLECTION * CONTRACTION),
                    reflected_value,
                )
            } else {
                (along(&centroid, &worst, CONTRACTION), worst_value)
            };
            let contracted_value = evaluator.eval(&contracted)?;
            if contracted_value < limit {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            let anchor = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk: Vec<f64> = anchor
                    .iter()
                    .zip(&vertex.0)
                    .map(|(a, v)| a + SHRINK * (v - a))
                    .collect();
                let value = evaluator.eval(&shrunk)?;
                *vertex = (shrunk, value);
            }
        }
    }

    fn has_converged(&self, simplex: &[(Vec<f64>, f64)]) -> bool {
        let (best_point, best_value) = &simplex[0];
        let value_spread = simplex
            .iter()
            .map(|(_, v)| (v - best_value).abs())
            .fold(0.0, f64::max);
        let point_spread = simplex
            .iter()
            .flat_map(|(x, _)| x.iter().zip(best_point).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        value_spread <= self.config.function_tolerance
            && point_spread <= self.config.parameter_tolerance
    }
}

fn centroid(vertices: &[(Vec<f64>, f64)]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let dims = vertices[0].0.len();
    (0..dims)
        .map(|d| vertices.iter().map(|(x, _)| x[d]).sum::<f64>() / n)
        .collect()
}

/// `centroid + t * (point - centroid)`.
fn along(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + t * (p - c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ParameterizationConfigBuilder;
    use std::convert::Infallible;

    fn optimizer(max_evaluations: usize) -> NelderMead {
        let config = ParameterizationConfigBuilder::new()
            .max_evaluations(max_evaluations)
            .function_tolerance(1e-8)
            .parameter_tolerance(1e-5)
            .build()
            .unwrap();
        NelderMead::new(config.optimization)
    }

    fn quadratic(x: &[f64]) -> Result<f64, Infallible> {
        Ok((x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2))
    }

    #[test]
    fn finds_minimum_of_a_quadratic() {
        let outcome = optimizer(500).minimize(quadratic, &[0.0, 0.0]).unwrap();
        assert_eq!(outcome.status, OptimizationStatus::Converged);
        assert!((outcome.best_point[0] - 1.0).abs() < 1e-3);
        assert!((outcome.best_point[1] + 0.5).abs() < 1e-3);
        assert!(outcome.best_value < outcome.start_value);
        assert!(outcome.evaluations <= 500);
    }

    #[test]
    fn constant_objective_stops_within_budget_without_improvement() {
        let budget = 500;
        let outcome = optimizer(budget)
            .minimize(|_: &[f64]| Ok::<_, Infallible>(5.0), &[1.0, 2.0, 0.5])
            .unwrap();
        assert_eq!(outcome.status, OptimizationStatus::NoImprovement);
        assert!(outcome.evaluations <= budget);
        assert_eq!(outcome.best_value, 5.0);
        assert_eq!(outcome.best_point, vec![1.0, 2.0, 0.5]);
    }

    #[test]
    fn budget_is_never_exceeded() {
        let mut calls = 0;
        let outcome = optimizer(7)
            .minimize(
                |x: &[f64]| {
                    calls += 1;
                    quadratic(x)
                },
                &[5.0, 5.0],
            )
            .unwrap();
        assert_eq!(outcome.status, OptimizationStatus::BudgetExhausted);
        assert_eq!(outcome.evaluations, 7);
        assert_eq!(calls, 7);
    }

    #[test]
    fn failing_objective_keeps_best_point_so_far() {
        let outcome = optimizer(100)
            .minimize(
                |x: &[f64]| {
                    if x[0] > 0.05 {
                        Err("out of range")
                    } else {
                        Ok(x[0].powi(2))
                    }
                },
                &[0.04],
            )
            .unwrap();
        assert!(matches!(outcome.status, OptimizationStatus::Aborted(_)));
        assert!(outcome.best_value <= outcome.start_value);
    }

    #[test]
    fn non_finite_values_abort_the_search() {
        let outcome = optimizer(100)
            .minimize(
                |x: &[f64]| Ok::<_, Infallible>(if x[0] == 0.0 { 1.0 } else { f64::NAN }),
                &[0.0],
            )
            .unwrap();
        assert!(matches!(outcome.status, OptimizationStatus::Aborted(_)));
        assert_eq!(outcome.best_point, vec![0.0]);
    }

    #[test]
    fn invalid_inputs_are_errors() {
        let nm = optimizer(10);
        assert_eq!(
            nm.minimize(quadratic, &[]).unwrap_err(),
            OptimizerError::EmptyStart
        );
        assert_eq!(
            nm.minimize(|_: &[f64]| Err("boom"), &[0.0]).unwrap_err(),
            OptimizerError::InvalidStart("boom".to_string())
        );
    }
}
