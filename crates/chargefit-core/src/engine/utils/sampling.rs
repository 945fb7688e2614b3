use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("Cannot build a design with {dims} dimensions and {points} points")]
    EmptyDesign { dims: usize, points: usize },
    #[error("Invalid bounds [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },
}

/// Latin-hypercube design in the unit cube.
///
/// Each dimension is split into `n_points` equal strata and every stratum holds
/// exactly one point. The same seed always yields the same design.
#[instrument(level = "debug", skip_all, fields(n_dims, n_points, seed))]
pub fn latin_hypercube(
    n_dims: usize,
    n_points: usize,
    seed: u64,
) -> Result<Vec<Vec<f64>>, SamplingError> {
    if n_dims == 0 || n_points == 0 {
        return Err(SamplingError::EmptyDesign {
            dims: n_dims,
            points: n_points,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = vec![vec![0.0; n_dims]; n_points];
    let mut strata: Vec<usize> = (0..n_points).collect();
    let width = 1.0 / n_points as f64;

    for dim in 0..n_dims {
        strata.shuffle(&mut rng);
        for (point, &stratum) in points.iter_mut().zip(&strata) {
            point[dim] = (stratum as f64 + rng.r#gen::<f64>()) * width;
        }
    }
    Ok(points)
}

/// Maps unit-cube points onto `[lower, upper]` in every dimension.
pub fn scale_to_bounds(
    points: &mut [Vec<f64>],
    lower: f64,
    upper: f64,
) -> Result<(), SamplingError> {
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(SamplingError::InvalidBounds { lower, upper });
    }
    let span = upper - lower;
    for value in points.iter_mut().flatten() {
        *value = lower + *value * span;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_design() {
        let a = latin_hypercube(2, 3, 1).unwrap();
        let b = latin_hypercube(2, 3, 1).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(a.iter().all(|p| p.len() == 2));
    }

    #[test]
    fn different_seeds_give_different_designs() {
        let a = latin_hypercube(2, 3, 1).unwrap();
        let b = latin_hypercube(2, 3, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn every_stratum_holds_exactly_one_point() {
        let n = 10;
        let design = latin_hypercube(3, n, 7).unwrap();
        for dim in 0..3 {
            let mut strata: Vec<usize> = design
                .iter()
                .map(|p| {
                    assert!((0.0..1.0).contains(&p[dim]));
                    (p[dim] * n as f64) as usize
                })
                .collect();
            strata.sort_unstable();
            assert_eq!(strata, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn empty_design_is_rejected() {
        assert_eq!(
            latin_hypercube(0, 3, 1),
            Err(SamplingError::EmptyDesign { dims: 0, points: 3 })
        );
        assert!(latin_hypercube(2, 0, 1).is_err());
    }

    #[test]
    fn scaling_maps_unit_interval_onto_bounds() {
        let mut points = vec![vec![0.0, 0.5], vec![1.0, 0.25]];
        scale_to_bounds(&mut points, 0.0, 3.0).unwrap();
        assert_eq!(points, vec![vec![0.0, 1.5], vec![3.0, 0.75]]);
    }

    #[test]
    fn scaling_rejects_inverted_bounds() {
        let mut points = vec![vec![0.5]];
        assert!(scale_to_bounds(&mut points, 1.0, 1.0).is_err());
    }
}
