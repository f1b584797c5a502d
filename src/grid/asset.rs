//! Evenly spaced asset grid

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Bounds and resolution of the asset grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetGridSpec {
    /// Lowest asset level (xmin)
    #[serde(alias = "xmin")]
    pub min: f64,

    /// Highest asset level (xmax)
    #[serde(alias = "xmax")]
    pub max: f64,

    /// Number of grid points (nx)
    #[serde(alias = "nx")]
    pub points: usize,
}

impl Default for AssetGridSpec {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 4.0,
            points: 1500,
        }
    }
}

impl AssetGridSpec {
    /// Check that the bounds and point count give a strictly increasing grid
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.points < 2 {
            return Err(ModelError::grid(
                "asset",
                format!("nx = {} must be at least 2", self.points),
            ));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ModelError::grid(
                "asset",
                format!("bounds must be finite, got [{}, {}]", self.min, self.max),
            ));
        }
        if self.min >= self.max {
            return Err(ModelError::grid(
                "asset",
                format!("xmin = {} must be below xmax = {}", self.min, self.max),
            ));
        }
        Ok(())
    }

    /// Distance between neighbouring grid points
    pub fn step(&self) -> f64 {
        (self.max - self.min) / (self.points - 1) as f64
    }
}

/// Ordered asset levels `xmin + i * step`
#[derive(Debug, Clone, PartialEq)]
pub struct AssetGrid {
    pub(crate) levels: Vec<f64>,
}

impl AssetGrid {
    /// Build the grid, failing fast on an invalid spec
    pub fn build(spec: &AssetGridSpec) -> Result<Self, ModelError> {
        spec.validate()?;

        let step = spec.step();
        let levels = (0..spec.points)
            .map(|i| spec.min + i as f64 * step)
            .collect();

        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_default_grid_endpoints() {
        let grid = AssetGrid::build(&AssetGridSpec::default()).unwrap();

        assert_eq!(grid.len(), 1500);
        assert_eq!(grid.levels()[0], 0.1);
        assert_abs_diff_eq!(grid.levels()[1499], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_point_grid() {
        let spec = AssetGridSpec { min: 1.0, max: 2.0, points: 2 };
        let grid = AssetGrid::build(&spec).unwrap();
        assert_eq!(grid.levels(), &[1.0, 2.0]);
    }

    #[test]
    fn test_rejects_invalid_specs() {
        let too_few = AssetGridSpec { min: 0.0, max: 1.0, points: 1 };
        assert!(matches!(
            AssetGrid::build(&too_few),
            Err(ModelError::InvalidGridSpec { grid: "asset", .. })
        ));

        let reversed = AssetGridSpec { min: 2.0, max: 1.0, points: 10 };
        assert!(matches!(
            AssetGrid::build(&reversed),
            Err(ModelError::InvalidGridSpec { .. })
        ));

        let flat = AssetGridSpec { min: 1.0, max: 1.0, points: 10 };
        assert!(AssetGrid::build(&flat).is_err());

        let unbounded = AssetGridSpec { min: 0.0, max: f64::INFINITY, points: 10 };
        assert!(AssetGrid::build(&unbounded).is_err());
    }

    proptest! {
        #[test]
        fn prop_grid_is_uniform_and_increasing(
            min in -100.0f64..100.0,
            width in 0.01f64..50.0,
            points in 2usize..400,
        ) {
            let spec = AssetGridSpec { min, max: min + width, points };
            let grid = AssetGrid::build(&spec).unwrap();
            let levels = grid.levels();
            let step = spec.step();

            prop_assert_eq!(levels.len(), points);
            prop_assert_eq!(levels[0], min);
            prop_assert!((levels[points - 1] - spec.max).abs() < 1e-9);
            for pair in levels.windows(2) {
                prop_assert!(pair[1] > pair[0]);
                prop_assert!((pair[1] - pair[0] - step).abs() < 1e-9);
            }
        }
    }
}
