use crate::Thermodynamics::gibbs_error::GibbsError;

/// Immutable linearly spaced temperature grid, K.
///
/// Sample `i` is `start + i * step`, the last sample is exactly `end`, so two ranges
/// built from the same bounds produce bit-identical samples.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureRange {
    start: f64,
    end: f64,
    samples: usize,
}

impl TemperatureRange {
    pub fn new(start: f64, end: f64, samples: usize) -> Result<Self, GibbsError> {
        let invalid = || GibbsError::InvalidTemperatureRange {
            start,
            end,
            samples,
        };
        if samples == 0 || !start.is_finite() || !end.is_finite() {
            return Err(invalid());
        }
        if samples > 1 && start >= end {
            return Err(invalid());
        }
        Ok(Self {
            start,
            end,
            samples,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn samples(&self) -> usize {
        self.samples
    }
    /// spacing between neighbouring samples; 0 for a single-point range
    pub fn step(&self) -> f64 {
        if self.samples > 1 {
            (self.end - self.start) / (self.samples - 1) as f64
        } else {
            0.0
        }
    }

    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }
    /// sample points in increasing order
    pub fn points(&self) -> impl Iterator<Item = f64> + '_ {
        let step = self.step();
        let last = self.samples - 1;
        (0..self.samples).map(move |i| {
            if i == last && self.samples > 1 {
                self.end
            } else {
                i as f64 * step + self.start
            }
        })
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.points().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_spacing() {
        let range = TemperatureRange::new(300.0, 400.0, 11).unwrap();
        let points = range.to_vec();
        assert_eq!(points.len(), 11);
        assert_eq!(points[0], 300.0);
        assert_eq!(points[10], 400.0);
        assert_relative_eq!(range.step(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(points[5], 350.0, epsilon = 1e-9);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_shared_boundary_is_exact() {
        let lower = TemperatureRange::new(700.0, 933.47, 1000).unwrap();
        let upper = TemperatureRange::new(933.47, 1000.0, 1000).unwrap();
        assert_eq!(lower.to_vec().last(), upper.to_vec().first());
    }

    #[test]
    fn test_single_point() {
        let range = TemperatureRange::new(500.0, 500.0, 1).unwrap();
        assert_eq!(range.to_vec(), vec![500.0]);
        assert_eq!(range.step(), 0.0);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            TemperatureRange::new(700.0, 300.0, 10),
            Err(GibbsError::InvalidTemperatureRange { samples: 10, .. })
        ));
        assert!(TemperatureRange::new(300.0, 700.0, 0).is_err());
        assert!(TemperatureRange::new(f64::NAN, 700.0, 10).is_err());
        assert!(TemperatureRange::new(300.0, f64::INFINITY, 10).is_err());
    }
}
