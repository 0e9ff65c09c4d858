use std::collections::HashMap;

/// Sampled G(T) of one phase: temperature -> energy.
///
/// Keys are exact f64 values (compared by bit pattern). Iteration follows insertion order;
/// inserting an existing temperature replaces its energy but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct SampledCurve {
    pub label: String,
    points: Vec<(f64, f64)>,
    index: HashMap<u64, usize>,
}

impl PartialEq for SampledCurve {
    fn eq(&self, other: &Self) -> bool {
        // bitwise comparison, NaN-safe and sign-aware
        self.label == other.label
            && self.points.len() == other.points.len()
            && self
                .points
                .iter()
                .zip(other.points.iter())
                .all(|(a, b)| a.0.to_bits() == b.0.to_bits() && a.1.to_bits() == b.1.to_bits())
    }
}

impl SampledCurve {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            points: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn from_points<I>(label: &str, points: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut curve = Self::new(label);
        curve.extend(points);
        curve
    }

    fn key(t: f64) -> u64 {
        // +0.0 and -0.0 are the same temperature
        if t == 0.0 { 0.0f64.to_bits() } else { t.to_bits() }
    }
    /// last write wins
    pub fn insert(&mut self, t: f64, energy: f64) {
        match self.index.get(&Self::key(t)) {
            Some(&position) => self.points[position].1 = energy,
            None => {
                self.index.insert(Self::key(t), self.points.len());
                self.points.push((t, energy));
            }
        }
    }

    pub fn extend<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        for (t, energy) in points {
            self.insert(t, energy);
        }
    }

    pub fn get(&self, t: f64) -> Option<f64> {
        self.index
            .get(&Self::key(t))
            .map(|&position| self.points[position].1)
    }

    pub fn contains(&self, t: f64) -> bool {
        self.index.contains_key(&Self::key(t))
    }
    /// (temperature, energy) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.0).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.1).collect()
    }
    /// lowest and highest sampled temperature
    pub fn span(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, &(t, _)| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
    }

    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        let mut sorted = self.points.clone();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        sorted
    }
    /// linear interpolation of the energy at t; None outside of the sampled span
    pub fn interpolate(&self, t: f64) -> Option<f64> {
        interpolate_sorted(&self.sorted_points(), t)
    }
}

/// linear interpolation over points sorted by temperature
pub(crate) fn interpolate_sorted(sorted: &[(f64, f64)], t: f64) -> Option<f64> {
    let (first, last) = (sorted.first()?, sorted.last()?);
    if t < first.0 || t > last.0 || t.is_nan() {
        return None;
    }
    // first sample with temperature >= t
    let upper = sorted.partition_point(|p| p.0 < t);
    let (t1, g1) = sorted[upper];
    if t1 == t || upper == 0 {
        return Some(g1);
    }
    let (t0, g0) = sorted[upper - 1];
    Some(g0 + (g1 - g0) * (t - t0) / (t1 - t0))
}
