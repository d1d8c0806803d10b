/// Running sums of the sampled global energy and magnetization.
///
/// Integer sums are exact, so accumulators from independent lattices can be
/// merged in any order with identical results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub count: u64,
    pub energy: i64,
    pub energy2: i64,
    pub mag: i64,
    pub mag2: i64,
    pub abs_mag: i64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, energy: i32, magnetization: i32) {
        let e = energy as i64;
        let m = magnetization as i64;
        self.count += 1;
        self.energy += e;
        self.energy2 += e * e;
        self.mag += m;
        self.mag2 += m * m;
        self.abs_mag += m.abs();
    }

    pub fn merge(&mut self, other: &Self) {
        self.count += other.count;
        self.energy += other.energy;
        self.energy2 += other.energy2;
        self.mag += other.mag;
        self.mag2 += other.mag2;
        self.abs_mag += other.abs_mag;
    }

    /// Means `[⟨E⟩, ⟨E²⟩, ⟨M⟩, ⟨M²⟩, ⟨|M|⟩]`; all zero before the first sample.
    pub fn average(&self) -> [f64; 5] {
        let sums = [self.energy, self.energy2, self.mag, self.mag2, self.abs_mag];
        if self.count == 0 {
            return [0.0; 5];
        }
        let c = self.count as f64;
        sums.map(|s| s as f64 / c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_average() {
        let mut s = Statistics::new();
        assert_eq!(s.average(), [0.0; 5]);
        s.update(-4, 2);
        s.update(-2, -4);
        assert_eq!(s.count, 2);
        assert_eq!(s.average(), [-3.0, 10.0, -1.0, 10.0, 3.0]);
    }

    #[test]
    fn test_merge_matches_single_stream() {
        let samples = [(-8, 4), (-6, 2), (-8, -4), (0, 0), (-4, 2)];
        let mut all = Statistics::new();
        let mut left = Statistics::new();
        let mut right = Statistics::new();
        for (k, &(e, m)) in samples.iter().enumerate() {
            all.update(e, m);
            if k < 2 {
                left.update(e, m);
            } else {
                right.update(e, m);
            }
        }
        left.merge(&right);
        assert_eq!(left, all);
    }
}
