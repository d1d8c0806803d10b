use std::io::Write;

use super::Statistics;

/// One recorded measurement from one lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRecord {
    /// Position of the lattice in the ensemble.
    pub lattice: usize,
    /// 0-based sample counter within the lattice.
    pub sample: usize,
    /// 1-based step after which the sample was taken.
    pub step: u64,
    pub energy: i32,
    pub magnetization: i32,
}

impl SampleRecord {
    /// Text record: `lattice sample step energy magnetization`.
    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(
            w,
            "{} {} {} {} {}",
            self.lattice, self.sample, self.step, self.energy, self.magnetization
        )
    }
}

/// Ensemble-pooled thermodynamic estimates at a single inverse temperature.
///
/// Energies and magnetizations are lattice totals, not per-site values.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub beta: f64,
    pub n_sites: usize,
    pub n_samples: u64,
    /// ⟨E⟩.
    pub energy: f64,
    /// ⟨E²⟩.
    pub energy2: f64,
    /// ⟨M⟩.
    pub mag: f64,
    /// ⟨M²⟩.
    pub mag2: f64,
    /// ⟨|M|⟩.
    pub abs_mag: f64,
}

impl SampleSummary {
    pub fn from_statistics(stats: &Statistics, beta: f64, n_sites: usize) -> Self {
        let [energy, energy2, mag, mag2, abs_mag] = stats.average();
        Self {
            beta,
            n_sites,
            n_samples: stats.count,
            energy,
            energy2,
            mag,
            mag2,
            abs_mag,
        }
    }

    /// `C = β² (⟨E²⟩ − ⟨E⟩²)`.
    pub fn specific_heat(&self) -> f64 {
        self.beta * self.beta * (self.energy2 - self.energy * self.energy)
    }

    /// `χ = β (⟨M²⟩ − ⟨|M|⟩²)`.
    pub fn susceptibility(&self) -> f64 {
        self.beta * (self.mag2 - self.abs_mag * self.abs_mag)
    }

    pub fn energy_per_site(&self) -> f64 {
        self.energy / self.n_sites as f64
    }

    pub fn abs_mag_per_site(&self) -> f64 {
        self.abs_mag / self.n_sites as f64
    }

    pub fn specific_heat_per_site(&self) -> f64 {
        self.specific_heat() / self.n_sites as f64
    }

    pub fn susceptibility_per_site(&self) -> f64 {
        self.susceptibility() / self.n_sites as f64
    }
}

/// Output of an ensemble run: pooled estimates plus every buffered record,
/// ordered by lattice then sample.
#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub summary: SampleSummary,
    pub records: Vec<SampleRecord>,
}
