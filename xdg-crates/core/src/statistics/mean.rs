use std::fmt::Display;
use std::fmt::Formatter;

use num::cast::AsPrimitive;
use num::Unsigned;

/// Arithmetic mean of the samples recorded so far, e.g. propagator runs per expanded space.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean<Sample> {
    total: Sample,
    samples: u64,
}

impl<Sample> Mean<Sample>
where
    Sample: Unsigned + Copy + AsPrimitive<f64>,
{
    pub fn record(&mut self, sample: Sample) {
        self.total = self.total + sample;
        self.samples += 1;
    }

    pub fn num_samples(&self) -> u64 {
        self.samples
    }

    /// Zero until a sample is recorded.
    pub fn value(&self) -> f64 {
        match self.samples {
            0 => 0.0,
            samples => self.total.as_() / samples as f64,
        }
    }
}

impl<Sample> Display for Mean<Sample>
where
    Sample: Unsigned + Copy + AsPrimitive<f64>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::Mean;

    #[test]
    fn mean_without_samples_is_zero() {
        let mean = Mean::<u64>::default();
        assert_eq!(mean.num_samples(), 0);
        assert_eq!(mean.to_string(), "0.00");
    }

    #[test]
    fn mean_follows_recorded_samples() {
        let mut mean = Mean::default();
        mean.record(3_u64);
        mean.record(6);
        assert_eq!(mean.to_string(), "4.50");
        mean.record(0);
        assert_eq!(mean.num_samples(), 3);
        assert_eq!(mean.to_string(), "3.00");
    }
}
