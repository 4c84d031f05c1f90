use crate::signal::Signal;

/// Seeded random-walk price path with a matching random signal stream.
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    state: u64,
    price: f64,
    max_step: f64,
}

impl SeriesGenerator {
    pub fn new(seed: u64, start_price: f64, max_step: f64) -> Self {
        assert!(
            start_price.is_finite() && start_price > 0.0,
            "start_price must be finite and positive"
        );
        assert!(
            max_step.is_finite() && max_step >= 0.0,
            "max_step must be finite and non-negative"
        );

        Self {
            state: seed,
            price: start_price,
            max_step,
        }
    }

    /// Next price; the walk is floored at one cent.
    pub fn next_price(&mut self) -> f64 {
        let unit = next_unit(&mut self.state);
        let delta = (unit * 2.0 - 1.0) * self.max_step;
        self.price = (self.price + delta).max(0.01);
        self.price
    }

    pub fn next_signal(&mut self) -> Signal {
        match next_u64(&mut self.state) >> 62 {
            0 => Signal::Short,
            1 | 2 => Signal::Flat,
            _ => Signal::Long,
        }
    }

    pub fn prices(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.next_price()).collect()
    }

    pub fn signals(&mut self, len: usize) -> Vec<Signal> {
        (0..len).map(|_| self.next_signal()).collect()
    }
}

fn next_u64(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

fn next_unit(state: &mut u64) -> f64 {
    let value = next_u64(state);
    (value as f64) / (u64::MAX as f64)
}

#[cfg(test)]
mod tests {
    use super::SeriesGenerator;

    #[test]
    fn seeded_generators_are_deterministic() {
        let mut a = SeriesGenerator::new(42, 100.0, 0.5);
        let mut b = SeriesGenerator::new(42, 100.0, 0.5);

        assert_eq!(a.prices(50), b.prices(50));
        assert_eq!(a.signals(50), b.signals(50));
    }

    #[test]
    fn prices_stay_positive() {
        let mut generator = SeriesGenerator::new(3, 1.0, 5.0);

        assert!(generator.prices(1_000).iter().all(|&price| price > 0.0));
    }

    #[test]
    fn signal_stream_covers_every_state() {
        let mut generator = SeriesGenerator::new(11, 100.0, 1.0);
        let signals = generator.signals(1_000);

        assert!(signals.iter().any(|s| s.value() == -1));
        assert!(signals.iter().any(|s| s.value() == 0));
        assert!(signals.iter().any(|s| s.value() == 1));
    }

    #[test]
    #[should_panic(expected = "start_price must be finite and positive")]
    fn rejects_invalid_start_price() {
        let _ = SeriesGenerator::new(1, f64::NAN, 1.0);
    }

    #[test]
    #[should_panic(expected = "max_step must be finite and non-negative")]
    fn rejects_invalid_max_step() {
        let _ = SeriesGenerator::new(1, 100.0, -1.0);
    }
}
