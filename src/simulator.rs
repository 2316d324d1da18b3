use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::models::{OutcomeClass, SendableError};

const CLASSES: [OutcomeClass; 4] = [
    OutcomeClass::Success,
    OutcomeClass::Warning,
    OutcomeClass::Error,
    OutcomeClass::Critical,
];

/// Weighted-random classifier for synthetic requests.
pub struct OutcomeSimulator {
    classes: WeightedIndex<u32>,
    work_range: (Duration, Duration),
    rng: StdRng,
}

impl OutcomeSimulator {
    pub fn new(
        weights: &[u32],
        min_work: Duration,
        max_work: Duration,
        seed: Option<u64>,
    ) -> Result<Self, SendableError> {
        if weights.len() != CLASSES.len() {
            return Err(format!(
                "expected {} outcome weights, got {}",
                CLASSES.len(),
                weights.len()
            )
            .into());
        }
        let total: u32 = weights.iter().sum();
        if total != 100 {
            return Err(format!("outcome weights must sum to 100, got {total}").into());
        }
        if max_work < min_work {
            return Err("work duration range is inverted".into());
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            classes: WeightedIndex::new(weights.iter().copied())?,
            work_range: (min_work, max_work),
            rng,
        })
    }

    /// Draws an outcome class and a simulated processing duration.
    pub fn classify(&mut self) -> (OutcomeClass, Duration) {
        let outcome = CLASSES[self.classes.sample(&mut self.rng)];
        let secs = self
            .rng
            .random_range(self.work_range.0.as_secs_f64()..=self.work_range.1.as_secs_f64());
        (outcome, Duration::from_secs_f64(secs))
    }
}
