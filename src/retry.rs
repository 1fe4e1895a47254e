/// Default number of restarts after consecutive NACKs.
pub const MAX_RETRIES: u32 = 16;

/// Bounds how many times a NACKed transaction is restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    ceiling: u32,
}

impl RetryPolicy {
    pub const fn new(ceiling: u32) -> Self {
        Self { ceiling }
    }

    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES)
    }
}

/// What to do after a NACK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    Retry,
    GiveUp,
}

/// Consecutive NACK count of the transaction in flight.
#[derive(Debug, Default)]
pub(crate) struct RetryCounter {
    count: u32,
}

impl RetryCounter {
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn on_nack(&mut self, policy: &RetryPolicy) -> Verdict {
        if self.count >= policy.ceiling {
            Verdict::GiveUp
        } else {
            self.count += 1;
            Verdict::Retry
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gives_up_after_ceiling_plus_one_nacks() {
        let policy = RetryPolicy::new(3);
        let mut counter = RetryCounter::new();

        for expected in 1..=3 {
            assert_eq!(counter.on_nack(&policy), Verdict::Retry);
            assert_eq!(counter.count(), expected);
        }
        assert_eq!(counter.on_nack(&policy), Verdict::GiveUp);
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn zero_ceiling_never_retries() {
        let mut counter = RetryCounter::new();
        assert_eq!(counter.on_nack(&RetryPolicy::new(0)), Verdict::GiveUp);
    }

    #[test]
    fn reset_restores_the_budget() {
        let policy = RetryPolicy::new(1);
        let mut counter = RetryCounter::new();

        assert_eq!(counter.on_nack(&policy), Verdict::Retry);
        counter.reset();
        assert_eq!(counter.on_nack(&policy), Verdict::Retry);
        assert_eq!(counter.on_nack(&policy), Verdict::GiveUp);
    }

    #[test]
    fn default_ceiling() {
        assert_eq!(RetryPolicy::default().ceiling(), MAX_RETRIES);
    }
}
