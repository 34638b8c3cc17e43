//! Cliff sensor debounce
//!
//! A single detection latches the filtered status immediately. The status
//! only clears after several consecutive clear readings, so one noisy
//! reading near an edge cannot release it.

/// Consecutive clear readings required to release the filtered status
pub const CLIFF_CLEAR_READINGS: u8 = 3;

/// Debounced cliff status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CliffFilter {
    /// Filtered status
    active: bool,
    /// Clear readings since the last detection
    misses: u8,
}

impl CliffFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw reading, returning the filtered status
    pub fn update(&mut self, detected: bool) -> bool {
        if detected {
            self.active = true;
            self.misses = 0;
        } else {
            self.misses = self.misses.saturating_add(1);
            if self.misses >= CLIFF_CLEAR_READINGS {
                self.active = false;
            }
        }
        self.active
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Clear readings since the last detection
    pub fn misses(&self) -> u8 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(readings: &[bool]) -> Vec<bool> {
        let mut filter = CliffFilter::new();
        readings.iter().map(|&r| filter.update(r)).collect()
    }

    #[test]
    fn test_starts_clear() {
        let filter = CliffFilter::new();
        assert!(!filter.is_active());
        assert_eq!(filter.misses(), 0);
    }

    #[test]
    fn test_detection_rearms_before_release() {
        assert_eq!(
            run(&[true, false, false, true]),
            vec![true, true, true, true]
        );
    }

    #[test]
    fn test_releases_after_three_misses() {
        assert_eq!(
            run(&[true, false, false, false]),
            vec![true, true, true, false]
        );
    }

    #[test]
    fn test_detection_resets_miss_counter() {
        let mut filter = CliffFilter::new();
        filter.update(true);
        filter.update(false);
        filter.update(false);
        assert_eq!(filter.misses(), 2);
        filter.update(true);
        assert_eq!(filter.misses(), 0);
        assert!(filter.is_active());
    }

    #[test]
    fn test_miss_counter_saturates() {
        let mut filter = CliffFilter::new();
        for _ in 0..300 {
            assert!(!filter.update(false));
        }
        assert_eq!(filter.misses(), u8::MAX);
    }

    proptest! {
        #[test]
        fn prop_active_until_three_clear_readings(
            readings in proptest::collection::vec(any::<bool>(), 0..64),
        ) {
            let mut filter = CliffFilter::new();
            for (i, &reading) in readings.iter().enumerate() {
                let status = filter.update(reading);
                let seen = &readings[..=i];
                let expected = match seen.iter().rposition(|&r| r) {
                    Some(last) => i - last < CLIFF_CLEAR_READINGS as usize,
                    None => false,
                };
                prop_assert_eq!(status, expected);
            }
        }
    }
}
