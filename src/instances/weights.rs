//! # Soft Weight Bookkeeping

/// Running totals over soft clause weights plus the hard weight sentinel.
///
/// The tracker is not fed automatically when soft clauses are stored; callers
/// that want a soft clause to count towards the totals call both
/// [`WeightTracker::update_sum_weights`] and
/// [`WeightTracker::set_maximum_weight`] with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightTracker {
    sum: u64,
    max: u64,
    hard: u64,
}

impl Default for WeightTracker {
    fn default() -> Self {
        Self {
            sum: 0,
            max: 0,
            hard: u64::MAX,
        }
    }
}

impl WeightTracker {
    /// Creates a tracker with zero totals and `u64::MAX` as hard weight
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a weight to the sum unless it is the hard weight sentinel
    pub fn update_sum_weights(&mut self, weight: u64) {
        if weight != self.hard {
            self.sum = self.sum.saturating_add(weight);
        }
    }

    /// Raises the maximum to `weight` if it is larger and not the hard weight
    pub fn set_maximum_weight(&mut self, weight: u64) {
        if weight != self.hard && weight > self.max {
            self.max = weight;
        }
    }

    /// Sets the weight that marks clauses as hard
    pub fn set_hard_weight(&mut self, weight: u64) {
        self.hard = weight;
    }

    /// Gets the weight that marks clauses as hard
    #[inline]
    pub fn hard_weight(&self) -> u64 {
        self.hard
    }

    /// Gets the sum of all tracked soft weights
    #[inline]
    pub fn sum_weights(&self) -> u64 {
        self.sum
    }

    /// Gets the maximum tracked soft weight
    #[inline]
    pub fn max_weight(&self) -> u64 {
        self.max
    }

    pub(crate) fn restore(sum: u64, max: u64, hard: u64) -> Self {
        Self { sum, max, hard }
    }
}

#[cfg(test)]
mod tests {
    use super::WeightTracker;

    #[test]
    fn accumulates() {
        let mut wt = WeightTracker::new();
        for w in [3, 5, 2] {
            wt.update_sum_weights(w);
            wt.set_maximum_weight(w);
        }
        assert_eq!(wt.sum_weights(), 10);
        assert_eq!(wt.max_weight(), 5);
    }

    #[test]
    fn ignores_hard_weight() {
        let mut wt = WeightTracker::new();
        wt.set_hard_weight(100);
        assert_eq!(wt.hard_weight(), 100);
        wt.update_sum_weights(100);
        wt.set_maximum_weight(100);
        assert_eq!(wt.sum_weights(), 0);
        assert_eq!(wt.max_weight(), 0);
        wt.update_sum_weights(7);
        wt.set_maximum_weight(7);
        assert_eq!(wt.sum_weights(), 7);
        assert_eq!(wt.max_weight(), 7);
    }

    #[test]
    fn maximum_only_grows() {
        let mut wt = WeightTracker::new();
        wt.set_maximum_weight(9);
        wt.set_maximum_weight(4);
        assert_eq!(wt.max_weight(), 9);
    }

    #[test]
    fn sum_saturates() {
        let mut wt = WeightTracker::new();
        wt.set_hard_weight(0);
        wt.update_sum_weights(u64::MAX - 1);
        wt.update_sum_weights(10);
        assert_eq!(wt.sum_weights(), u64::MAX);
    }
}
