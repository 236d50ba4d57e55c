/// How many entries each tick reveals, by playback speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BatchPolicy {
    /// Batch at speed 0.
    pub instant: usize,
    /// Speeds up to and including this many milliseconds count as fast.
    pub fast_threshold_ms: u64,
    /// Batch at fast speeds.
    pub fast: usize,
    /// Batch at every other speed.
    pub normal: usize,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            instant: 100,
            fast_threshold_ms: 5,
            fast: 10,
            normal: 1,
        }
    }
}

impl BatchPolicy {
    /// Entries to reveal per tick at `speed_ms`. Always at least one.
    pub fn batch_size(&self, speed_ms: u64) -> usize {
        let n = if speed_ms == 0 {
            self.instant
        } else if speed_ms <= self.fast_threshold_ms {
            self.fast
        } else {
            self.normal
        };
        n.max(1)
    }
}

/// Configuration for a [`PlaybackController`](crate::PlaybackController).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Delay between automatic reveals.
    pub speed_ms: u64,
    pub batch: BatchPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_ms: 50,
            batch: BatchPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_batches() {
        let b = BatchPolicy::default();
        assert_eq!(b.batch_size(0), 100);
        assert_eq!(b.batch_size(1), 10);
        assert_eq!(b.batch_size(5), 10);
        assert_eq!(b.batch_size(6), 1);
        assert_eq!(b.batch_size(500), 1);
    }

    #[test]
    fn zero_batch_is_clamped() {
        let b = BatchPolicy {
            instant: 0,
            fast: 0,
            normal: 0,
            ..BatchPolicy::default()
        };
        assert_eq!(b.batch_size(0), 1);
        assert_eq!(b.batch_size(3), 1);
        assert_eq!(b.batch_size(50), 1);
    }
}
