use std::fmt;

/// Where a [`PlaybackController`](crate::PlaybackController) is in its
/// lifecycle.
///
/// ```text
/// Idle --load--> Ready --play--> Playing --pause--> Paused
///                                   |    <--play--     |
///                                   +--last batch--> Finished --play--> Playing (from 0)
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// No trace loaded.
    #[default]
    Idle,
    /// A trace is loaded and nothing has been revealed yet.
    Ready,
    /// Revealing automatically on each tick.
    Playing,
    /// Stopped part way; resumes from the same position.
    Paused,
    /// Every entry revealed and the final path visible.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        })
    }
}

/// A snapshot of playback, published to subscribers after every change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackState {
    pub phase: Phase,
    /// Length of the revealed prefix of the visited order.
    pub revealed: usize,
    /// Length of the whole visited order.
    pub total: usize,
    /// Delay between automatic reveals.
    pub speed_ms: u64,
}

impl PlaybackState {
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// The final path is only shown once playback has finished.
    #[inline]
    pub fn shows_path(&self) -> bool {
        self.is_finished()
    }

    /// Revealed fraction in `[0, 1]`. An empty trace counts as complete.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.revealed as f64 / self.total as f64
        }
    }
}
