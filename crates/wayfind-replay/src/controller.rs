//! The playback state machine.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use wayfind_core::NodeId;
use wayfind_paths::SearchTrace;

use crate::config::{BatchPolicy, PlaybackConfig};
use crate::scheduler::{ManualScheduler, Scheduler, Tick, TimerHandle};
use crate::state::{Phase, PlaybackState};

// ---------------------------------------------------------------------------
// PlaybackAction
// ---------------------------------------------------------------------------

/// User-level commands, for front ends that map input events to playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Pause,
    /// Pause when playing, play otherwise.
    TogglePlay,
    Step,
    Reset,
    SetSpeed(u64),
}

// ---------------------------------------------------------------------------
// PlaybackController
// ---------------------------------------------------------------------------

/// Reveals a [`SearchTrace`] over time.
///
/// At most one timer is pending at any moment. Every operation that
/// invalidates it (load, pause, step, reset) cancels it and bumps the
/// epoch, and [`on_tick`](Self::on_tick) drops any tick whose epoch or
/// handle does not match, so a tick already in flight can never advance a
/// newer trace.
pub struct PlaybackController<S: Scheduler> {
    scheduler: S,
    trace: Option<SearchTrace>,
    phase: Phase,
    revealed: usize,
    speed_ms: u64,
    batch: BatchPolicy,
    epoch: u64,
    pending: Option<TimerHandle>,
    subscribers: Vec<Sender<PlaybackState>>,
}

impl<S: Scheduler> PlaybackController<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, PlaybackConfig::default())
    }

    pub fn with_config(scheduler: S, cfg: PlaybackConfig) -> Self {
        Self {
            scheduler,
            trace: None,
            phase: Phase::Idle,
            revealed: 0,
            speed_ms: cfg.speed_ms,
            batch: cfg.batch,
            epoch: 0,
            pending: None,
            subscribers: Vec::new(),
        }
    }

    /// Replace the current trace, discarding all progress. An empty trace
    /// has nothing to reveal and is finished as soon as it is loaded.
    pub fn load(&mut self, trace: SearchTrace) {
        self.cancel_pending();
        log::debug!(
            "playback: loaded {} trace with {} entries",
            trace.strategy(),
            trace.len()
        );
        self.phase = if trace.is_empty() {
            Phase::Finished
        } else {
            Phase::Ready
        };
        self.trace = Some(trace);
        self.revealed = 0;
        self.notify();
    }

    /// Start or resume automatic reveal. From [`Phase::Finished`] this
    /// replays from the beginning. Does nothing without a trace or while
    /// already playing.
    pub fn play(&mut self) {
        match self.phase {
            Phase::Idle => {
                log::debug!("playback: play with nothing loaded");
                return;
            }
            Phase::Playing => return,
            Phase::Finished => self.revealed = 0,
            Phase::Ready | Phase::Paused => {}
        }
        self.phase = Phase::Playing;
        if self.revealed >= self.total() {
            self.finish();
        } else {
            self.schedule_next();
        }
        self.notify();
    }

    /// Stop automatic reveal, keeping the current position.
    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.cancel_pending();
        self.phase = Phase::Paused;
        self.notify();
    }

    pub fn toggle(&mut self) {
        if self.phase == Phase::Playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and reveal exactly one more entry. Revealing the last entry
    /// finishes playback. Does nothing when idle or finished.
    pub fn step(&mut self) {
        if matches!(self.phase, Phase::Idle | Phase::Finished) {
            return;
        }
        self.cancel_pending();
        let total = self.total();
        if self.revealed < total {
            self.revealed += 1;
        }
        if self.revealed >= total {
            self.finish();
        } else {
            self.phase = Phase::Paused;
        }
        self.notify();
    }

    /// Drop the trace and return to [`Phase::Idle`].
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.trace = None;
        self.revealed = 0;
        self.phase = Phase::Idle;
        self.notify();
    }

    /// Change the delay between reveals. A timer already pending keeps its
    /// old delay; the next one uses the new speed.
    pub fn set_speed(&mut self, ms: u64) {
        if self.speed_ms == ms {
            return;
        }
        self.speed_ms = ms;
        self.notify();
    }

    pub fn apply(&mut self, action: PlaybackAction) {
        match action {
            PlaybackAction::Play => self.play(),
            PlaybackAction::Pause => self.pause(),
            PlaybackAction::TogglePlay => self.toggle(),
            PlaybackAction::Step => self.step(),
            PlaybackAction::Reset => self.reset(),
            PlaybackAction::SetSpeed(ms) => self.set_speed(ms),
        }
    }

    /// Handle a tick from the scheduler. Returns whether it was accepted;
    /// stale ticks are ignored.
    pub fn on_tick(&mut self, tick: Tick) -> bool {
        if self.phase != Phase::Playing || tick.epoch != self.epoch || self.pending != Some(tick.handle) {
            log::trace!("playback: ignoring stale tick {tick:?} (epoch {})", self.epoch);
            return false;
        }
        self.pending = None;
        let total = self.total();
        let batch = self.batch.batch_size(self.speed_ms);
        self.revealed = (self.revealed + batch).min(total);
        if self.revealed >= total {
            self.finish();
        } else {
            self.schedule_next();
        }
        self.notify();
        true
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            phase: self.phase,
            revealed: self.revealed,
            total: self.total(),
            speed_ms: self.speed_ms,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn trace(&self) -> Option<&SearchTrace> {
        self.trace.as_ref()
    }

    /// The revealed prefix of the visited order.
    pub fn revealed(&self) -> &[NodeId] {
        match &self.trace {
            Some(t) => &t.visited_order()[..self.revealed],
            None => &[],
        }
    }

    /// The final path, available only once playback has finished.
    pub fn final_path(&self) -> Option<&[NodeId]> {
        match (&self.trace, self.phase) {
            (Some(t), Phase::Finished) => Some(t.path()),
            _ => None,
        }
    }

    /// Receive a [`PlaybackState`] after every change. Dropped receivers
    /// are forgotten on the next change.
    pub fn subscribe(&mut self) -> Receiver<PlaybackState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn total(&self) -> usize {
        self.trace.as_ref().map_or(0, SearchTrace::len)
    }

    fn schedule_next(&mut self) {
        let handle = self
            .scheduler
            .schedule(self.epoch, Duration::from_millis(self.speed_ms));
        self.pending = Some(handle);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.epoch = self.epoch.wrapping_add(1);
    }

    fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.pending = None;
        log::debug!("playback: finished after {} entries", self.revealed);
    }

    fn notify(&mut self) {
        let state = self.state();
        self.subscribers.retain(|tx| tx.send(state).is_ok());
    }
}

impl PlaybackController<ManualScheduler> {
    /// Advance the simulated clock by `dt`, applying every tick that falls
    /// due on the way, including ticks scheduled by earlier ones. Returns
    /// the number of ticks accepted.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let deadline = self.scheduler.now() + dt;
        let mut accepted = 0;
        while self.scheduler.next_due().is_some_and(|due| due <= deadline) {
            for tick in self.scheduler.next_turn() {
                accepted += usize::from(self.on_tick(tick));
            }
        }
        let rest = deadline.saturating_sub(self.scheduler.now());
        for tick in self.scheduler.advance(rest) {
            accepted += usize::from(self.on_tick(tick));
        }
        accepted
    }

    /// Deliver scheduler turns until playback finishes. Returns the number
    /// of turns taken, or `None` if playback stopped for another reason or
    /// did not finish within `max_turns`.
    pub fn run_until_finished(&mut self, max_turns: usize) -> Option<usize> {
        let mut turns = 0;
        while self.phase == Phase::Playing {
            if turns == max_turns {
                return None;
            }
            let ticks = self.scheduler.next_turn();
            if ticks.is_empty() {
                return None;
            }
            turns += 1;
            for tick in ticks {
                self.on_tick(tick);
            }
        }
        (self.phase == Phase::Finished).then_some(turns)
    }
}
