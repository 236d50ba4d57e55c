//! Timer sources that drive playback.
//!
//! A [`Scheduler`] arranges for a [`Tick`] to arrive after a delay and can
//! cancel it again. Delivery is the owner's business: [`ManualScheduler`]
//! hands ticks back from [`advance`](ManualScheduler::advance), while
//! [`ThreadScheduler`] sends them over a channel from one timer thread.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// Identifies one scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[inline]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A fired timer: the handle it was scheduled under and the epoch the
/// scheduling side stamped on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub handle: TimerHandle,
    pub epoch: u64,
}

/// Something that can deliver a [`Tick`] after a delay.
pub trait Scheduler {
    /// Schedule a tick stamped with `epoch`, due after `delay`.
    fn schedule(&mut self, epoch: u64, delay: Duration) -> TimerHandle;

    /// Cancel a scheduled tick. Unknown or already delivered handles are
    /// ignored. A tick may still be delivered if it was already in flight.
    fn cancel(&mut self, handle: TimerHandle);
}

// ---------------------------------------------------------------------------
// ManualScheduler
// ---------------------------------------------------------------------------

/// A pending tick ordered by `(due, seq)`. `T` is the clock: simulated
/// [`Duration`] for [`ManualScheduler`], [`Instant`] for the timer thread.
#[derive(Debug)]
struct Timer<T> {
    due: T,
    /// Breaks ties between timers due at the same instant (FIFO).
    seq: u64,
    tick: Tick,
}

impl<T: Ord> PartialEq for Timer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T: Ord> Eq for Timer<T> {}

impl<T: Ord> PartialOrd for Timer<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Timer<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.due.cmp(&other.due).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A scheduler over a simulated clock that only moves when asked to.
///
/// Timers are kept in a min-heap keyed by `(due, insertion order)`, so
/// ticks due at the same instant come out in the order they were
/// scheduled.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    heap: BinaryHeap<Reverse<Timer<Duration>>>,
    seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers not yet delivered.
    #[inline]
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// When the earliest pending timer is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(t)| t.due)
    }

    /// Move the clock forward by `dt` and return every tick now due, in
    /// due order.
    pub fn advance(&mut self, dt: Duration) -> Vec<Tick> {
        self.now += dt;
        self.drain_due()
    }

    /// Jump the clock to the earliest pending timer and return the ticks due
    /// at that instant. Returns an empty vector when nothing is pending.
    pub fn next_turn(&mut self) -> Vec<Tick> {
        match self.next_due() {
            Some(due) => {
                self.now = self.now.max(due);
                self.drain_due()
            }
            None => Vec::new(),
        }
    }

    fn drain_due(&mut self) -> Vec<Tick> {
        let mut out = Vec::new();
        while let Some(Reverse(t)) = self.heap.peek() {
            if t.due > self.now {
                break;
            }
            if let Some(Reverse(t)) = self.heap.pop() {
                out.push(t.tick);
            }
        }
        out
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, epoch: u64, delay: Duration) -> TimerHandle {
        let seq = self.seq;
        self.seq += 1;
        let handle = TimerHandle(seq);
        self.heap.push(Reverse(Timer {
            due: self.now + delay,
            seq,
            tick: Tick { handle, epoch },
        }));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.heap.retain(|Reverse(t)| t.tick.handle != handle);
    }
}

// ---------------------------------------------------------------------------
// ThreadScheduler
// ---------------------------------------------------------------------------

/// Stand-in due time for delays too large to represent as an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

enum Command {
    Schedule(Timer<Instant>),
    Cancel(TimerHandle),
}

/// Body of the timer thread. Sleeps until the earliest timer is due or a
/// command arrives, and exits once either channel is disconnected.
fn run_timers(cmds: Receiver<Command>, ticks: Sender<Tick>) {
    let mut heap: BinaryHeap<Reverse<Timer<Instant>>> = BinaryHeap::new();
    loop {
        let now = Instant::now();
        while heap.peek().is_some_and(|Reverse(t)| t.due <= now) {
            let Some(Reverse(t)) = heap.pop() else { break };
            if ticks.send(t.tick).is_err() {
                return;
            }
        }
        let cmd = match heap.peek() {
            Some(Reverse(t)) => match cmds.recv_timeout(t.due.saturating_duration_since(now)) {
                Ok(cmd) => cmd,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            },
            None => match cmds.recv() {
                Ok(cmd) => cmd,
                Err(_) => return,
            },
        };
        match cmd {
            Command::Schedule(timer) => heap.push(Reverse(timer)),
            Command::Cancel(handle) => heap.retain(|Reverse(t)| t.tick.handle != handle),
        }
    }
}

/// A real-time scheduler. A single timer thread keeps every pending timer
/// in a min-heap and sends each tick over a channel when it falls due;
/// cancelled timers are dropped from the heap without waking anyone.
///
/// Receive ticks with [`recv_timeout`](Self::recv_timeout) or
/// [`try_recv`](Self::try_recv) and hand them to the playback controller.
/// Dropping the scheduler stops the timer thread.
pub struct ThreadScheduler {
    cmds: Sender<Command>,
    rx: Receiver<Tick>,
    live: HashSet<TimerHandle>,
    next_id: u64,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        let (cmds, cmd_rx) = mpsc::channel();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || run_timers(cmd_rx, tx));
        Self {
            cmds,
            rx,
            live: HashSet::new(),
            next_id: 0,
        }
    }

    /// Number of timers scheduled and neither cancelled nor received.
    pub fn pending(&self) -> usize {
        self.live.len()
    }

    /// Wait up to `timeout` for the next tick. Ticks of timers cancelled
    /// while already in flight are discarded.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<Tick> {
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let wait = deadline.map_or(timeout, |d| d.saturating_duration_since(Instant::now()));
            let tick = self.rx.recv_timeout(wait).ok()?;
            if self.live.remove(&tick.handle) {
                return Some(tick);
            }
        }
    }

    /// Take a tick if one has already arrived.
    pub fn try_recv(&mut self) -> Option<Tick> {
        loop {
            let tick = self.rx.try_recv().ok()?;
            if self.live.remove(&tick.handle) {
                return Some(tick);
            }
        }
    }

    fn send(&self, cmd: Command) {
        if self.cmds.send(cmd).is_err() {
            log::warn!("scheduler: timer thread has stopped");
        }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&mut self, epoch: u64, delay: Duration) -> TimerHandle {
        let seq = self.next_id;
        self.next_id += 1;
        let handle = TimerHandle(seq);
        self.live.insert(handle);
        let now = Instant::now();
        self.send(Command::Schedule(Timer {
            due: now.checked_add(delay).unwrap_or(now + FAR_FUTURE),
            seq,
            tick: Tick { handle, epoch },
        }));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.live.remove(&handle) {
            self.send(Command::Cancel(handle));
        }
    }
}
