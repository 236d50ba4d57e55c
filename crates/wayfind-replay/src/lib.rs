//! Timed playback of search traces.
//!
//! [`PlaybackController`] reveals the finalize order of a
//! [`wayfind_paths::SearchTrace`] a batch at a time, driven by an injected
//! [`Scheduler`]. It supports play, pause, single stepping and replay, and
//! only shows the final path once every entry has been revealed.
//!
//! Two schedulers are provided: [`ManualScheduler`] advances a simulated
//! clock on demand (for tests and frame-driven loops) and
//! [`ThreadScheduler`] delivers ticks in real time over a channel.

mod config;
mod controller;
mod scheduler;
mod state;

pub use config::{BatchPolicy, PlaybackConfig};
pub use controller::{PlaybackAction, PlaybackController};
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler, Tick, TimerHandle};
pub use state::{Phase, PlaybackState};
