//! Playback clock and frame-loop scheduling.
//!
//! The clock is a two-state machine (`Stopped` / `Playing`). While playing,
//! each host frame recomputes `current_time` from the wall clock, so dropped
//! frames never cause drift. The host's per-frame callback is abstracted as
//! a [`FrameScheduler`]; [`FrameLoop`] owns the single pending frame handle
//! and cancels it on pause, on finish and on drop.

use std::cell::RefCell;
use std::rc::Rc;

// ─── Clock ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockState {
    Stopped,
    /// `wall_clock_start` is the wall time (ms) at which the playhead was 0.
    Playing { wall_clock_start: f64 },
}

/// Outcome of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Playhead moved to the given time; another frame is needed.
    Advanced(f64),
    /// Playhead reached the end of the slide and playback stopped.
    Finished(f64),
    /// Clock was not playing, or the frame was not pending.
    Idle,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    state: ClockState,
    current_time: f64,
    restart_threshold: f64,
}

impl PlaybackClock {
    pub fn new(restart_threshold: f64) -> Self {
        Self {
            state: ClockState::Stopped,
            current_time: 0.0,
            restart_threshold,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, ClockState::Playing { .. })
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Start playing at wall time `now`. A playhead within the restart
    /// threshold of the end rewinds to 0 first.
    pub fn play(&mut self, now: f64, duration: f64) {
        if self.current_time >= duration - self.restart_threshold {
            self.current_time = 0.0;
        }
        self.state = ClockState::Playing {
            wall_clock_start: now - self.current_time,
        };
        log::debug!("playback: play from {} ms", self.current_time);
    }

    pub fn tick(&mut self, now: f64, duration: f64) -> Tick {
        let ClockState::Playing { wall_clock_start } = self.state else {
            return Tick::Idle;
        };
        let elapsed = now - wall_clock_start;
        if elapsed >= duration {
            self.current_time = duration.max(0.0);
            self.state = ClockState::Stopped;
            log::debug!("playback: finished at {} ms", self.current_time);
            return Tick::Finished(self.current_time);
        }
        self.current_time = elapsed.max(0.0);
        log::trace!("playback: tick {} ms", self.current_time);
        Tick::Advanced(self.current_time)
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            log::debug!("playback: pause at {} ms", self.current_time);
        }
        self.state = ClockState::Stopped;
    }

    /// Stop and move the playhead to `t`, clamped to `[0, duration]`.
    pub fn set_current_time(&mut self, t: f64, duration: f64) {
        self.state = ClockState::Stopped;
        self.current_time = clamp_time(t, duration);
    }

    pub fn reset(&mut self) {
        self.set_current_time(0.0, 0.0);
    }
}

fn clamp_time(t: f64, duration: f64) -> f64 {
    if t.is_nan() {
        return 0.0;
    }
    t.min(duration.max(0.0)).max(0.0)
}

// ─── Frame scheduling ────────────────────────────────────────────────────

/// Handle of a requested host frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

/// The host's per-frame callback (`requestAnimationFrame` in a browser).
pub trait FrameScheduler {
    /// Ask the host for one callback on its next frame. `None` when the
    /// host could not schedule one.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Withdraw a request made by [`request_frame`](Self::request_frame).
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Owns at most one pending frame request.
///
/// Dropping the loop cancels the pending request, so a frame can never
/// fire into a torn-down editor.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
        }
    }

    /// Request a frame unless one is already pending. Returns whether a
    /// frame is pending afterwards.
    pub fn start(&mut self) -> bool {
        if self.pending.is_none() {
            self.pending = self.scheduler.request_frame();
        }
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Consume the pending request when the host fires `handle`.
    /// Returns `false` for a frame this loop no longer waits for.
    pub fn take_fired(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Headless scheduler: records requests so a test or native host can fire
/// them explicitly. Clones share one queue.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<ManualQueue>>,
}

#[derive(Debug, Default)]
struct ManualQueue {
    next: u32,
    pending: Vec<FrameHandle>,
    requested: usize,
    cancelled: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    /// Total requests made so far.
    pub fn requested(&self) -> usize {
        self.queue.borrow().requested
    }

    /// Total requests withdrawn so far.
    pub fn cancelled(&self) -> usize {
        self.queue.borrow().cancelled
    }

    /// Remove and return the oldest pending request, as the host would
    /// when it runs the callback.
    pub fn fire(&self) -> Option<FrameHandle> {
        let mut queue = self.queue.borrow_mut();
        if queue.pending.is_empty() {
            None
        } else {
            Some(queue.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut queue = self.queue.borrow_mut();
        queue.next += 1;
        queue.requested += 1;
        let handle = FrameHandle(queue.next);
        queue.pending.push(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut queue = self.queue.borrow_mut();
        if let Some(pos) = queue.pending.iter().position(|h| *h == handle) {
            queue.pending.remove(pos);
            queue.cancelled += 1;
        }
    }
}

// ─── Transport ───────────────────────────────────────────────────────────

/// The clock coupled to its frame loop: every transition out of `Playing`
/// cancels the pending frame before returning.
#[derive(Debug)]
pub struct Transport<S: FrameScheduler> {
    clock: PlaybackClock,
    frames: FrameLoop<S>,
}

impl<S: FrameScheduler> Transport<S> {
    pub fn new(scheduler: S, restart_threshold: f64) -> Self {
        Self {
            clock: PlaybackClock::new(restart_threshold),
            frames: FrameLoop::new(scheduler),
        }
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        self.frames.scheduler()
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.clock.current_time()
    }

    pub fn is_frame_scheduled(&self) -> bool {
        self.frames.is_scheduled()
    }

    pub fn play(&mut self, now: f64, duration: f64) {
        self.clock.play(now, duration);
        self.schedule();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
        self.frames.cancel();
    }

    /// Pause when playing, play otherwise.
    pub fn toggle(&mut self, now: f64, duration: f64) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play(now, duration);
        }
    }

    /// Play the slide from time 0.
    pub fn preview(&mut self, now: f64, duration: f64) {
        self.frames.cancel();
        self.clock.reset();
        self.play(now, duration);
    }

    pub fn set_current_time(&mut self, t: f64, duration: f64) {
        self.frames.cancel();
        self.clock.set_current_time(t, duration);
    }

    pub fn reset(&mut self) {
        self.frames.cancel();
        self.clock.reset();
    }

    /// Host frame callback for `handle`. Advances the clock and requests
    /// the next frame while still playing. A handle other than the pending
    /// one is ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now: f64, duration: f64) -> Tick {
        if !self.frames.take_fired(handle) {
            return Tick::Idle;
        }
        let tick = self.clock.tick(now, duration);
        if let Tick::Advanced(_) = tick {
            self.schedule();
        }
        tick
    }

    /// Request the next frame. Without one the clock could never advance,
    /// so a refused request stops playback.
    fn schedule(&mut self) {
        if !self.frames.start() {
            log::warn!("playback: host refused a frame, pausing");
            self.clock.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_clamps_at_end() {
        let mut clock = PlaybackClock::new(100.0);
        clock.play(1000.0, 5000.0);
        assert_eq!(clock.tick(3000.0, 5000.0), Tick::Advanced(2000.0));
        assert_eq!(clock.tick(7200.0, 5000.0), Tick::Finished(5000.0));
        assert!(!clock.is_playing());
        assert_eq!(clock.current_time(), 5000.0);
        assert_eq!(clock.tick(8000.0, 5000.0), Tick::Idle);
    }

    #[test]
    fn play_near_end_restarts() {
        let mut clock = PlaybackClock::new(100.0);
        clock.set_current_time(4950.0, 5000.0);
        clock.play(0.0, 5000.0);
        assert_eq!(clock.current_time(), 0.0);

        let mut clock = PlaybackClock::new(100.0);
        clock.set_current_time(2000.0, 5000.0);
        clock.play(10_000.0, 5000.0);
        assert_eq!(clock.tick(10_500.0, 5000.0), Tick::Advanced(2500.0));
    }

    #[test]
    fn scrub_clamps_and_stops() {
        let mut clock = PlaybackClock::new(100.0);
        clock.play(0.0, 5000.0);
        clock.set_current_time(9000.0, 5000.0);
        assert!(!clock.is_playing());
        assert_eq!(clock.current_time(), 5000.0);
        clock.set_current_time(-3.0, 5000.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.set_current_time(f64::NAN, 5000.0);
        assert_eq!(clock.current_time(), 0.0);
    }

    #[test]
    fn frames_survive_drops_without_drift() {
        let mut clock = PlaybackClock::new(100.0);
        clock.play(100.0, 5000.0);
        // A single late frame lands on the true elapsed time.
        assert_eq!(clock.tick(1700.0, 5000.0), Tick::Advanced(1600.0));
    }

    #[test]
    fn frame_loop_keeps_one_pending_request() {
        let scheduler = ManualScheduler::new();
        let mut frames = FrameLoop::new(scheduler.clone());
        frames.start();
        frames.start();
        assert_eq!(scheduler.pending_count(), 1);
        frames.cancel();
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn dropping_frame_loop_cancels_pending() {
        let scheduler = ManualScheduler::new();
        {
            let mut frames = FrameLoop::new(scheduler.clone());
            frames.start();
            assert_eq!(scheduler.pending_count(), 1);
        }
        assert_eq!(scheduler.pending_count(), 0);
        assert_eq!(scheduler.cancelled(), 1);
    }

    #[test]
    fn transport_pause_cancels_frame() {
        let scheduler = ManualScheduler::new();
        let mut transport = Transport::new(scheduler.clone(), 100.0);
        transport.play(0.0, 5000.0);
        assert!(transport.is_frame_scheduled());
        transport.pause();
        assert!(!transport.is_frame_scheduled());
        assert_eq!(scheduler.pending_count(), 0);
        // A stale callback after pause does nothing.
        assert_eq!(transport.on_frame(FrameHandle(1), 400.0, 5000.0), Tick::Idle);
        assert_eq!(transport.current_time(), 0.0);
    }

    #[test]
    fn transport_reschedules_until_finished() {
        let scheduler = ManualScheduler::new();
        let mut transport = Transport::new(scheduler.clone(), 100.0);
        transport.play(0.0, 1000.0);

        let handle = scheduler.fire().unwrap();
        assert_eq!(transport.on_frame(handle, 500.0, 1000.0), Tick::Advanced(500.0));
        assert_eq!(scheduler.pending_count(), 1);

        let handle = scheduler.fire().unwrap();
        assert_eq!(transport.on_frame(handle, 1200.0, 1000.0), Tick::Finished(1000.0));
        assert_eq!(scheduler.pending_count(), 0);
        assert!(!transport.is_playing());
    }

    #[test]
    fn late_callback_for_cancelled_frame_is_ignored() {
        let scheduler = ManualScheduler::new();
        let mut transport = Transport::new(scheduler.clone(), 100.0);
        transport.play(0.0, 5000.0);
        let stale = FrameHandle(1);
        transport.pause();
        transport.play(1000.0, 5000.0);

        // The cancelled request's callback was already queued by the host.
        assert_eq!(transport.on_frame(stale, 1100.0, 5000.0), Tick::Idle);
        assert!(transport.is_frame_scheduled());

        let current = scheduler.fire().unwrap();
        assert_ne!(current, stale);
        assert_eq!(transport.on_frame(current, 1300.0, 5000.0), Tick::Advanced(300.0));
    }

    /// A host that never grants a frame.
    struct RefusingScheduler;

    impl FrameScheduler for RefusingScheduler {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            None
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {}
    }

    #[test]
    fn refused_frame_stops_playback() {
        let mut transport = Transport::new(RefusingScheduler, 100.0);
        transport.play(0.0, 5000.0);
        assert!(!transport.is_playing());
        assert!(!transport.is_frame_scheduled());
        assert_eq!(transport.current_time(), 0.0);
    }
}
