//! Playback scheduler: a timer-driven state machine over a frame store.
//!
//! The player is an explicit two-state machine (stopped/playing) with an
//! injected [`Clock`], so tests drive it with a [`VirtualClock`] instead
//! of wall time. There is never more than one pending deadline: every
//! transition overwrites or clears it (cancel-on-every-reschedule), which
//! is what keeps orphan timers impossible.
//!
//! Frame advancement chains deadlines: when a deadline fires, the next one
//! is based on the fired deadline rather than "now", so a virtual clock
//! advanced by exact frame durations steps frames exactly.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::store::FrameStore;

/// Time source for the scheduler.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time, used by the CLI play loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Deterministic clock for tests: time only moves when advanced.
#[derive(Debug, Clone)]
pub struct VirtualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        VirtualClock { base: Instant::now(), offset: Rc::new(Cell::new(Duration::ZERO)) }
    }

    /// Moves time forward. Clones share the same timeline.
    pub fn advance(&self, delta: Duration) {
        self.offset.set(self.offset.get() + delta);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

/// The playback state machine.
pub struct Player<C: Clock = SystemClock> {
    clock: C,
    state: PlaybackState,
    current_frame: usize,
    looping: bool,
    deadline: Option<Instant>,
    fingerprint: String,
}

impl<C: Clock> Player<C> {
    pub fn new(clock: C) -> Self {
        Player {
            clock,
            state: PlaybackState::Stopped,
            current_frame: 0,
            looping: true,
            deadline: None,
            fingerprint: String::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn toggle_looping(&mut self) {
        self.looping = !self.looping;
    }

    /// Play/pause. Starting on the last frame rewinds to frame 0 first.
    pub fn toggle(&mut self, store: &FrameStore) {
        match self.state {
            PlaybackState::Playing => self.stop(),
            PlaybackState::Stopped => {
                if store.is_empty() {
                    return;
                }
                if self.current_frame + 1 >= store.frame_count() {
                    self.current_frame = 0;
                }
                self.state = PlaybackState::Playing;
                self.schedule_from_now(store);
            }
        }
    }

    /// Fires the pending deadline if it has passed: advances one frame,
    /// wraps when looping, or stops holding the last frame. Returns true
    /// when the current frame changed. Overdue time is worked off one
    /// frame per call.
    pub fn poll(&mut self, store: &FrameStore) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        let Some(deadline) = self.deadline else {
            return false;
        };
        if self.clock.now() < deadline {
            return false;
        }
        let count = store.frame_count();
        if count == 0 {
            self.stop();
            return false;
        }

        if self.current_frame + 1 < count {
            self.current_frame += 1;
            self.chain_deadline(deadline, store);
            true
        } else if self.looping {
            self.current_frame = 0;
            self.chain_deadline(deadline, store);
            true
        } else {
            self.stop();
            false
        }
    }

    /// Step forward, clamped to the last frame.
    pub fn next_frame(&mut self, store: &FrameStore) {
        if self.current_frame + 1 < store.frame_count() {
            self.current_frame += 1;
            if self.is_playing() {
                self.schedule_from_now(store);
            }
        }
    }

    /// Step backward, clamped to frame 0.
    pub fn previous_frame(&mut self, store: &FrameStore) {
        if self.current_frame > 0 {
            self.current_frame -= 1;
            if self.is_playing() {
                self.schedule_from_now(store);
            }
        }
    }

    /// Absolute seek to frame 0; always stops playback first.
    pub fn go_to_start(&mut self) {
        self.stop();
        self.current_frame = 0;
    }

    /// Absolute seek to the last frame; always stops playback first.
    pub fn go_to_end(&mut self, store: &FrameStore) {
        self.stop();
        if !store.is_empty() {
            self.current_frame = store.frame_count() - 1;
        }
    }

    /// Reconciles the player with the store's content fingerprint.
    ///
    /// A changed fingerprint means a materially different animation: the
    /// current frame resets to 0 (rescheduling if mid-playback). Color
    /// edits leave the fingerprint alone and therefore never reset. With
    /// an unchanged fingerprint the current frame is only clamped into
    /// range.
    pub fn sync(&mut self, store: &FrameStore) {
        let fingerprint = store.fingerprint();
        if fingerprint != self.fingerprint {
            self.fingerprint = fingerprint;
            self.current_frame = 0;
            if self.is_playing() {
                if store.is_empty() {
                    self.stop();
                } else {
                    self.schedule_from_now(store);
                }
            }
        } else if self.current_frame >= store.frame_count() {
            self.current_frame = store.frame_count().saturating_sub(1);
        }
    }

    /// Time remaining until the pending deadline, if one exists.
    /// Zero when the deadline has already passed.
    pub fn time_until_deadline(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        Some(deadline.saturating_duration_since(self.clock.now()))
    }

    fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.deadline = None;
    }

    fn schedule_from_now(&mut self, store: &FrameStore) {
        let duration = store.frame_duration(self.current_frame);
        self.deadline = Some(self.clock.now() + Duration::from_millis(u64::from(duration)));
    }

    fn chain_deadline(&mut self, fired: Instant, store: &FrameStore) {
        let duration = store.frame_duration(self.current_frame);
        self.deadline = Some(fired + Duration::from_millis(u64::from(duration)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frame, Position};

    fn store_with_durations(durations: &[u32]) -> FrameStore {
        let frames = durations
            .iter()
            .enumerate()
            .map(|(i, &d)| Frame::new(format!("f{}", i), format!("frame {}", i), d))
            .collect();
        FrameStore::new(frames)
    }

    fn player(store: &FrameStore) -> (Player<VirtualClock>, VirtualClock) {
        let clock = VirtualClock::new();
        let mut player = Player::new(clock.clone());
        player.sync(store);
        (player, clock)
    }

    #[test]
    fn test_playback_run_stops_on_last_frame() {
        let store = store_with_durations(&[50, 50, 100]);
        let (mut player, clock) = player(&store);
        player.set_looping(false);
        player.toggle(&store);
        assert!(player.is_playing());
        assert_eq!(player.current_frame(), 0);

        clock.advance_ms(49);
        assert!(!player.poll(&store));
        assert_eq!(player.current_frame(), 0);

        clock.advance_ms(1);
        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 1);

        clock.advance_ms(50);
        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 2);

        clock.advance_ms(100);
        assert!(!player.poll(&store));
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.current_frame(), 2);
        assert_eq!(player.time_until_deadline(), None);
    }

    #[test]
    fn test_playback_loops_back_to_zero() {
        let store = store_with_durations(&[50, 50, 100]);
        let (mut player, clock) = player(&store);
        player.toggle(&store);

        clock.advance_ms(50);
        player.poll(&store);
        clock.advance_ms(50);
        player.poll(&store);
        assert_eq!(player.current_frame(), 2);

        clock.advance_ms(100);
        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn test_poll_works_off_overdue_frames_one_at_a_time() {
        let store = store_with_durations(&[50, 50, 100]);
        let (mut player, clock) = player(&store);
        player.set_looping(false);
        player.toggle(&store);

        clock.advance_ms(200);
        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 1);
        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 2);
        assert!(!player.poll(&store));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_toggle_on_last_frame_rewinds_first() {
        let store = store_with_durations(&[10, 10]);
        let (mut player, clock) = player(&store);
        player.set_looping(false);
        player.toggle(&store);
        clock.advance_ms(10);
        player.poll(&store);
        clock.advance_ms(10);
        player.poll(&store);
        assert_eq!(player.current_frame(), 1);
        assert!(!player.is_playing());

        player.toggle(&store);
        assert_eq!(player.current_frame(), 0);
        assert!(player.is_playing());
    }

    #[test]
    fn test_toggle_while_playing_cancels_deadline() {
        let store = store_with_durations(&[50]);
        let (mut player, _clock) = player(&store);
        player.toggle(&store);
        assert!(player.time_until_deadline().is_some());

        player.toggle(&store);
        assert!(!player.is_playing());
        assert_eq!(player.time_until_deadline(), None);
    }

    #[test]
    fn test_toggle_on_empty_store_is_no_op() {
        let store = FrameStore::new(Vec::new());
        let (mut player, _clock) = player(&store);
        player.toggle(&store);
        assert!(!player.is_playing());
    }

    #[test]
    fn test_next_previous_clamp() {
        let store = store_with_durations(&[10, 10, 10]);
        let (mut player, _clock) = player(&store);

        player.previous_frame(&store);
        assert_eq!(player.current_frame(), 0);
        player.next_frame(&store);
        player.next_frame(&store);
        player.next_frame(&store);
        assert_eq!(player.current_frame(), 2);
    }

    #[test]
    fn test_absolute_seeks_force_stop() {
        let store = store_with_durations(&[50, 50]);
        let (mut player, _clock) = player(&store);
        player.toggle(&store);
        player.go_to_end(&store);
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 1);

        player.toggle(&store);
        player.go_to_start();
        assert!(!player.is_playing());
        assert_eq!(player.current_frame(), 0);
    }

    #[test]
    fn test_content_change_resets_current_frame() {
        let store = store_with_durations(&[10, 10, 10]);
        let (mut player, _clock) = player(&store);
        player.next_frame(&store);
        player.next_frame(&store);
        assert_eq!(player.current_frame(), 2);

        let replaced = FrameStore::new(vec![
            Frame::new("a", "different", 10),
            Frame::new("b", "text", 10),
        ]);
        player.sync(&replaced);
        assert_eq!(player.current_frame(), 0);
    }

    #[test]
    fn test_color_only_change_keeps_current_frame() {
        let mut store = store_with_durations(&[10, 10, 10]);
        let (mut player, _clock) = player(&store);
        player.next_frame(&store);
        assert_eq!(player.current_frame(), 1);

        store.frames_mut()[0].colors.insert(Position::new(0, 0), 4);
        player.sync(&store);
        assert_eq!(player.current_frame(), 1);
    }

    #[test]
    fn test_sync_clamps_when_fingerprint_unchanged() {
        // Same joined fingerprint, one frame fewer: only the clamp runs.
        let three = FrameStore::new(vec![
            Frame::new("a", "a", 10),
            Frame::new("b", "b", 10),
            Frame::new("c", "c", 10),
        ]);
        let two = FrameStore::new(vec![
            Frame::new("a", "a", 10),
            Frame::new("bc", "b|c", 10),
        ]);
        assert_eq!(three.fingerprint(), two.fingerprint());

        let (mut player, _clock) = player(&three);
        player.next_frame(&three);
        player.next_frame(&three);
        assert_eq!(player.current_frame(), 2);

        player.sync(&two);
        assert_eq!(player.current_frame(), 1);
    }

    #[test]
    fn test_zero_duration_advances_immediately() {
        let store = store_with_durations(&[0, 0]);
        let (mut player, _clock) = player(&store);
        player.set_looping(false);
        player.toggle(&store);

        assert!(player.poll(&store));
        assert_eq!(player.current_frame(), 1);
        assert!(!player.poll(&store));
        assert!(!player.is_playing());
    }

    #[test]
    fn test_next_while_playing_reschedules() {
        let store = store_with_durations(&[50, 80, 90]);
        let (mut player, clock) = player(&store);
        player.toggle(&store);
        clock.advance_ms(30);
        player.next_frame(&store);
        assert_eq!(player.current_frame(), 1);
        // Deadline restarts relative to the move, using frame 1's duration.
        assert_eq!(player.time_until_deadline(), Some(Duration::from_millis(80)));
    }
}
