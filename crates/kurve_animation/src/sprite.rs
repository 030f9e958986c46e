//! Sprite player
//!
//! Plays [`FrameSequence`]s frame by frame on a [`Scheduler`] and works through
//! a FIFO queue of follow-up entries: further sequences, still images, or
//! callbacks. Each displayed image is pushed to a [`FrameSink`].
//!
//! The player owns two cancellable timers: the frame timer that steps through
//! the active sequence, and the advance timer that jumps to the next queue
//! entry after an explicit delay. Every `play`, `stop`, `next` and `set_image`
//! cancels both before doing anything else.

use crate::error::{AnimationError, Result};
use kurve_core::{Scheduler, TimerId};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Receives every image the player displays
pub trait FrameSink<I> {
    fn show(&mut self, image: &I);
}

impl<I, F: FnMut(&I)> FrameSink<I> for F {
    fn show(&mut self, image: &I) {
        self(image)
    }
}

/// A non-empty run of frames with its playback parameters
#[derive(Clone, Debug)]
pub struct FrameSequence<I> {
    frames: Rc<[I]>,
    looping: bool,
    fps: u32,
}

impl<I> FrameSequence<I> {
    pub const DEFAULT_FPS: u32 = 15;

    pub fn new(frames: Vec<I>) -> Result<Self> {
        if frames.is_empty() {
            return Err(AnimationError::EmptySequence);
        }
        Ok(Self {
            frames: frames.into(),
            looping: false,
            fps: Self::DEFAULT_FPS,
        })
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Set the frame rate. Zero is raised to 1.
    pub fn with_fps(mut self, fps: u32) -> Self {
        if fps == 0 {
            tracing::warn!("frame rate 0 raised to 1");
        }
        self.fps = fps.max(1);
        self
    }

    pub fn frames(&self) -> &[I] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time each frame stays up, in whole milliseconds
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps))
    }
}

/// What a queue entry does when it is reached
pub enum QueueItem<I> {
    Sequence(FrameSequence<I>),
    Image(I),
    Callback(Box<dyn FnOnce()>),
}

impl<I> std::fmt::Debug for QueueItem<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueItem::Sequence(sequence) => f
                .debug_struct("Sequence")
                .field("frames", &sequence.len())
                .field("looping", &sequence.looping())
                .field("fps", &sequence.fps())
                .finish(),
            QueueItem::Image(_) => f.write_str("Image"),
            QueueItem::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// A queued item, optionally followed by an automatic jump to the next entry
#[derive(Debug)]
pub struct QueueEntry<I> {
    pub item: QueueItem<I>,
    pub delay: Option<Duration>,
}

struct ActiveSequence<I> {
    sequence: FrameSequence<I>,
    frame: usize,
}

struct PlaybackState<I> {
    frame_timer: Option<TimerId>,
    advance_timer: Option<TimerId>,
    queue: VecDeque<QueueEntry<I>>,
    active: Option<ActiveSequence<I>>,
    current: Option<I>,
}

/// What follows a displayed frame
#[derive(Clone, Copy, Debug)]
enum Step {
    Frame(usize),
    Advance,
    Hold,
}

struct PlayerShared<I> {
    scheduler: Rc<dyn Scheduler>,
    sink: RefCell<Box<dyn FrameSink<I>>>,
    state: RefCell<PlaybackState<I>>,
}

/// Frame sequencing engine.
///
/// Cloning yields another handle to the same player. Sinks run while the
/// player is displaying a frame and must not call back into the player;
/// queued callbacks may.
pub struct SpritePlayer<I: Clone + 'static> {
    shared: Rc<PlayerShared<I>>,
}

impl<I: Clone + 'static> Clone for SpritePlayer<I> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<I: Clone + 'static> SpritePlayer<I> {
    pub fn new(scheduler: Rc<dyn Scheduler>, sink: impl FrameSink<I> + 'static) -> Self {
        Self {
            shared: Rc::new(PlayerShared {
                scheduler,
                sink: RefCell::new(Box::new(sink)),
                state: RefCell::new(PlaybackState {
                    frame_timer: None,
                    advance_timer: None,
                    queue: VecDeque::new(),
                    active: None,
                    current: None,
                }),
            }),
        }
    }

    /// Replace whatever is playing with `sequence`, starting at its first frame
    pub fn play(&self, sequence: FrameSequence<I>) {
        self.shared.play(sequence);
    }

    /// Play `sequence`, then jump to the next queue entry after `after` no
    /// matter where the sequence is
    pub fn play_for(&self, sequence: FrameSequence<I>, after: Duration) {
        self.shared.play(sequence);
        self.shared.arm_advance(after);
    }

    /// Start working through the queue
    pub fn play_queue(&self) {
        self.shared.next();
    }

    /// Cancel current playback and dispatch the front queue entry
    pub fn next(&self) {
        self.shared.next();
    }

    /// Freeze on the current frame
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Stop and show a single image. The queue is kept.
    pub fn set_image(&self, image: I) {
        self.shared.stop();
        self.shared.display(image);
    }

    pub fn chain(&self, sequence: FrameSequence<I>, delay: Option<Duration>) {
        self.push(QueueItem::Sequence(sequence), delay);
    }

    pub fn chain_image(&self, image: I, delay: Option<Duration>) {
        self.push(QueueItem::Image(image), delay);
    }

    pub fn chain_callback(&self, callback: impl FnOnce() + 'static, delay: Option<Duration>) {
        self.push(QueueItem::Callback(Box::new(callback)), delay);
    }

    pub fn clear_queue(&self) {
        let dropped = std::mem::take(&mut self.shared.state.borrow_mut().queue);
        tracing::trace!(entries = dropped.len(), "sprite queue cleared");
    }

    fn push(&self, item: QueueItem<I>, delay: Option<Duration>) {
        tracing::trace!(?item, ?delay, "sprite queue entry added");
        self.shared
            .state
            .borrow_mut()
            .queue
            .push_back(QueueEntry { item, delay });
    }

    /// Image currently on display
    pub fn current_image(&self) -> Option<I> {
        self.shared.state.borrow().current.clone()
    }

    /// Index of the displayed frame within the active sequence
    pub fn current_frame(&self) -> Option<usize> {
        self.shared
            .state
            .borrow()
            .active
            .as_ref()
            .map(|active| active.frame)
    }

    pub fn queue_len(&self) -> usize {
        self.shared.state.borrow().queue.len()
    }

    /// Whether a frame advance is scheduled
    pub fn is_playing(&self) -> bool {
        self.shared.state.borrow().frame_timer.is_some()
    }

    /// Whether a delayed jump to the next entry is scheduled
    pub fn has_pending_advance(&self) -> bool {
        self.shared.state.borrow().advance_timer.is_some()
    }
}

impl<I: Clone + 'static> PlayerShared<I> {
    fn play(self: &Rc<Self>, sequence: FrameSequence<I>) {
        self.stop();
        tracing::debug!(
            frames = sequence.len(),
            looping = sequence.looping(),
            fps = sequence.fps(),
            "playing sequence"
        );
        self.state.borrow_mut().active = Some(ActiveSequence { sequence, frame: 0 });
        self.show_frame(0);
    }

    fn show_frame(self: &Rc<Self>, index: usize) {
        let (image, step, interval) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            state.frame_timer = None;
            let Some(active) = state.active.as_mut() else {
                return;
            };
            let Some(image) = active.sequence.frames.get(index).cloned() else {
                return;
            };
            active.frame = index;

            let step = if index + 1 < active.sequence.len() {
                Step::Frame(index + 1)
            } else if active.sequence.looping() {
                Step::Frame(0)
            } else if !state.queue.is_empty() {
                Step::Advance
            } else {
                Step::Hold
            };
            state.current = Some(image.clone());
            (image, step, active.sequence.frame_interval())
        };

        if let Step::Frame(next) = step {
            let id = self.schedule_frame(interval, next);
            self.state.borrow_mut().frame_timer = Some(id);
        }

        self.sink.borrow_mut().show(&image);

        match step {
            Step::Advance => {
                tracing::trace!(frame = index, "sequence finished, advancing queue");
                self.next();
            }
            Step::Hold => tracing::trace!(frame = index, "sequence finished, holding last frame"),
            Step::Frame(_) => {}
        }
    }

    fn schedule_frame(self: &Rc<Self>, delay: Duration, index: usize) -> TimerId {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.show_frame(index);
                }
            }),
        )
    }

    fn arm_advance(self: &Rc<Self>, delay: Duration) {
        if let Some(id) = self.state.borrow_mut().advance_timer.take() {
            self.scheduler.cancel(id);
        }

        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.state.borrow_mut().advance_timer = None;
                    shared.next();
                }
            }),
        );
        self.state.borrow_mut().advance_timer = Some(id);
    }

    fn next(self: &Rc<Self>) {
        self.stop();
        let entry = self.state.borrow_mut().queue.pop_front();
        let Some(QueueEntry { item, delay }) = entry else {
            tracing::trace!("sprite queue empty");
            return;
        };

        tracing::debug!(?item, ?delay, "advancing sprite queue");
        match item {
            QueueItem::Sequence(sequence) => self.play(sequence),
            QueueItem::Image(image) => self.display(image),
            QueueItem::Callback(callback) => callback(),
        }

        if let Some(delay) = delay {
            self.arm_advance(delay);
        }
    }

    fn stop(&self) {
        let (frame, advance) = {
            let mut state = self.state.borrow_mut();
            (state.frame_timer.take(), state.advance_timer.take())
        };
        if frame.is_none() && advance.is_none() {
            tracing::trace!("sprite player already stopped");
            return;
        }
        for id in frame.into_iter().chain(advance) {
            self.scheduler.cancel(id);
        }
    }

    fn display(&self, image: I) {
        {
            let mut state = self.state.borrow_mut();
            state.active = None;
            state.current = Some(image.clone());
        }
        self.sink.borrow_mut().show(&image);
    }
}

impl<I> Drop for PlayerShared<I> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for id in state.frame_timer.take().into_iter().chain(state.advance_timer.take()) {
            self.scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurve_core::VirtualScheduler;
    use std::cell::Cell;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup() -> (Rc<VirtualScheduler>, Log, SpritePlayer<&'static str>) {
        let scheduler = Rc::new(VirtualScheduler::new());
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink_log = log.clone();
        let player = SpritePlayer::new(scheduler.clone(), move |image: &&'static str| {
            sink_log.borrow_mut().push(*image)
        });
        (scheduler, log, player)
    }

    fn seq(frames: &[&'static str], looping: bool, fps: u32) -> FrameSequence<&'static str> {
        FrameSequence::new(frames.to_vec())
            .unwrap()
            .with_loop(looping)
            .with_fps(fps)
    }

    #[test]
    fn test_sequence_construction() {
        assert_eq!(
            FrameSequence::<u8>::new(Vec::new()).err(),
            Some(AnimationError::EmptySequence)
        );

        let sequence = FrameSequence::new(vec![1u8, 2]).unwrap();
        assert_eq!(sequence.fps(), FrameSequence::<u8>::DEFAULT_FPS);
        assert_eq!(sequence.frame_interval(), ms(66));
        assert!(!sequence.looping());

        let slow = sequence.with_fps(0);
        assert_eq!(slow.fps(), 1);
        assert_eq!(slow.frame_interval(), ms(1000));
    }

    #[test]
    fn test_plays_once_and_holds_last_frame() {
        let (scheduler, log, player) = setup();
        player.play(seq(&["A", "B", "C"], false, 10));

        assert_eq!(*log.borrow(), vec!["A"]);
        scheduler.advance(ms(99));
        assert_eq!(*log.borrow(), vec!["A"]);
        scheduler.advance(ms(1));
        assert_eq!(*log.borrow(), vec!["A", "B"]);
        scheduler.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["A", "B", "C"]);

        assert_eq!(scheduler.pending_count(), 0);
        assert!(!player.is_playing());
        assert_eq!(player.current_image(), Some("C"));
        assert_eq!(player.current_frame(), Some(2));

        scheduler.advance(ms(1000));
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_looping_until_stopped() {
        let (scheduler, log, player) = setup();
        player.play(seq(&["A", "B"], true, 10));

        scheduler.advance(ms(450));
        assert_eq!(*log.borrow(), vec!["A", "B", "A", "B", "A"]);
        assert!(player.is_playing());

        player.stop();
        assert!(!player.is_playing());
        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance(ms(1000));
        assert_eq!(log.borrow().len(), 5);
        assert_eq!(player.current_image(), Some("A"));

        // idempotent
        player.stop();
        assert_eq!(player.current_frame(), Some(0));
    }

    #[test]
    fn test_chain_starts_right_after_last_frame() {
        let (scheduler, log, player) = setup();
        player.chain(seq(&["Y", "Z"], false, 10), None);
        assert_eq!(player.queue_len(), 1);

        player.play(seq(&["X"], false, 10));
        assert_eq!(*log.borrow(), vec!["X", "Y"]);
        assert_eq!(player.queue_len(), 0);
        assert!(player.is_playing());

        scheduler.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["X", "Y", "Z"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_play_for_jumps_after_delay() {
        let (scheduler, log, player) = setup();
        player.chain_image("W", None);
        player.play_for(seq(&["X", "Y"], true, 10), ms(250));
        assert!(player.has_pending_advance());

        scheduler.advance(ms(249));
        assert_eq!(*log.borrow(), vec!["X", "Y", "X"]);

        scheduler.advance(ms(1));
        assert_eq!(*log.borrow(), vec!["X", "Y", "X", "W"]);
        assert_eq!(player.current_image(), Some("W"));
        assert_eq!(player.current_frame(), None);
        assert!(!player.is_playing());
        assert!(!player.has_pending_advance());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_queue_delays_and_images() {
        let (scheduler, log, player) = setup();
        player.chain_image("W", Some(ms(50)));
        player.chain_image("V", None);

        player.play_queue();
        assert_eq!(*log.borrow(), vec!["W"]);
        scheduler.advance(ms(50));
        assert_eq!(*log.borrow(), vec!["W", "V"]);
        assert_eq!(player.queue_len(), 0);

        // empty queue is a no-op
        player.next();
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(player.current_image(), Some("V"));
    }

    #[test]
    fn test_callback_entries_may_reenter_player() {
        let (scheduler, log, player) = setup();
        let calls = Rc::new(Cell::new(0));

        let handle = player.clone();
        let seen = calls.clone();
        player.chain_callback(
            move || {
                seen.set(seen.get() + 1);
                handle.set_image("from-callback");
            },
            Some(ms(20)),
        );
        player.chain_image("after", None);

        player.next();
        assert_eq!(calls.get(), 1);
        assert_eq!(*log.borrow(), vec!["from-callback"]);
        assert_eq!(player.queue_len(), 1);

        scheduler.advance(ms(20));
        assert_eq!(*log.borrow(), vec!["from-callback", "after"]);
        player.clear_queue();
    }

    #[test]
    fn test_set_image_stops_and_keeps_queue() {
        let (scheduler, log, player) = setup();
        player.chain_image("Q", None);
        player.play(seq(&["A", "B"], true, 10));

        player.set_image("S");
        assert!(!player.is_playing());
        assert_eq!(player.queue_len(), 1);
        assert_eq!(player.current_frame(), None);

        scheduler.advance(ms(500));
        assert_eq!(*log.borrow(), vec!["A", "S"]);
    }

    #[test]
    fn test_clear_queue_leaves_playback_alone() {
        let (scheduler, log, player) = setup();
        player.chain_image("Q", None);
        player.play(seq(&["A", "B"], false, 10));
        player.clear_queue();
        assert_eq!(player.queue_len(), 0);

        scheduler.advance(ms(300));
        assert_eq!(*log.borrow(), vec!["A", "B"]);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_replay_cancels_previous_timers() {
        let (scheduler, log, player) = setup();
        player.play(seq(&["A", "B"], true, 10));
        scheduler.advance(ms(50));
        player.play(seq(&["C"], false, 10));

        assert_eq!(scheduler.pending_count(), 0);
        scheduler.advance(ms(500));
        assert_eq!(*log.borrow(), vec!["A", "C"]);
    }

    #[test]
    fn test_drop_cancels_timers() {
        let (scheduler, _log, player) = setup();
        player.play(seq(&["A", "B"], true, 10));
        assert_eq!(scheduler.pending_count(), 1);
        drop(player);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
