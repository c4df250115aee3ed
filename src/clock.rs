//! Time-evolution controller.
//!
//! A [`Clock`] is a registry of animated objects, each with its own
//! play/pause/stop state and elapsed time, plus a group timeline driven by
//! [`Clock::start_all`], [`Clock::pause_all`] and [`Clock::stop_all`].
//!
//! The clock never sleeps or polls. A host calls [`Clock::schedule`] after
//! starting something; when the requested frame arrives it calls
//! [`Clock::drive`] (or [`Clock::tick`]) and schedules again. Once nothing is
//! playing, `schedule` stops requesting frames.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{PlotError, Result};

/// Playback state of a registered object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Stopped with zero elapsed time.
    #[default]
    Idle,
    /// Advancing with wall time.
    Playing,
    /// Frozen at its elapsed time.
    Paused,
}

/// A redraw request produced by a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Registered object id.
    pub id: String,
    /// Elapsed time in seconds.
    pub elapsed: f64,
}

/// Something that can redraw a registered object at a given time.
pub trait FrameTarget {
    /// Redraw object `id` at `elapsed` seconds.
    fn frame(&mut self, id: &str, elapsed: f64) -> Result<()>;
}

/// External "call me on the next display refresh" primitive.
pub trait FrameScheduler {
    /// Request one animation frame.
    fn request_frame(&mut self);
}

/// Clock shared between a host's UI thread and its frame driver.
pub type SharedClock = Arc<Mutex<Clock>>;

#[derive(Debug, Clone, Copy, Default)]
struct Timeline {
    state: PlayState,
    start: Option<Instant>,
    offset: Duration,
    frame_pending: bool,
}

impl Timeline {
    fn elapsed(&self, now: Instant) -> Duration {
        match (self.state, self.start) {
            (PlayState::Playing, Some(start)) => {
                self.offset + now.saturating_duration_since(start)
            }
            _ => self.offset,
        }
    }

    fn start(&mut self, now: Instant) {
        match self.state {
            PlayState::Idle => {
                self.state = PlayState::Playing;
                self.start = Some(now);
                self.offset = Duration::ZERO;
            }
            PlayState::Paused => self.resume(now),
            PlayState::Playing => {}
        }
    }

    fn pause(&mut self, now: Instant) {
        if self.state == PlayState::Playing {
            self.offset = self.elapsed(now);
            self.start = None;
            self.state = PlayState::Paused;
        }
    }

    fn resume(&mut self, now: Instant) {
        if self.state == PlayState::Paused {
            self.start = Some(now);
            self.state = PlayState::Playing;
        }
    }

    fn stop(&mut self) {
        *self = Self::default();
    }

    /// A fresh timeline at the same point as `self`.
    fn joined(&self, now: Instant) -> Self {
        match self.state {
            PlayState::Idle => Self::default(),
            PlayState::Playing => Self {
                state: PlayState::Playing,
                start: Some(now),
                offset: self.elapsed(now),
                frame_pending: false,
            },
            PlayState::Paused => Self {
                state: PlayState::Paused,
                start: None,
                offset: self.offset,
                frame_pending: false,
            },
        }
    }
}

/// Registry of animated objects.
#[derive(Debug, Default)]
pub struct Clock {
    objects: BTreeMap<String, Timeline>,
    group: Timeline,
    frame_pending: bool,
}

impl Clock {
    /// Create an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty clock behind a mutex.
    pub fn shared() -> SharedClock {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Register an object.
    ///
    /// With `sync_with_group` the object joins the group timeline at its
    /// current elapsed time; otherwise it starts idle.
    pub fn add_object(
        &mut self,
        id: impl Into<String>,
        sync_with_group: bool,
        now: Instant,
    ) -> Result<()> {
        let id = id.into();
        if self.objects.contains_key(&id) {
            return Err(PlotError::DuplicateObjectId(id));
        }
        let timeline = if sync_with_group {
            self.group.joined(now)
        } else {
            Timeline::default()
        };
        log::debug!("clock: registered `{id}` ({:?})", timeline.state);
        self.objects.insert(id, timeline);
        Ok(())
    }

    /// Unregister an object. Returns whether it was registered.
    ///
    /// Removed objects never appear in later frames.
    pub fn remove_object(&mut self, id: &str) -> bool {
        let removed = self.objects.remove(id).is_some();
        if removed {
            log::debug!("clock: removed `{id}`");
        }
        removed
    }

    /// Check if an object is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    /// Registered ids in order.
    pub fn object_ids(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Start an idle object, or resume a paused one.
    pub fn start(&mut self, id: &str, now: Instant) -> Result<()> {
        self.transition(id, |timeline| timeline.start(now))
    }

    /// Freeze a playing object at its elapsed time.
    pub fn pause(&mut self, id: &str, now: Instant) -> Result<()> {
        self.transition(id, |timeline| timeline.pause(now))
    }

    /// Continue a paused object from where it stopped.
    pub fn resume(&mut self, id: &str, now: Instant) -> Result<()> {
        self.transition(id, |timeline| timeline.resume(now))
    }

    /// Return an object to idle with zero elapsed time.
    pub fn stop(&mut self, id: &str) -> Result<()> {
        self.transition(id, Timeline::stop)
    }

    /// Start every object and the group timeline.
    pub fn start_all(&mut self, now: Instant) {
        self.transition_all(|timeline| timeline.start(now));
    }

    /// Pause every object and the group timeline.
    pub fn pause_all(&mut self, now: Instant) {
        self.transition_all(|timeline| timeline.pause(now));
    }

    /// Resume every paused object and the group timeline.
    pub fn resume_all(&mut self, now: Instant) {
        self.transition_all(|timeline| timeline.resume(now));
    }

    /// Stop every object and the group timeline.
    pub fn stop_all(&mut self) {
        self.transition_all(Timeline::stop);
    }

    /// State of an object.
    pub fn state(&self, id: &str) -> Result<PlayState> {
        self.timeline(id).map(|timeline| timeline.state)
    }

    /// Elapsed time of an object in seconds.
    pub fn elapsed(&self, id: &str, now: Instant) -> Result<f64> {
        self.timeline(id)
            .map(|timeline| timeline.elapsed(now).as_secs_f64())
    }

    /// Check if any object is playing.
    pub fn is_running(&self) -> bool {
        self.objects
            .values()
            .any(|timeline| timeline.state == PlayState::Playing)
    }

    /// Consume the pending frame and list every playing object's elapsed time.
    pub fn tick(&mut self, now: Instant) -> Vec<Frame> {
        self.frame_pending = false;
        for timeline in self.objects.values_mut() {
            timeline.frame_pending = false;
        }
        self.objects
            .iter()
            .filter(|(_, timeline)| timeline.state == PlayState::Playing)
            .map(|(id, timeline)| Frame {
                id: id.clone(),
                elapsed: timeline.elapsed(now).as_secs_f64(),
            })
            .collect()
    }

    /// Tick and hand every frame to `target`.
    ///
    /// Every playing object is attempted; the first failure is returned after
    /// the rest have been drawn. On success, returns the number of frames.
    pub fn drive(&mut self, now: Instant, target: &mut impl FrameTarget) -> Result<usize> {
        let frames = self.tick(now);
        let mut first_error = None;
        for frame in &frames {
            if let Err(err) = target.frame(&frame.id, frame.elapsed) {
                log::warn!("clock: could not redraw `{}`: {err}", frame.id);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(frames.len()),
        }
    }

    /// Request the next frame if something is playing and no request is
    /// outstanding. Returns whether a frame was requested.
    pub fn schedule(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.frame_pending || !self.is_running() {
            return false;
        }
        self.frame_pending = true;
        scheduler.request_frame();
        true
    }

    /// Consume one object's pending frame and report its elapsed time.
    ///
    /// Unlike [`Clock::tick`], paused and idle objects also get a frame.
    pub fn frame(&mut self, id: &str, now: Instant) -> Result<Frame> {
        let timeline = self.timeline_mut(id)?;
        timeline.frame_pending = false;
        Ok(Frame {
            id: id.to_owned(),
            elapsed: timeline.elapsed(now).as_secs_f64(),
        })
    }

    /// Request the next frame for one object if it is playing and its own
    /// request is not outstanding. Returns whether a frame was requested.
    ///
    /// Used by renderers that draw a single object, alongside [`Clock::frame`].
    pub fn schedule_object(
        &mut self,
        id: &str,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<bool> {
        let timeline = self.timeline_mut(id)?;
        if timeline.frame_pending || timeline.state != PlayState::Playing {
            return Ok(false);
        }
        timeline.frame_pending = true;
        scheduler.request_frame();
        Ok(true)
    }

    fn timeline_mut(&mut self, id: &str) -> Result<&mut Timeline> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| PlotError::UnknownObject(id.to_owned()))
    }

    fn timeline(&self, id: &str) -> Result<&Timeline> {
        self.objects
            .get(id)
            .ok_or_else(|| PlotError::UnknownObject(id.to_owned()))
    }

    fn transition(&mut self, id: &str, apply: impl FnOnce(&mut Timeline)) -> Result<()> {
        let timeline = self.timeline_mut(id)?;
        let before = timeline.state;
        apply(timeline);
        if before != timeline.state {
            log::debug!("clock: `{id}` {before:?} -> {:?}", timeline.state);
        }
        Ok(())
    }

    fn transition_all(&mut self, mut apply: impl FnMut(&mut Timeline)) {
        apply(&mut self.group);
        for timeline in self.objects.values_mut() {
            apply(timeline);
        }
        log::debug!(
            "clock: group {:?}, {} objects",
            self.group.state,
            self.objects.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f64) -> Duration {
        Duration::from_secs_f64(value)
    }

    #[derive(Default)]
    struct Counter(usize);

    impl FrameScheduler for Counter {
        fn request_frame(&mut self) {
            self.0 += 1;
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<(String, f64)>);

    impl FrameTarget for Recorder {
        fn frame(&mut self, id: &str, elapsed: f64) -> Result<()> {
            if id == "missing" {
                return Err(PlotError::ElementNotFound(id.to_owned()));
            }
            self.0.push((id.to_owned(), elapsed));
            Ok(())
        }
    }

    #[test]
    fn lifecycle() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.add_object("a", false, t0).expect("new id");
        assert_eq!(clock.state("a"), Ok(PlayState::Idle));

        clock.start_all(t0);
        assert!((clock.elapsed("a", t0 + secs(1.0)).expect("registered") - 1.0).abs() < 1e-9);

        clock.pause_all(t0 + secs(1.0));
        assert!(clock.tick(t0 + secs(2.0)).is_empty());
        assert!((clock.elapsed("a", t0 + secs(5.0)).expect("registered") - 1.0).abs() < 1e-9);

        clock.resume_all(t0 + secs(6.0));
        assert!((clock.elapsed("a", t0 + secs(7.0)).expect("registered") - 2.0).abs() < 1e-9);

        clock.stop_all();
        assert_eq!(clock.state("a"), Ok(PlayState::Idle));
        assert_eq!(clock.elapsed("a", t0 + secs(8.0)), Ok(0.0));
    }

    #[test]
    fn per_object_control() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.add_object("a", false, t0).expect("new id");
        clock.add_object("b", false, t0).expect("new id");
        clock.start("a", t0).expect("registered");
        assert_eq!(clock.state("b"), Ok(PlayState::Idle));

        clock.pause("a", t0 + secs(2.0)).expect("registered");
        clock.start("a", t0 + secs(3.0)).expect("registered");
        assert_eq!(clock.state("a"), Ok(PlayState::Playing));
        assert!((clock.elapsed("a", t0 + secs(4.0)).expect("registered") - 3.0).abs() < 1e-9);

        assert_eq!(
            clock.start("nope", t0),
            Err(PlotError::UnknownObject("nope".into()))
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.add_object("a", false, t0).expect("new id");
        assert_eq!(
            clock.add_object("a", true, t0),
            Err(PlotError::DuplicateObjectId("a".into()))
        );
    }

    #[test]
    fn synced_objects_join_the_group() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.add_object("a", false, t0).expect("new id");
        clock.start_all(t0);
        clock.add_object("b", true, t0 + secs(2.0)).expect("new id");
        clock.add_object("c", false, t0 + secs(2.0)).expect("new id");

        assert_eq!(clock.state("b"), Ok(PlayState::Playing));
        assert!((clock.elapsed("b", t0 + secs(3.0)).expect("registered") - 3.0).abs() < 1e-9);
        assert_eq!(clock.state("c"), Ok(PlayState::Idle));
    }

    #[test]
    fn scheduling_stops_when_idle() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        let mut scheduler = Counter::default();
        clock.add_object("a", false, t0).expect("new id");
        assert!(!clock.schedule(&mut scheduler));

        clock.start("a", t0).expect("registered");
        assert!(clock.schedule(&mut scheduler));
        assert!(!clock.schedule(&mut scheduler));
        assert_eq!(clock.tick(t0 + secs(0.5)).len(), 1);
        assert!(clock.schedule(&mut scheduler));

        clock.stop("a").expect("registered");
        clock.tick(t0 + secs(1.0));
        assert!(!clock.schedule(&mut scheduler));
        assert_eq!(scheduler.0, 2);
    }

    #[test]
    fn objects_schedule_their_own_frames() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        let mut scheduler = Counter::default();
        clock.add_object("a", false, t0).expect("new id");
        clock.add_object("b", false, t0).expect("new id");
        assert_eq!(clock.schedule_object("a", &mut scheduler), Ok(false));

        clock.start("a", t0).expect("registered");
        clock.start("b", t0).expect("registered");
        assert_eq!(clock.schedule_object("a", &mut scheduler), Ok(true));
        assert_eq!(clock.schedule_object("a", &mut scheduler), Ok(false));
        assert_eq!(clock.schedule_object("b", &mut scheduler), Ok(true));

        let frame = clock.frame("a", t0 + secs(0.5)).expect("registered");
        assert!((frame.elapsed - 0.5).abs() < 1e-9);
        assert_eq!(clock.schedule_object("a", &mut scheduler), Ok(true));

        clock.pause("a", t0 + secs(1.0)).expect("registered");
        clock.frame("a", t0 + secs(1.0)).expect("registered");
        assert_eq!(clock.schedule_object("a", &mut scheduler), Ok(false));
        assert_eq!(
            clock.schedule_object("nope", &mut scheduler),
            Err(PlotError::UnknownObject("nope".into()))
        );
        assert_eq!(scheduler.0, 3);
    }

    #[test]
    fn drive_reports_unreachable_targets() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.add_object("a", false, t0).expect("new id");
        clock.add_object("missing", false, t0).expect("new id");
        clock.start_all(t0);

        let mut target = Recorder::default();
        assert_eq!(
            clock.drive(t0 + secs(1.0), &mut target),
            Err(PlotError::ElementNotFound("missing".into()))
        );
        assert_eq!(target.0.len(), 1);

        clock.remove_object("missing");
        assert_eq!(clock.drive(t0 + secs(2.0), &mut target), Ok(1));
    }
}
