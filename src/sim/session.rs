//! Session state machine
//!
//! Drives one play-through of a level: spawns on the scheduler's clock,
//! integrates motion, expires objects, resolves swipes, and decides between
//! failure and completion once every object is resolved.
//!
//! The session is frame-driven. The host calls `on_simulation_step` once
//! per frame and forwards pointer events as they arrive; presentation work
//! is reported through `SessionEvent`s drained with `drain_events`.

use glam::Vec2;

use super::arena::Arena;
use super::grading::{Verdict, grade};
use super::scheduler::{Scheduler, SpawnSource};
use super::slice::{SliceOutcome, SliceResolver};
use super::state::{
    FailureCause, ObjectKind, RemovalCause, SessionCounters, SessionEvent, SessionState,
    SwipeSegment,
};
use crate::persistence::{self, ProfileHandle};
use crate::tuning::SessionTuning;
use crate::ui::{ControlTable, Overlay, Rect, Scene};

/// Commands issued by the in-game controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    TogglePause,
    Resume,
    Restart,
    Menu,
    NextLevel,
}

/// One play-through of a level
pub struct Session {
    level: u32,
    state: SessionState,
    counters: SessionCounters,
    /// Simulation time; only advances while active
    clock: f32,
    scheduler: Scheduler,
    arena: Arena,
    resolver: SliceResolver,
    tuning: SessionTuning,
    spawns: Box<dyn SpawnSource>,
    profile: ProfileHandle,
    controls: ControlTable<GameCommand>,
    /// Previous pointer sample while a swipe is in progress
    last_pointer: Option<Vec2>,
    blade: usize,
    failure: Option<FailureCause>,
    stars: Option<u8>,
    closed: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    /// Start a session at `level` (levels below 1 are played as level 1)
    pub fn start(
        level: u32,
        tuning: SessionTuning,
        spawns: Box<dyn SpawnSource>,
        profile: ProfileHandle,
    ) -> Self {
        let tuning = tuning.sanitized();
        let mut session = Self {
            level: 1,
            state: SessionState::Active,
            counters: SessionCounters::default(),
            clock: 0.0,
            scheduler: Scheduler::new(tuning.spawn_interval),
            arena: Arena::new(),
            resolver: SliceResolver::new(tuning.slice_mode),
            tuning,
            spawns,
            profile,
            controls: ControlTable::new(),
            last_pointer: None,
            blade: 0,
            failure: None,
            stars: None,
            closed: false,
            events: Vec::new(),
        };
        session.start_session(level);
        session
    }

    /// Start at the level stored as selected in the profile
    pub fn from_profile(
        tuning: SessionTuning,
        spawns: Box<dyn SpawnSource>,
        profile: ProfileHandle,
    ) -> Self {
        let level = persistence::selected_level(&*profile.borrow());
        Self::start(level, tuning, spawns, profile)
    }

    /// Reset everything and begin `level`
    pub fn start_session(&mut self, level: u32) {
        let level = if level < 1 {
            log::warn!("Invalid level {}, playing level 1", level);
            1
        } else {
            level
        };

        self.level = level;
        self.state = SessionState::Active;
        self.counters = SessionCounters::new(
            self.tuning.fruit_budget(level),
            self.tuning.bomb_budget(level),
        );
        self.clock = 0.0;
        self.scheduler = Scheduler::new(self.tuning.spawn_interval);
        self.arena = Arena::new();
        self.resolver = SliceResolver::new(self.tuning.slice_mode);
        self.last_pointer = None;
        self.blade = persistence::selected_blade(&*self.profile.borrow());
        self.failure = None;
        self.stars = None;
        self.closed = false;
        self.rebuild_controls();

        log::info!(
            "Level {} started: {} fruit, {} bombs",
            level,
            self.counters.remaining_fruit,
            self.counters.remaining_bombs
        );
    }

    // === Lifecycle commands ===

    pub fn pause(&mut self) {
        if self.state != SessionState::Active || self.closed {
            return;
        }
        self.state = SessionState::Paused;
        // A swipe must not span the pause
        self.last_pointer = None;
        self.rebuild_controls();
        self.events.push(SessionEvent::OverlayShown(Overlay::Pause));
        log::debug!("Paused at t={:.2}", self.clock);
    }

    pub fn resume(&mut self) {
        if self.state != SessionState::Paused || self.closed {
            return;
        }
        self.state = SessionState::Active;
        self.rebuild_controls();
        self.events.push(SessionEvent::OverlayHidden);
        log::debug!("Resumed at t={:.2}", self.clock);
    }

    /// Replay the current level from scratch
    pub fn restart(&mut self) {
        let level = self.level;
        self.start_session(level);
        self.events.push(SessionEvent::Navigate(Scene::Game { level }));
    }

    pub fn advance_to_next_level(&mut self) {
        let level = self.level.saturating_add(1);
        self.start_session(level);
        self.events.push(SessionEvent::Navigate(Scene::Game { level }));
    }

    /// Tear the session down and return to the menu
    ///
    /// Nothing is persisted beyond what completion already committed.
    pub fn exit(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.last_pointer = None;
        self.arena.clear();
        self.controls = ControlTable::new();
        self.events.push(SessionEvent::Navigate(Scene::MainMenu));
        log::info!("Left level {} ({:?})", self.level, self.state);
    }

    // === Frame step ===

    /// Advance the simulation by one frame
    pub fn on_simulation_step(&mut self, dt: f32) {
        if self.state != SessionState::Active || self.closed {
            return;
        }
        let dt = dt.max(0.0).min(self.tuning.max_frame_dt);
        self.clock += dt;

        let plans = self.scheduler.due_spawns(
            self.clock,
            &mut self.counters,
            self.spawns.as_mut(),
            &self.tuning,
        );
        for plan in &plans {
            let object = self.arena.spawn(plan, &self.tuning);
            self.events.push(SessionEvent::Spawned {
                id: object.id,
                kind: object.kind,
                pos: object.pos,
            });
        }

        self.arena.integrate(dt, &self.tuning);

        for id in self.arena.expired(self.clock) {
            if self.arena.remove(id).is_some() {
                log::debug!("Object #{} expired", id);
                self.events.push(SessionEvent::Removed {
                    id,
                    cause: RemovalCause::Expired,
                });
                self.check_completion();
            }
        }

        // Also covers sessions that never had anything to spawn
        self.check_completion();
    }

    // === Pointer input ===

    pub fn on_pointer_down(&mut self, point: Vec2, _timestamp: f64) {
        if self.closed {
            return;
        }
        if let Some(command) = self.controls.hit(point) {
            self.dispatch(command);
            return;
        }
        if self.state == SessionState::Active {
            self.last_pointer = Some(point);
        }
    }

    pub fn on_pointer_move(&mut self, point: Vec2, timestamp: f64) {
        if self.state != SessionState::Active || self.closed {
            return;
        }
        if let Some(from) = self.last_pointer {
            let segment = SwipeSegment {
                from,
                to: point,
                timestamp,
            };
            self.apply_swipe(&segment);
        }
        if self.state == SessionState::Active {
            self.last_pointer = Some(point);
        }
    }

    pub fn on_pointer_up(&mut self, _point: Vec2, _timestamp: f64) {
        self.last_pointer = None;
    }

    /// Pointer lost: forget the swipe without resolving anything
    pub fn on_pointer_cancel(&mut self, _point: Vec2, _timestamp: f64) {
        self.last_pointer = None;
    }

    fn dispatch(&mut self, command: GameCommand) {
        log::debug!("Control {:?}", command);
        match command {
            GameCommand::TogglePause => match self.state {
                SessionState::Active => self.pause(),
                SessionState::Paused => self.resume(),
                _ => {}
            },
            GameCommand::Resume => self.resume(),
            GameCommand::Restart => self.restart(),
            GameCommand::Menu => self.exit(),
            GameCommand::NextLevel => self.advance_to_next_level(),
        }
    }

    fn apply_swipe(&mut self, segment: &SwipeSegment) {
        self.arena.add_trail(segment, self.blade);
        self.events.push(SessionEvent::SwipeTrail {
            from: segment.from,
            to: segment.to,
            blade: self.blade,
        });

        match self.resolver.resolve(segment, &mut self.arena) {
            SliceOutcome::Miss => {}
            SliceOutcome::BombHit { bomb } => {
                log::info!("Bomb #{} sliced on level {}", bomb, self.level);
                self.fail(FailureCause::BombHit);
            }
            SliceOutcome::Sliced { fruit } => {
                for object in fruit {
                    self.counters.record_cut();
                    self.events.push(SessionEvent::Removed {
                        id: object.id,
                        cause: RemovalCause::Sliced,
                    });
                    if let ObjectKind::Fruit(variety) = object.kind {
                        let half_velocities =
                            self.arena.add_split(variety, object.pos, &self.tuning);
                        self.events.push(SessionEvent::SplitEffect {
                            variety,
                            pos: object.pos,
                            half_velocities,
                        });
                    }
                    log::debug!("Sliced {:?} #{}", object.kind, object.id);
                }
                self.events.push(SessionEvent::ScoreChanged {
                    score: self.counters.score,
                });
                self.check_completion();
            }
        }
    }

    // === Completion ===

    /// Grade the session once both budgets are spent and the arena is empty
    fn check_completion(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        if !self.counters.spawning_done() || !self.arena.is_empty() {
            return;
        }

        match grade(self.counters.cut_ratio(), &self.tuning) {
            Verdict::Completed { stars } => self.complete(stars),
            Verdict::Failed => self.fail(FailureCause::TooFewCut),
        }
    }

    fn complete(&mut self, stars: u8) {
        self.state = SessionState::Completed;
        self.stars = Some(stars);
        self.last_pointer = None;
        self.rebuild_controls();

        persistence::record_completion(
            &mut *self.profile.borrow_mut(),
            self.level,
            stars,
            self.counters.cut_fruit,
        );

        log::info!(
            "Level {} completed: {}/{} fruit, {} stars",
            self.level,
            self.counters.cut_fruit,
            self.counters.initial_fruit,
            stars
        );
        self.events.push(SessionEvent::OverlayShown(Overlay::Completion {
            level: self.level,
            stars,
            currency_delta: self.counters.cut_fruit,
        }));
    }

    fn fail(&mut self, cause: FailureCause) {
        self.state = SessionState::Failed;
        self.failure = Some(cause);
        self.last_pointer = None;
        self.rebuild_controls();

        log::info!(
            "Level {} failed ({:?}): {}/{} fruit",
            self.level,
            cause,
            self.counters.cut_fruit,
            self.counters.initial_fruit
        );
        self.events.push(SessionEvent::OverlayShown(Overlay::Failure {
            level: self.level,
        }));
    }

    /// Lay out the controls visible in the current state
    fn rebuild_controls(&mut self) {
        let w = self.tuning.field_width;
        let h = self.tuning.field_height;
        let mid = Vec2::new(w / 2.0, h / 2.0);
        let button = Vec2::splat(100.0);

        let mut controls = ControlTable::new();
        match self.state {
            SessionState::Active => {
                controls.add(
                    Rect::from_center(Vec2::new(40.0, h - 100.0), Vec2::splat(60.0)),
                    GameCommand::TogglePause,
                );
            }
            SessionState::Paused => {
                controls.add(
                    Rect::from_center(Vec2::new(40.0, h - 100.0), Vec2::splat(60.0)),
                    GameCommand::TogglePause,
                );
                controls.add(Rect::from_center(mid + Vec2::new(110.0, 0.0), button), GameCommand::Resume);
                controls.add(Rect::from_center(mid, button), GameCommand::Restart);
                controls.add(Rect::from_center(mid - Vec2::new(110.0, 0.0), button), GameCommand::Menu);
            }
            SessionState::Failed => {
                controls.add(Rect::from_center(mid + Vec2::new(55.0, -200.0), button), GameCommand::Restart);
                controls.add(Rect::from_center(mid + Vec2::new(-55.0, -200.0), button), GameCommand::Menu);
            }
            SessionState::Completed => {
                controls.add(Rect::from_center(mid + Vec2::new(70.0, -200.0), button), GameCommand::NextLevel);
                controls.add(Rect::from_center(mid + Vec2::new(-70.0, -200.0), button), GameCommand::Menu);
            }
        }
        self.controls = controls;
    }

    // === Accessors ===

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn score(&self) -> u64 {
        self.counters.score
    }

    pub fn cut_ratio(&self) -> f64 {
        self.counters.cut_ratio()
    }

    /// Stars earned, once completed
    pub fn stars(&self) -> Option<u8> {
        self.stars
    }

    pub fn failure(&self) -> Option<FailureCause> {
        self.failure
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn controls(&self) -> &ControlTable<GameCommand> {
        &self.controls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether a swipe is currently being tracked
    pub fn is_swiping(&self) -> bool {
        self.last_pointer.is_some()
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
