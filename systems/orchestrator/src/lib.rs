#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed per-tick schedule that drives every Maze Chase system.
//!
//! The orchestrator owns the tick counter and the flee timer. Each call to
//! [`Orchestrator::step`] marks the player's tile as visited, checks the power
//! pellets and the flee timer, resolves contact and moves the player, then
//! toggles scatter mode and steers and moves every pursuit agent. All world
//! mutations go through [`maze_chase_world::apply`].

use maze_chase_core::{
    Actor, Command, Event, GhostKind, ScheduleTiming, DEATH_SEQUENCE_LENGTH, POWER_PELLETS,
};
use maze_chase_system_movement::Movement;
use maze_chase_system_pursuit::{Pursuit, PursuitContext};
use maze_chase_world::{self as world, query, World};

/// Ticks between two colour swaps while flee mode is ending.
pub const FLASH_PERIOD: u64 = 20;

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Ticks are still being processed.
    Running,
    /// The player's death sequence completed.
    Caught,
    /// The session was stopped through [`Orchestrator::request_quit`].
    Quit,
}

/// Visual state of the flee mode at the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FleePhase {
    /// Agents are dangerous on contact.
    Inactive,
    /// Agents are fleeing.
    Active,
    /// Agents are fleeing and currently flashing because the timer is running out.
    Ending,
}

/// Result of a single [`Orchestrator::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// The tick ran and the session continues.
    Continue,
    /// The session has ended; later steps do nothing.
    Ended,
}

/// Drives the systems in their fixed order once per tick.
#[derive(Debug)]
pub struct Orchestrator {
    timing: ScheduleTiming,
    tick: u64,
    flee_started_at: Option<u64>,
    fleeing: bool,
    status: SessionStatus,
    quit_requested: bool,
    movement: Movement,
    pursuit: Pursuit,
    commands: Vec<Command>,
}

impl Orchestrator {
    /// Creates an orchestrator at tick zero.
    #[must_use]
    pub fn new(timing: ScheduleTiming) -> Self {
        Self {
            timing,
            tick: 0,
            flee_started_at: None,
            fleeing: false,
            status: SessionStatus::Running,
            quit_requested: false,
            movement: Movement,
            pursuit: Pursuit,
            commands: Vec::new(),
        }
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Tick at which the most recent power pellet was entered.
    #[must_use]
    pub const fn flee_started_at(&self) -> Option<u64> {
        self.flee_started_at
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Flee state to present before the next tick runs.
    #[must_use]
    pub fn flee_phase(&self) -> FleePhase {
        if !self.fleeing {
            return FleePhase::Inactive;
        }
        let warning_from = self
            .flee_started_at
            .and_then(|start| start.checked_add(self.timing.flee_warning));
        let warning = warning_from.map_or(false, |from| self.tick > from);
        if warning && (self.tick / FLASH_PERIOD) % 2 == 0 {
            FleePhase::Ending
        } else {
            FleePhase::Active
        }
    }

    /// Requests the session to stop at the start of the next tick.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Runs one tick of the schedule against `world`.
    ///
    /// Events produced by the world are appended to `out_events`.
    pub fn step(&mut self, world: &mut World, out_events: &mut Vec<Event>) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Ended;
        }
        if self.quit_requested {
            self.status = SessionStatus::Quit;
            log::info!("session quit at tick {}", self.tick);
            return TickOutcome::Ended;
        }

        let tick = self.tick;
        self.update_visitation_and_flee(world, tick, out_events);
        self.update_player(world, tick, out_events);
        self.update_ghosts(world, tick, out_events);
        self.tick = tick.saturating_add(1);

        match self.status {
            SessionStatus::Running => TickOutcome::Continue,
            SessionStatus::Caught | SessionStatus::Quit => TickOutcome::Ended,
        }
    }

    fn update_visitation_and_flee(
        &mut self,
        world: &mut World,
        tick: u64,
        out_events: &mut Vec<Event>,
    ) {
        let player = query::player(world);
        let cell = query::board(world).clamp(player.motion.tile());
        self.dispatch(world, Command::MarkVisited { cell }, out_events);

        if POWER_PELLETS.contains(&cell) {
            self.dispatch(world, Command::SetFleeMode { active: true }, out_events);
            self.flee_started_at = Some(tick);
        }

        let expiry = self
            .flee_started_at
            .and_then(|start| start.checked_add(self.timing.flee_duration));
        if expiry == Some(tick) {
            self.dispatch(world, Command::SetFleeMode { active: false }, out_events);
        }
    }

    fn update_player(&mut self, world: &mut World, tick: u64, out_events: &mut Vec<Event>) {
        if !is_due(tick, self.timing.player_interval) {
            return;
        }

        let player = query::player(world);
        if player.is_dying() || caught_by_ghost(world) {
            self.dispatch(world, Command::CatchPlayer, out_events);
            if query::player(world).death_count >= DEATH_SEQUENCE_LENGTH {
                self.status = SessionStatus::Caught;
                log::info!("player caught; session ended at tick {tick}");
            }
            return;
        }

        self.movement.handle(
            Actor::Player,
            player.motion,
            query::board(world),
            &mut self.commands,
        );
        self.flush(world, out_events);
    }

    fn update_ghosts(&mut self, world: &mut World, tick: u64, out_events: &mut Vec<Event>) {
        if !is_due(tick, self.timing.ghost_interval) || query::player(world).is_dying() {
            return;
        }

        let chase_tick = tick.checked_add(self.timing.chase_offset);
        if is_due(tick, self.timing.scatter_period) {
            self.dispatch(world, Command::SetScatterMode { active: true }, out_events);
        } else if chase_tick.map_or(false, |value| is_due(value, self.timing.scatter_period)) {
            self.dispatch(world, Command::SetScatterMode { active: false }, out_events);
        }

        for kind in query::roster(world) {
            self.steer_ghost(world, kind);
            self.flush(world, out_events);

            if let Some(ghost) = query::ghost(world, kind) {
                self.movement.handle(
                    Actor::Ghost(kind),
                    ghost.motion,
                    query::board(world),
                    &mut self.commands,
                );
            }
            self.flush(world, out_events);
        }
    }

    fn steer_ghost(&mut self, world: &World, kind: GhostKind) {
        let Some(ghost) = query::ghost(world, kind) else {
            return;
        };
        let context = PursuitContext {
            board: query::board(world),
            player: query::player(world).motion,
            blinky: query::ghost(world, GhostKind::Blinky).map(|blinky| blinky.motion.position),
            anchor: query::config(world).inky_anchor,
        };
        self.pursuit.handle(&ghost, &context, &mut self.commands);
    }

    fn flush(&mut self, world: &mut World, out_events: &mut Vec<Event>) {
        let commands: Vec<Command> = self.commands.drain(..).collect();
        for command in commands {
            self.dispatch(world, command, out_events);
        }
    }

    fn dispatch(&mut self, world: &mut World, command: Command, out_events: &mut Vec<Event>) {
        let first_new = out_events.len();
        world::apply(world, command, out_events);

        for event in &out_events[first_new..] {
            match event {
                Event::ScatterModeChanged { active: true } => {
                    log::info!("tick {}: scatter", self.tick);
                }
                Event::ScatterModeChanged { active: false } => {
                    log::info!("tick {}: chase", self.tick);
                }
                Event::FleeModeChanged { active } => {
                    self.fleeing = *active;
                    if *active {
                        log::info!("tick {}: power pellet eaten, agents flee", self.tick);
                    } else {
                        log::info!("tick {}: flee mode over", self.tick);
                    }
                }
                Event::PlayerCaught { death_count } => {
                    log::debug!("tick {}: death sequence frame {death_count}", self.tick);
                }
                Event::TileVisited { cell } => {
                    log::trace!("tick {}: visited {cell:?}", self.tick);
                }
                Event::IntentQueued { .. }
                | Event::ActorTurned { .. }
                | Event::ActorMoved { .. } => {}
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(ScheduleTiming::default())
    }
}

/// Reports whether a schedule with the given interval runs on `tick`.
///
/// A zero interval never runs.
#[must_use]
pub fn is_due(tick: u64, interval: u64) -> bool {
    tick.checked_rem(interval) == Some(0)
}

fn caught_by_ghost(world: &World) -> bool {
    let player_tile = query::player(world).motion.tile();
    query::ghosts(world)
        .iter()
        .any(|ghost| !ghost.flee_mode && ghost.motion.tile() == player_tile)
}
