//! Drives a world and its orchestrator from frame inputs and scripted intents.

use maze_chase_core::{Command, Direction, Event};
use maze_chase_rendering::{FrameInput, Scene};
use maze_chase_system_orchestrator::{Orchestrator, SessionStatus, TickOutcome};
use maze_chase_world::{self as world, query, World};
use serde::Serialize;

use crate::intent_script::IntentScript;

/// Running session owned by the binary.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    orchestrator: Orchestrator,
    script: IntentScript,
    events: Vec<Event>,
}

impl Session {
    /// Wraps a freshly created world and orchestrator.
    pub(crate) fn new(world: World, orchestrator: Orchestrator, script: IntentScript) -> Self {
        Self {
            world,
            orchestrator,
            script,
            events: Vec::new(),
        }
    }

    /// Feeds one frame of input to the world and runs one tick.
    pub(crate) fn advance(&mut self, input: FrameInput) -> TickOutcome {
        self.events.clear();
        if input.quit_requested {
            self.orchestrator.request_quit();
        }

        let scripted: Vec<Direction> = self.script.at(self.orchestrator.tick()).collect();
        for direction in scripted.into_iter().chain(input.intent) {
            world::apply(
                &mut self.world,
                Command::SetIntent { direction },
                &mut self.events,
            );
        }

        self.orchestrator.step(&mut self.world, &mut self.events)
    }

    /// Runs up to `ticks` ticks without a display.
    pub(crate) fn run_headless(&mut self, ticks: u64) -> RunSummary {
        for _ in 0..ticks {
            if self.advance(FrameInput::default()) == TickOutcome::Ended {
                break;
            }
        }
        self.summary()
    }

    /// Runs one tick for a displayed frame and brings `scene` up to date.
    pub(crate) fn present_frame(&mut self, input: FrameInput, scene: &mut Scene) -> TickOutcome {
        let outcome = self.advance(input);
        scene.refresh(&self.world, &self.orchestrator);
        outcome
    }

    /// Builds a scene describing the current state.
    pub(crate) fn capture_scene(&self) -> Scene {
        Scene::capture(&self.world, &self.orchestrator)
    }

    /// Snapshot of the session outcome.
    pub(crate) fn summary(&self) -> RunSummary {
        let player = query::player(&self.world);
        let visited_tiles = query::board(&self.world)
            .iter()
            .filter(|(_, tile)| tile.is_visited())
            .count();
        RunSummary {
            ticks: self.orchestrator.tick(),
            status: status_label(self.orchestrator.status()),
            visited_tiles,
            death_count: player.death_count,
            player_x: player.motion.position.x(),
            player_y: player.motion.position.y(),
        }
    }
}

/// Outcome printed at the end of a headless run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct RunSummary {
    pub(crate) ticks: u64,
    pub(crate) status: &'static str,
    pub(crate) visited_tiles: usize,
    pub(crate) death_count: u8,
    pub(crate) player_x: i32,
    pub(crate) player_y: i32,
}

fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Running => "running",
        SessionStatus::Caught => "caught",
        SessionStatus::Quit => "quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::SessionConfig;

    fn session(script: &str) -> Session {
        let config = SessionConfig::default();
        Session::new(
            World::new(config),
            Orchestrator::new(config.timing),
            IntentScript::parse(script).expect("script parses"),
        )
    }

    #[test]
    fn headless_run_counts_ticks() {
        let summary = session("").run_headless(30);
        assert_eq!(summary.ticks, 30);
        assert_eq!(summary.status, "running");
        assert_eq!(summary.death_count, 0);
        assert!(summary.visited_tiles >= 1);
        assert_eq!(summary.player_y, 13);
        assert!(summary.player_x > 15);
    }

    #[test]
    fn scripted_intents_reach_the_player() {
        let mut scripted = session("0:left");
        let _ = scripted.advance(FrameInput::default());
        assert_eq!(
            query::player(&scripted.world).motion.next_turn,
            Some(Direction::Left)
        );
    }

    #[test]
    fn frame_quit_ends_the_session() {
        let mut session = session("");
        assert_eq!(session.advance(FrameInput::default()), TickOutcome::Continue);
        let quit = FrameInput {
            intent: None,
            quit_requested: true,
        };
        assert_eq!(session.advance(quit), TickOutcome::Ended);
        assert_eq!(session.summary().status, "quit");
        assert_eq!(session.summary().ticks, 1);
    }

    #[test]
    fn presented_frames_keep_the_scene_in_step() {
        let mut session = session("");
        let mut scene = session.capture_scene();

        let outcome = session.present_frame(FrameInput::default(), &mut scene);
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(scene.tick, 1);
        assert_eq!(scene.status, SessionStatus::Running);

        let quit = FrameInput {
            intent: None,
            quit_requested: true,
        };
        assert_eq!(session.present_frame(quit, &mut scene), TickOutcome::Ended);
        assert_eq!(scene.status, SessionStatus::Quit);
        assert_eq!(scene.tick, 1);
    }
}
