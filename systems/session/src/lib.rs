#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame sequencer that drives the Hopscroll world and its systems.
//!
//! A [`Session`] owns the authoritative [`World`] together with every pure
//! system. Each call to [`Session::step`] consumes one frame of controls,
//! routes the resulting commands through [`hopscroll_world::apply`], and lets
//! the generator refill rows until the world settles.

use hopscroll_core::{Command, Controls, Event, GameState, PlayerState, Trigger, Tuning};
use hopscroll_system_generation::{Config as GeneratorConfig, Generator};
use hopscroll_system_scoring::Scoring;
use hopscroll_system_trajectory::Trajectory;
use hopscroll_world::{self as world, query, World};
use tracing::{debug, info};

/// Configuration parameters required to construct a session.
#[derive(Clone, Debug, Default)]
pub struct Config {
    tuning: Tuning,
    seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and level seed.
    #[must_use]
    pub const fn new(tuning: Tuning, seed: u64) -> Self {
        Self { tuning, seed }
    }
}

/// Summary of a single frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Game state once the frame settled.
    pub state: GameState,
    /// Every event the world broadcast during the frame, in order.
    pub events: Vec<Event>,
}

impl FrameReport {
    /// Reports whether a new run started during the frame.
    #[must_use]
    pub fn restarted(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, Event::RunReset { .. }))
    }
}

/// Owns the world and advances it one frame at a time.
#[derive(Debug)]
pub struct Session {
    world: World,
    generator: Generator,
    trajectory: Trajectory,
    scoring: Scoring,
    jump_velocity: i32,
}

impl Session {
    /// Creates a session and starts its first run.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let Config { tuning, seed } = config;
        let mut session = Self {
            world: World::new(),
            generator: Generator::new(GeneratorConfig::new(seed, tuning.generation.clone())),
            trajectory: Trajectory::new(&tuning),
            scoring: Scoring::new(),
            jump_velocity: tuning.physics.jump_velocity,
        };
        info!(seed, "session created");

        let mut events = Vec::new();
        session.reset(&mut events);
        session
    }

    /// Read-only access to the world for presentation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Advances the session by one frame.
    pub fn step(&mut self, controls: Controls) -> FrameReport {
        let mut events = Vec::new();
        let state = query::game_state(&self.world);

        match state {
            GameState::Playing => self.play(controls, &mut events),
            _ if state.awaits_restart() && controls.restart => {
                self.execute(
                    vec![Command::Transition {
                        trigger: Trigger::Restart,
                    }],
                    &mut events,
                );
                self.reset(&mut events);
            }
            GameState::Falling => self.execute(
                vec![Command::Transition {
                    trigger: Trigger::EndScreenShown,
                }],
                &mut events,
            ),
            GameState::GameOver => {}
            GameState::ResetPending => self.reset(&mut events),
        }

        FrameReport {
            state: query::game_state(&self.world),
            events,
        }
    }

    fn play(&mut self, controls: Controls, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.trajectory.handle(
            controls.steering,
            query::player(&self.world),
            query::scroll(&self.world),
            query::strip_view(&self.world),
            &mut commands,
        );
        self.execute(commands, events);

        let mut commands = Vec::new();
        self.scoring.handle(
            events,
            query::score(&self.world),
            query::height(&self.world),
            &mut commands,
        );
        self.execute(commands, events);
    }

    fn reset(&mut self, events: &mut Vec<Event>) {
        self.execute(
            vec![Command::ResetRun {
                player: PlayerState::spawn(self.jump_velocity),
            }],
            events,
        );
        self.execute(
            vec![Command::Transition {
                trigger: Trigger::ResetComplete,
            }],
            events,
        );
    }

    /// Applies commands and feeds the resulting events to the generator until
    /// no further commands are produced.
    fn execute(&mut self, commands: Vec<Command>, log: &mut Vec<Event>) {
        let mut pending = commands;
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            for event in &events {
                if let Event::RowRecycled { row } = event {
                    debug!(row = row.get(), "row recycled");
                }
            }
            self.generator
                .handle(&events, query::strip_view(&self.world), &mut pending);
            log.extend(events);
        }
    }
}
