#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hopscroll.
//!
//! The [`World`] aggregate owns the platform strip, the scroll counter, the
//! player, the score and the game state. [`apply`] is the only writer; systems
//! read through [`query`] and answer with new commands.

mod strip;

use hopscroll_core::{
    scroll::MAX_SCROLL_STEP, Command, Event, GameState, PlayerState, ScoreSnapshot, ScrollOffset,
};
use tracing::{debug, info, warn};

use self::strip::PlatformStrip;

/// Represents the authoritative Hopscroll world state.
#[derive(Debug)]
pub struct World {
    strip: PlatformStrip,
    scroll: ScrollOffset,
    climbed: u64,
    player: PlayerState,
    score: ScoreSnapshot,
    state: GameState,
    run: u32,
}

impl World {
    /// Creates an empty world waiting for its first [`Command::ResetRun`].
    ///
    /// The strip holds no generated rows until the reset has been applied and
    /// the generator has populated it.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip: PlatformStrip::new(),
            scroll: ScrollOffset::ZERO,
            climbed: 0,
            player: PlayerState::spawn(0),
            score: ScoreSnapshot::default(),
            state: GameState::ResetPending,
            run: 0,
        }
    }

    fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Player, scroll, item and score commands are ignored unless the world is
/// [`GameState::Playing`], which freezes the run once it has ended.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlacePlatform { row, platform } => {
            world.strip.set(row, platform);
            out_events.push(Event::PlatformPlaced { row, platform });
        }
        Command::MovePlayer { player, landed_on } => {
            if !world.is_playing() {
                return;
            }
            world.player = player;
            out_events.push(Event::PlayerMoved { player });
            if let Some(row) = landed_on {
                out_events.push(Event::PlayerLanded { row });
            }
        }
        Command::CollectItem { row } => {
            if !world.is_playing() || !world.strip.take_item(row) {
                return;
            }
            world.score.items = world.score.items.saturating_add(1);
            out_events.push(Event::ItemCollected {
                row,
                items: world.score.items,
            });
        }
        Command::AdvanceScroll { pixels } => {
            if !world.is_playing() {
                return;
            }
            let pixels = pixels.min(MAX_SCROLL_STEP);
            if pixels == 0 {
                return;
            }
            let before = world.scroll;
            world.scroll = before.advanced(pixels);
            world.climbed = world.climbed.saturating_add(u64::from(pixels));
            out_events.push(Event::ScrollAdvanced {
                pixels,
                scroll: world.scroll,
            });
            for row in before.rows_crossing_trailing_edge(pixels) {
                out_events.push(Event::RowRecycled { row });
            }
        }
        Command::AccrueScore { points, record } => {
            if !world.is_playing() || record <= world.score.previous_max_height {
                return;
            }
            debug_assert_eq!(points, record - world.score.previous_max_height);
            world.score.total = world.score.total.saturating_add(points);
            world.score.previous_max_height = record;
            out_events.push(Event::ScoreAccrued {
                points,
                total: world.score.total,
            });
        }
        Command::Transition { trigger } => {
            let from = world.state;
            match from.transition(trigger) {
                Some(to) => {
                    info!(?from, ?to, ?trigger, "game state changed");
                    world.state = to;
                    out_events.push(Event::StateChanged { from, to });
                }
                None => {
                    debug!(state = ?from, ?trigger, "transition rejected");
                    out_events.push(Event::TransitionRejected {
                        state: from,
                        trigger,
                    });
                }
            }
        }
        Command::ResetRun { player } => {
            if world.state != GameState::ResetPending {
                warn!(state = ?world.state, "reset requested outside of ResetPending");
                return;
            }
            world.strip.clear();
            world.scroll = ScrollOffset::ZERO;
            world.climbed = 0;
            world.score = ScoreSnapshot::default();
            world.player = player;
            world.run = world.run.saturating_add(1);
            info!(run = world.run, "run reset");
            out_events.push(Event::RunReset { run: world.run });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use hopscroll_core::{
        GameState, Platform, PlayerState, ScoreSnapshot, ScrollOffset, StripRow, StripView,
        PLAYER_START_Y,
    };

    use super::World;

    /// Captures a read-only view of every platform in the strip.
    #[must_use]
    pub fn strip_view(world: &World) -> StripView<'_> {
        world.strip.view()
    }

    /// Platform stored in the provided row.
    #[must_use]
    pub fn platform(world: &World, row: StripRow) -> Platform {
        world.strip.get(row)
    }

    /// Number of times the row has been generated since the last reset.
    #[must_use]
    pub fn row_generations(world: &World, row: StripRow) -> u32 {
        world.strip.generations(row)
    }

    /// Current camera offset.
    #[must_use]
    pub fn scroll(world: &World) -> ScrollOffset {
        world.scroll
    }

    /// Total pixels climbed by the camera during the current run, unwrapped.
    #[must_use]
    pub fn climbed(world: &World) -> u64 {
        world.climbed
    }

    /// Player trajectory state.
    #[must_use]
    pub fn player(world: &World) -> PlayerState {
        world.player
    }

    /// Score tracker snapshot.
    #[must_use]
    pub fn score(world: &World) -> ScoreSnapshot {
        world.score
    }

    /// Current game state.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Sequence number of the current run; zero before the first reset.
    #[must_use]
    pub fn run(world: &World) -> u32 {
        world.run
    }

    /// Height of the player above the spawn line, in pixels.
    ///
    /// Combines the unwrapped camera climb with the player's offset from the
    /// spawn row and saturates at zero below it.
    #[must_use]
    pub fn height(world: &World) -> u32 {
        let above_spawn = i64::from(PLAYER_START_Y) - i64::from(world.player.y);
        let climbed = i64::try_from(world.climbed).unwrap_or(i64::MAX);
        let height = climbed.saturating_add(above_spawn).max(0);
        u32::try_from(height).unwrap_or(u32::MAX)
    }
}
