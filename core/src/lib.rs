#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hopscroll engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Coordinate mapping between strip rows and
//! screen pixels lives in [`scroll`] so every consumer projects rows the same
//! way.

pub mod scroll;
mod tuning;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use scroll::ScrollOffset;
pub use tuning::{GenerationTuning, PhysicsTuning, ScrollTuning, Tuning, TuningError};

/// Edge length of a single square tile measured in pixels.
pub const TILE_SIZE: i32 = 8;

/// Number of platform rows held by the circular strip.
pub const STRIP_CAPACITY: usize = 60;

/// Width of the strip measured in tiles.
pub const STRIP_WIDTH: u8 = 30;

/// Total height of the strip measured in pixels.
pub const STRIP_PIXEL_HEIGHT: i32 = STRIP_CAPACITY as i32 * TILE_SIZE;

/// Width of the visible screen in pixels.
pub const SCREEN_WIDTH: i32 = 256;

/// Height of the visible screen in pixels.
pub const SCREEN_HEIGHT: i32 = 240;

/// Edge length of the square player sprite in pixels.
pub const PLAYER_SIZE: i32 = 16;

/// Number of tiles drawn for every platform.
pub const PLATFORM_SPAN_TILES: u8 = 3;

/// Number of tiles of a platform that the player can land on.
pub const PLATFORM_COLLISION_TILES: u8 = 2;

/// Leftmost legal platform column.
pub const MIN_COLUMN: u8 = 3;

/// Exclusive upper bound of legal platform columns.
pub const MAX_COLUMN: u8 = STRIP_WIDTH - 3;

/// Strip row that always carries the starting platform.
pub const START_ROW: StripRow = StripRow(27);

/// Column of the guaranteed starting platform.
pub const START_COLUMN: u8 = 14;

/// Horizontal pixel position the player spawns at.
pub const PLAYER_START_X: i32 = 120;

/// Vertical pixel position the player spawns at.
pub const PLAYER_START_Y: i32 = 198;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Stores a freshly generated platform in the provided strip row.
    PlacePlatform {
        /// Strip row receiving the platform.
        row: StripRow,
        /// Platform generated for the row.
        platform: Platform,
    },
    /// Replaces the player's trajectory state after integration.
    MovePlayer {
        /// Player state produced by the trajectory system.
        player: PlayerState,
        /// Strip row the player bounced off this frame, if any.
        landed_on: Option<StripRow>,
    },
    /// Requests pickup of the item resting on the provided row's platform.
    CollectItem {
        /// Strip row whose platform carries the item.
        row: StripRow,
    },
    /// Advances the camera upward by the provided number of pixels.
    AdvanceScroll {
        /// Number of pixels the camera should climb.
        pixels: u32,
    },
    /// Adds points to the running total after a new height record.
    AccrueScore {
        /// Points gained since the previous record.
        points: u32,
        /// Height of the new record.
        record: u32,
    },
    /// Requests a game state transition.
    Transition {
        /// Trigger driving the transition.
        trigger: Trigger,
    },
    /// Clears the strip, zeroes the score, and repositions the player.
    ResetRun {
        /// Player state to spawn with.
        player: PlayerState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a platform was written into the strip.
    PlatformPlaced {
        /// Strip row that was written.
        row: StripRow,
        /// Platform stored in the row.
        platform: Platform,
    },
    /// Confirms that the player's trajectory state changed.
    PlayerMoved {
        /// Player state after the move.
        player: PlayerState,
    },
    /// Announces that the player bounced off a platform.
    PlayerLanded {
        /// Strip row the player bounced off.
        row: StripRow,
    },
    /// Confirms that an item was picked up.
    ItemCollected {
        /// Strip row that carried the item.
        row: StripRow,
        /// Number of items collected during the current run.
        items: u32,
    },
    /// Confirms that the camera climbed.
    ScrollAdvanced {
        /// Number of pixels scrolled this time.
        pixels: u32,
        /// Scroll offset after advancing.
        scroll: ScrollOffset,
    },
    /// Announces that a row crossed the trailing edge and needs regeneration.
    RowRecycled {
        /// Strip row that scrolled offscreen.
        row: StripRow,
    },
    /// Confirms that points were added to the score.
    ScoreAccrued {
        /// Points added by this record.
        points: u32,
        /// Running total after accrual.
        total: u32,
    },
    /// Announces that the game state changed.
    StateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// Reports that a transition was not legal from the current state.
    TransitionRejected {
        /// State the world remained in.
        state: GameState,
        /// Trigger that was rejected.
        trigger: Trigger,
    },
    /// Announces that the strip was cleared and a new run begins.
    RunReset {
        /// Sequence number of the new run, starting at one.
        run: u32,
    },
}

/// Index of a slot within the circular platform strip.
///
/// Values are always below [`STRIP_CAPACITY`], so indexing the strip with a
/// `StripRow` can never go out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StripRow(u8);

impl StripRow {
    /// Creates a strip row, returning `None` when the index exceeds the strip.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < STRIP_CAPACITY {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Creates a strip row by reducing the index modulo [`STRIP_CAPACITY`].
    #[must_use]
    pub const fn wrapping(index: usize) -> Self {
        Self((index % STRIP_CAPACITY) as u8)
    }

    /// Zero-based index of the row within the strip.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0 as usize
    }

    /// Row located `delta` slots after this one, wrapping across the seam.
    #[must_use]
    pub const fn offset(self, delta: usize) -> Self {
        Self::wrapping(self.get() + delta % STRIP_CAPACITY)
    }

    /// Iterator over every strip row in ascending index order.
    pub fn all() -> impl DoubleEndedIterator<Item = StripRow> {
        (0..STRIP_CAPACITY).map(Self::wrapping)
    }
}

impl TryFrom<u8> for StripRow {
    type Error = RowOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value)).ok_or(RowOutOfRange { index: value })
    }
}

impl From<StripRow> for u8 {
    fn from(row: StripRow) -> Self {
        row.0
    }
}

/// Error produced when a serialised strip row exceeds the strip capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowOutOfRange {
    /// Index that failed validation.
    pub index: u8,
}

impl fmt::Display for RowOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "strip row {} exceeds capacity {STRIP_CAPACITY}",
            self.index
        )
    }
}

impl std::error::Error for RowOutOfRange {}

/// Contents of a single strip slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    present: bool,
    column: u8,
    has_item: bool,
}

impl Platform {
    /// Slot without a platform.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            present: false,
            column: 0,
            has_item: false,
        }
    }

    /// Present platform whose leftmost tile sits in the provided column.
    #[must_use]
    pub const fn at(column: u8) -> Self {
        Self {
            present: true,
            column,
            has_item: false,
        }
    }

    /// Returns a copy carrying an item. Absent slots never carry items.
    #[must_use]
    pub const fn with_item(self, has_item: bool) -> Self {
        Self {
            has_item: has_item && self.present,
            ..self
        }
    }

    /// Returns a copy whose item has been removed.
    #[must_use]
    pub const fn without_item(self) -> Self {
        self.with_item(false)
    }

    /// Reports whether the slot holds a platform.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        self.present
    }

    /// Column of the platform's leftmost tile.
    #[must_use]
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Reports whether a collectible rests on the platform.
    #[must_use]
    pub const fn has_item(&self) -> bool {
        self.has_item
    }

    /// Horizontal pixel span `[left, right)` the player can land on.
    #[must_use]
    pub const fn landing_span(&self) -> (i32, i32) {
        let left = self.column as i32 * TILE_SIZE;
        (left, left + PLATFORM_COLLISION_TILES as i32 * TILE_SIZE)
    }
}

/// Read-only view of every platform in the strip.
#[derive(Clone, Copy, Debug)]
pub struct StripView<'a> {
    platforms: &'a [Platform; STRIP_CAPACITY],
}

impl<'a> StripView<'a> {
    /// Captures a view backed by the provided platform array.
    #[must_use]
    pub const fn new(platforms: &'a [Platform; STRIP_CAPACITY]) -> Self {
        Self { platforms }
    }

    /// Platform stored in the provided row.
    #[must_use]
    pub const fn platform(&self, row: StripRow) -> Platform {
        self.platforms[row.get()]
    }

    /// Iterator over every row and its platform in strip scan order.
    pub fn iter(&self) -> impl Iterator<Item = (StripRow, Platform)> + 'a {
        self.platforms
            .iter()
            .enumerate()
            .map(|(index, platform)| (StripRow::wrapping(index), *platform))
    }

    /// Copies the strip contents into an owned array.
    #[must_use]
    pub const fn to_array(&self) -> [Platform; STRIP_CAPACITY] {
        *self.platforms
    }
}

/// Direction the player sprite faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Sprite faces toward decreasing x.
    #[default]
    Left,
    /// Sprite faces toward increasing x.
    Right,
}

/// Horizontal steering requested for a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Steering {
    /// Steer toward decreasing x.
    Left,
    /// Keep the horizontal position.
    #[default]
    None,
    /// Steer toward increasing x.
    Right,
}

impl Steering {
    /// Signed unit step for the steering direction.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::None => 0,
            Self::Right => 1,
        }
    }

    /// Derives steering from held left and right buttons; both cancel out.
    #[must_use]
    pub const fn from_buttons(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            _ => Self::None,
        }
    }
}

/// Player controls sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Controls {
    /// Horizontal steering.
    pub steering: Steering,
    /// Whether the restart button (down) was pressed.
    pub restart: bool,
}

/// Trajectory state of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    /// Left edge of the sprite in screen pixels.
    pub x: i32,
    /// Vertical position in screen pixels, growing downward.
    pub y: i32,
    /// Vertical velocity in pixels per frame; negative values rise.
    pub vertical_velocity: i32,
    /// Direction the sprite faces.
    pub facing: Facing,
}

impl PlayerState {
    /// Player at the spawn point, already bouncing upward.
    #[must_use]
    pub const fn spawn(jump_velocity: i32) -> Self {
        Self {
            x: PLAYER_START_X,
            y: PLAYER_START_Y,
            vertical_velocity: -jump_velocity,
            facing: Facing::Left,
        }
    }

    /// Sprite frame index: `0` while rising, `1` while falling.
    #[must_use]
    pub const fn sprite_frame(&self) -> u8 {
        if self.vertical_velocity < 0 {
            0
        } else {
            1
        }
    }
}

/// Immutable snapshot of the score tracker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    /// Running total of points for the run.
    pub total: u32,
    /// Highest height reached so far this run.
    pub previous_max_height: u32,
    /// Number of collectibles picked up this run.
    pub items: u32,
}

/// Top-level state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Physics, scrolling and scoring are live.
    Playing,
    /// The player dropped below the screen; the world is frozen.
    Falling,
    /// The end screen was shown and the world waits for a restart.
    GameOver,
    /// The run is being reset.
    ResetPending,
}

/// Triggers that drive [`GameState`] transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    /// The player dropped below the bottom of the screen.
    FellOffScreen,
    /// The end screen was presented for one frame.
    EndScreenShown,
    /// The restart button was pressed.
    Restart,
    /// The strip, score and player were reset.
    ResetComplete,
}

impl GameState {
    /// Resolves the state reached by applying `trigger`, or `None` when the
    /// transition is not legal from the current state.
    #[must_use]
    pub const fn transition(self, trigger: Trigger) -> Option<Self> {
        match (self, trigger) {
            (Self::Playing, Trigger::FellOffScreen) => Some(Self::Falling),
            (Self::Falling, Trigger::EndScreenShown) => Some(Self::GameOver),
            (Self::Falling | Self::GameOver, Trigger::Restart) => Some(Self::ResetPending),
            (Self::ResetPending, Trigger::ResetComplete) => Some(Self::Playing),
            _ => None,
        }
    }

    /// Reports whether the run has ended and a restart is accepted.
    #[must_use]
    pub const fn awaits_restart(self) -> bool {
        matches!(self, Self::Falling | Self::GameOver)
    }
}

/// Source of bounded random bytes used by platform generation.
pub trait RandomSource {
    /// Draws a uniformly distributed byte.
    fn next_byte(&mut self) -> u8;

    /// Draws a value in `[low, high)`. Returns `low` when the range is empty.
    fn next_in_range(&mut self, low: u8, high: u8) -> u8;

    /// Restarts the sequence from the provided seed.
    fn reseed(&mut self, seed: u64);
}
