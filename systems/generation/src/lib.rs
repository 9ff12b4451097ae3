#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic platform generator that refills strip rows.
//!
//! The generator owns no strip state. It reacts to [`Event::RunReset`] by
//! populating every row and to [`Event::RowRecycled`] by regenerating the row
//! that just left the screen, emitting [`Command::PlacePlatform`] for each.

mod rng;

use hopscroll_core::{
    Command, Event, GenerationTuning, Platform, RandomSource, StripRow, StripView, MAX_COLUMN,
    MIN_COLUMN, STRIP_CAPACITY, START_COLUMN, START_ROW,
};
use tracing::{debug, trace};

pub use rng::ChaChaSource;

const RUN_SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Configuration parameters required to construct the generator.
#[derive(Clone, Debug)]
pub struct Config {
    seed: u64,
    tuning: GenerationTuning,
}

impl Config {
    /// Creates a new configuration using the provided seed and tuning.
    #[must_use]
    pub const fn new(seed: u64, tuning: GenerationTuning) -> Self {
        Self { seed, tuning }
    }
}

/// Pure system that decides the contents of freshly exposed strip rows.
#[derive(Debug)]
pub struct Generator<R = ChaChaSource> {
    seed: u64,
    tuning: GenerationTuning,
    source: R,
}

impl Generator<ChaChaSource> {
    /// Creates a generator drawing from a ChaCha8 stream seeded by the config.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let source = ChaChaSource::seeded(config.seed);
        Self::with_source(config, source)
    }
}

impl<R: RandomSource> Generator<R> {
    /// Creates a generator drawing from the provided random source.
    #[must_use]
    pub fn with_source(config: Config, source: R) -> Self {
        Self {
            seed: config.seed,
            tuning: config.tuning,
            source,
        }
    }

    /// Consumes world events and emits placement commands for rows that need
    /// new contents.
    ///
    /// Rows produced by one call see each other: a scratch copy of the strip
    /// is updated as each row is decided, so later rows declutter against
    /// earlier ones even before the world applies the commands.
    pub fn handle(&mut self, events: &[Event], strip: StripView<'_>, out: &mut Vec<Command>) {
        let mut scratch: Option<[Platform; STRIP_CAPACITY]> = None;

        for event in events {
            match event {
                Event::RunReset { run } => {
                    self.source.reseed(run_seed(self.seed, *run));
                    let rows = scratch.insert([Platform::absent(); STRIP_CAPACITY]);
                    self.populate(rows, out);
                    debug!(run, "strip populated");
                }
                Event::RowRecycled { row } => {
                    let rows = scratch.get_or_insert_with(|| strip.to_array());
                    let platform = self.generate(*row, rows);
                    rows[row.get()] = platform;
                    trace!(row = row.get(), ?platform, "row regenerated");
                    out.push(Command::PlacePlatform {
                        row: *row,
                        platform,
                    });
                }
                _ => {}
            }
        }
    }

    /// Decides the contents of a single row.
    ///
    /// `strip` is consulted for the rows generated just before this one, which
    /// sit directly below it on screen.
    pub fn generate(&mut self, row: StripRow, strip: &[Platform; STRIP_CAPACITY]) -> Platform {
        if self.source.next_byte() > self.tuning.presence_threshold {
            return Platform::absent();
        }
        let column = self.source.next_in_range(MIN_COLUMN, MAX_COLUMN);
        let has_item = self.source.next_in_range(0, self.tuning.item_odds) == 0;
        let column = self.declutter(row, column, strip);
        Platform::at(column).with_item(has_item)
    }

    fn populate(&mut self, rows: &mut [Platform; STRIP_CAPACITY], out: &mut Vec<Command>) {
        // Descending order matches the order rows are recycled while climbing.
        for row in StripRow::all().rev() {
            let platform = if row == START_ROW {
                Platform::at(START_COLUMN)
            } else {
                self.generate(row, rows)
            };
            rows[row.get()] = platform;
            out.push(Command::PlacePlatform { row, platform });
        }
    }

    fn declutter(&self, row: StripRow, column: u8, strip: &[Platform; STRIP_CAPACITY]) -> u8 {
        let mut column = column;
        for distance in 1..=usize::from(self.tuning.declutter_rows) {
            let neighbour = strip[row.offset(distance).get()];
            if neighbour.is_present()
                && column.abs_diff(neighbour.column()) <= self.tuning.declutter_tolerance
            {
                column = self.nudge(column);
            }
        }
        column
    }

    fn nudge(&self, column: u8) -> u8 {
        let centre = self.tuning.centre_column();
        let nudge = self.tuning.declutter_nudge;
        let moved = if column > centre {
            column.saturating_sub(nudge)
        } else {
            column.saturating_add(nudge)
        };
        moved.clamp(MIN_COLUMN, MAX_COLUMN - 1)
    }
}

fn run_seed(seed: u64, run: u32) -> u64 {
    seed ^ u64::from(run).wrapping_mul(RUN_SEED_MIX)
}
