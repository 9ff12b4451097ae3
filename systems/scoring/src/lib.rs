#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic scoring system that turns new height records into points.

use hopscroll_core::{Command, Event, ScoreSnapshot};

/// Pure scoring system that reacts to player movement.
#[derive(Debug, Default)]
pub struct Scoring;

impl Scoring {
    /// Creates a new scoring system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and the player's current height to emit score
    /// accrual commands.
    ///
    /// Points are only awarded after the player or the camera moved, and only
    /// for the height gained above the previous record, so repeated calls with
    /// the same height add nothing.
    pub fn handle(
        &self,
        events: &[Event],
        score: ScoreSnapshot,
        height: u32,
        out: &mut Vec<Command>,
    ) {
        let moved = events.iter().any(|event| {
            matches!(
                event,
                Event::PlayerMoved { .. } | Event::ScrollAdvanced { .. }
            )
        });
        if !moved || height <= score.previous_max_height {
            return;
        }

        out.push(Command::AccrueScore {
            points: height - score.previous_max_height,
            record: height,
        });
    }
}
