//! Coordinate mapping between strip rows, the wrapping scroll counter, and
//! screen pixels.
//!
//! Row `r` sits at strip pixel `r * TILE_SIZE`. Scrolling the camera up by
//! `s` pixels moves every row down the screen by `s`, so the projected top of
//! a row is `(r * TILE_SIZE + s) mod STRIP_PIXEL_HEIGHT`. Tops in
//! `[0, SCREEN_HEIGHT)` are visible; tops in `[SCREEN_HEIGHT,
//! STRIP_PIXEL_HEIGHT)` form the offscreen band, whose low end has just left
//! the screen (trailing edge) and whose high end is about to enter from the
//! top (leading edge). Every projection is derived from the counter on
//! demand.

use serde::{Deserialize, Serialize};

use crate::{StripRow, SCREEN_HEIGHT, STRIP_CAPACITY, STRIP_PIXEL_HEIGHT, TILE_SIZE};

/// Largest camera step accepted in a single advance.
///
/// Anything larger could carry a row across the whole offscreen band before
/// it is regenerated.
pub const MAX_SCROLL_STEP: u32 = (SCREEN_HEIGHT - TILE_SIZE) as u32;

/// Pixels scrolled since the run started, reduced modulo the strip height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollOffset(u32);

impl ScrollOffset {
    /// Offset at the start of a run.
    pub const ZERO: Self = Self(0);

    /// Creates an offset, reducing the provided pixel count into the strip.
    #[must_use]
    pub const fn new(pixels: u32) -> Self {
        Self(pixels % STRIP_PIXEL_HEIGHT as u32)
    }

    /// Offset in pixels, always below [`STRIP_PIXEL_HEIGHT`].
    #[must_use]
    pub const fn pixels(&self) -> u32 {
        self.0
    }

    /// Offset reached after the camera climbs by `pixels`.
    #[must_use]
    pub const fn advanced(self, pixels: u32) -> Self {
        Self::new(self.0 + pixels % STRIP_PIXEL_HEIGHT as u32)
    }

    /// Projected top of the row in `[0, STRIP_PIXEL_HEIGHT)`.
    #[must_use]
    pub const fn row_top(self, row: StripRow) -> i32 {
        (row.get() as i32 * TILE_SIZE + self.0 as i32).rem_euclid(STRIP_PIXEL_HEIGHT)
    }

    /// Every top the row can be observed at.
    ///
    /// A row within one tile of the seam yields two projections: the folded
    /// top and its copy on the other side of the strip height. The pair is the
    /// same whichever side of the seam the row currently sits on.
    #[must_use]
    pub const fn candidate_tops(self, row: StripRow) -> CandidateTops {
        let top = self.row_top(row);
        let twin = if top >= STRIP_PIXEL_HEIGHT - TILE_SIZE {
            Some(top - STRIP_PIXEL_HEIGHT)
        } else if top < TILE_SIZE {
            Some(top + STRIP_PIXEL_HEIGHT)
        } else {
            None
        };
        CandidateTops {
            primary: Some(top),
            twin,
        }
    }

    /// On-screen top of the row, or `None` while the row is offscreen.
    ///
    /// A row peeking in above the screen reports a negative top.
    #[must_use]
    pub fn screen_row_for(self, row: StripRow) -> Option<i32> {
        self.candidate_tops(row).find(|top| is_visible(*top))
    }

    /// Strip row whose band of pixels contains the screen coordinate `y`.
    #[must_use]
    pub const fn row_at_screen_y(self, y: i32) -> StripRow {
        let strip_y = (y - self.0 as i32).rem_euclid(STRIP_PIXEL_HEIGHT);
        StripRow::wrapping((strip_y / TILE_SIZE) as usize)
    }

    /// Rows whose top reaches the trailing edge while climbing `pixels`,
    /// ordered by the moment they cross.
    #[must_use]
    pub fn rows_crossing_trailing_edge(self, pixels: u32) -> Vec<StripRow> {
        let step = pixels.min(MAX_SCROLL_STEP) as i32;
        let mut crossing: Vec<(i32, StripRow)> = StripRow::all()
            .filter_map(|row| {
                let distance = (SCREEN_HEIGHT - self.row_top(row)).rem_euclid(STRIP_PIXEL_HEIGHT);
                (distance >= 1 && distance <= step).then_some((distance, row))
            })
            .collect();
        crossing.sort_unstable();
        crossing.into_iter().map(|(_, row)| row).collect()
    }
}

/// Reports whether any part of a row with the provided top is on screen.
#[must_use]
pub const fn is_visible(top: i32) -> bool {
    top > -TILE_SIZE && top < SCREEN_HEIGHT
}

/// Up to two projected tops of a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateTops {
    primary: Option<i32>,
    twin: Option<i32>,
}

impl Iterator for CandidateTops {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.primary.take().or_else(|| self.twin.take())
    }
}

/// Number of rows that fit on the visible screen.
pub const VISIBLE_ROWS: usize = (SCREEN_HEIGHT / TILE_SIZE) as usize;

const _: () = assert!(VISIBLE_ROWS < STRIP_CAPACITY);

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize) -> StripRow {
        StripRow::new(index).expect("row in range")
    }

    #[test]
    fn offsets_wrap_at_strip_height() {
        assert_eq!(ScrollOffset::new(480).pixels(), 0);
        assert_eq!(ScrollOffset::new(479).advanced(2).pixels(), 1);
    }

    #[test]
    fn rows_project_downward_as_the_camera_climbs() {
        let scroll = ScrollOffset::new(4);
        assert_eq!(scroll.row_top(row(25)), 204);
        assert_eq!(scroll.screen_row_for(row(25)), Some(204));
        assert_eq!(scroll.screen_row_for(row(30)), None);
    }

    #[test]
    fn seam_rows_expose_both_projections() {
        let scroll = ScrollOffset::new(10);
        let tops: Vec<i32> = scroll.candidate_tops(row(59)).collect();
        assert_eq!(tops, vec![2, 482]);

        let scroll = ScrollOffset::new(5);
        let tops: Vec<i32> = scroll.candidate_tops(row(59)).collect();
        assert_eq!(tops, vec![477, -3]);
        assert_eq!(scroll.screen_row_for(row(59)), Some(-3));
    }

    #[test]
    fn projection_moves_one_pixel_per_scroll_pixel_across_the_seam() {
        for start in 0..STRIP_PIXEL_HEIGHT as u32 {
            let before = ScrollOffset::new(start);
            let after = before.advanced(1);
            for strip_row in StripRow::all() {
                if let (Some(a), Some(b)) = (
                    before.screen_row_for(strip_row),
                    after.screen_row_for(strip_row),
                ) {
                    assert_eq!(b - a, 1, "row {strip_row:?} at scroll {start}");
                }
                let folded = (before.row_top(strip_row) + 1).rem_euclid(STRIP_PIXEL_HEIGHT);
                assert_eq!(after.row_top(strip_row), folded);
            }
        }
    }

    #[test]
    fn screen_y_maps_back_to_the_projected_row() {
        for pixels in [0, 3, 236, 477, 479] {
            let scroll = ScrollOffset::new(pixels);
            for strip_row in StripRow::all() {
                let top = scroll.row_top(strip_row);
                assert_eq!(scroll.row_at_screen_y(top), strip_row);
                assert_eq!(scroll.row_at_screen_y(top + TILE_SIZE - 1), strip_row);
            }
        }
    }

    #[test]
    fn nine_pixel_climb_from_rest_recycles_exactly_one_row() {
        let recycled = ScrollOffset::ZERO.rows_crossing_trailing_edge(9);
        assert_eq!(recycled, vec![row(29)]);
    }

    #[test]
    fn recycled_rows_are_ordered_by_crossing() {
        let recycled = ScrollOffset::new(3).rows_crossing_trailing_edge(21);
        assert_eq!(recycled, vec![row(29), row(28), row(27)]);
    }

    #[test]
    fn every_row_recycles_once_per_strip_lap() {
        let mut counts = [0u32; STRIP_CAPACITY];
        let mut scroll = ScrollOffset::ZERO;
        let mut climbed = 0;
        while climbed < STRIP_PIXEL_HEIGHT as u32 {
            for recycled in scroll.rows_crossing_trailing_edge(7) {
                counts[recycled.get()] += 1;
            }
            scroll = scroll.advanced(7);
            climbed += 7;
        }
        assert!(counts.iter().all(|count| *count >= 1));
    }
}
