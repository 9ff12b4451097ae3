#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic trajectory system that integrates the bouncing player and
//! resolves landings against the platform strip.

use hopscroll_core::{
    Command, Facing, PhysicsTuning, Platform, PlayerState, ScrollOffset, Steering, StripRow,
    StripView, Trigger, Tuning, PLAYER_SIZE,
};

/// Result of integrating the player for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrajectoryOutcome {
    /// Player state after the frame, already placed on the scroll line.
    pub player: PlayerState,
    /// Strip row the player bounced off, if any.
    pub landed_on: Option<StripRow>,
    /// Row whose item should be collected, set when the landing platform
    /// carried one.
    pub collected: Option<StripRow>,
    /// Pixels the camera has to climb to keep the player on the scroll line.
    pub scroll_pixels: u32,
    /// Whether the player dropped below the bottom of the screen.
    pub fell_off: bool,
}

impl TrajectoryOutcome {
    /// Translates the outcome into world commands.
    ///
    /// The player move always comes first so the world has the new position
    /// before it scrolls or ends the run.
    pub fn into_commands(self, out: &mut Vec<Command>) {
        out.push(Command::MovePlayer {
            player: self.player,
            landed_on: self.landed_on,
        });
        if let Some(row) = self.collected {
            out.push(Command::CollectItem { row });
        }
        if self.scroll_pixels > 0 {
            out.push(Command::AdvanceScroll {
                pixels: self.scroll_pixels,
            });
        }
        if self.fell_off {
            out.push(Command::Transition {
                trigger: Trigger::FellOffScreen,
            });
        }
    }
}

/// Pure system that advances the player one frame at a time.
#[derive(Clone, Debug)]
pub struct Trajectory {
    physics: PhysicsTuning,
    trigger_y: i32,
}

impl Trajectory {
    /// Creates a trajectory system using the provided tuning.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            physics: tuning.physics.clone(),
            trigger_y: tuning.scroll.trigger_y,
        }
    }

    /// Integrates a single frame and emits the resulting commands.
    pub fn handle(
        &self,
        steering: Steering,
        player: PlayerState,
        scroll: ScrollOffset,
        strip: StripView<'_>,
        out: &mut Vec<Command>,
    ) {
        self.step(steering, player, scroll, strip).into_commands(out);
    }

    /// Integrates a single frame without touching the world.
    #[must_use]
    pub fn step(
        &self,
        steering: Steering,
        player: PlayerState,
        scroll: ScrollOffset,
        strip: StripView<'_>,
    ) -> TrajectoryOutcome {
        let physics = &self.physics;
        let mut player = player;

        player.x = player
            .x
            .saturating_add(steering.sign().saturating_mul(physics.horizontal_speed))
            .clamp(physics.min_x, physics.max_x);
        player.facing = match steering {
            Steering::Left => Facing::Left,
            Steering::Right => Facing::Right,
            Steering::None => player.facing,
        };

        player.vertical_velocity = player.vertical_velocity.saturating_add(physics.gravity);
        player.y = player.y.saturating_add(player.vertical_velocity);

        let mut landed_on = None;
        let mut collected = None;
        if player.vertical_velocity >= 0 {
            if let Some((row, platform)) = self.find_landing(&player, scroll, strip) {
                player.vertical_velocity = -physics.jump_velocity;
                landed_on = Some(row);
                if platform.has_item() {
                    collected = Some(row);
                }
            }
        }

        let mut scroll_pixels = 0;
        if player.y < self.trigger_y {
            scroll_pixels = self.trigger_y.abs_diff(player.y);
            player.y = self.trigger_y;
        }

        // A bounce below the bottom line still ends the run and collects nothing.
        let fell_off = player.y > physics.screen_bottom;
        if fell_off {
            collected = None;
        }

        TrajectoryOutcome {
            player,
            landed_on,
            collected,
            scroll_pixels,
            fell_off,
        }
    }

    /// First platform in strip order the player is standing on, if any.
    ///
    /// Every projection of a seam row is considered, so a platform straddling
    /// the seam is solid on both sides of it.
    #[must_use]
    pub fn find_landing(
        &self,
        player: &PlayerState,
        scroll: ScrollOffset,
        strip: StripView<'_>,
    ) -> Option<(StripRow, Platform)> {
        strip
            .iter()
            .filter(|(_, platform)| platform.is_present() && overlaps(player.x, platform))
            .find(|(row, _)| {
                scroll
                    .candidate_tops(*row)
                    .any(|top| top - self.physics.landing_band <= player.y && player.y <= top)
            })
    }
}

fn overlaps(x: i32, platform: &Platform) -> bool {
    let (left, right) = platform.landing_span();
    x < right && x + PLAYER_SIZE > left
}
