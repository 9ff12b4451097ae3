use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

use crate::{MAX_COLUMN, MIN_COLUMN, SCREEN_HEIGHT, STRIP_CAPACITY};

/// Aggregated tuning knobs for physics, scrolling and platform generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Player trajectory parameters.
    pub physics: PhysicsTuning,
    /// Camera parameters.
    pub scroll: ScrollTuning,
    /// Platform generation parameters.
    pub generation: GenerationTuning,
}

impl Tuning {
    /// Checks that every knob lies within the range the engine supports.
    pub fn validate(&self) -> Result<(), TuningError> {
        let physics = &self.physics;
        if physics.jump_velocity <= 0 {
            return Err(TuningError::NonPositiveJumpVelocity {
                jump_velocity: physics.jump_velocity,
            });
        }
        if physics.gravity <= 0 {
            return Err(TuningError::NonPositiveGravity {
                gravity: physics.gravity,
            });
        }
        if physics.landing_band < 0 {
            return Err(TuningError::NegativeLandingBand {
                landing_band: physics.landing_band,
            });
        }
        if physics.min_x >= physics.max_x {
            return Err(TuningError::EmptyHorizontalRange {
                min_x: physics.min_x,
                max_x: physics.max_x,
            });
        }
        if self.scroll.trigger_y <= 0 || self.scroll.trigger_y >= physics.screen_bottom {
            return Err(TuningError::TriggerOutsideScreen {
                trigger_y: self.scroll.trigger_y,
                screen_bottom: physics.screen_bottom,
            });
        }
        if physics.screen_bottom >= SCREEN_HEIGHT {
            return Err(TuningError::TriggerOutsideScreen {
                trigger_y: self.scroll.trigger_y,
                screen_bottom: physics.screen_bottom,
            });
        }
        let generation = &self.generation;
        if generation.item_odds == 0 {
            return Err(TuningError::ZeroItemOdds);
        }
        if usize::from(generation.declutter_rows) >= STRIP_CAPACITY {
            return Err(TuningError::DeclutterWindowTooLarge {
                rows: generation.declutter_rows,
            });
        }
        Ok(())
    }
}

/// Player trajectory parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicsTuning {
    /// Velocity added every frame, in pixels per frame.
    pub gravity: i32,
    /// Upward speed applied on every bounce.
    pub jump_velocity: i32,
    /// Horizontal pixels moved per frame while steering.
    pub horizontal_speed: i32,
    /// Height of the band above a platform top in which a landing registers.
    pub landing_band: i32,
    /// Leftmost x the player may occupy.
    pub min_x: i32,
    /// Rightmost x the player may occupy.
    pub max_x: i32,
    /// The run ends once the player's y exceeds this line.
    pub screen_bottom: i32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 1,
            jump_velocity: 9,
            horizontal_speed: 4,
            landing_band: 16,
            min_x: 16,
            max_x: 228,
            screen_bottom: 208,
        }
    }
}

/// Camera parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollTuning {
    /// The camera climbs whenever the player rises above this line.
    pub trigger_y: i32,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self { trigger_y: 110 }
    }
}

/// Platform generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationTuning {
    /// A row holds a platform when the drawn byte is at or below this value.
    pub presence_threshold: u8,
    /// A present platform carries an item with odds of one in `item_odds`.
    pub item_odds: u8,
    /// Number of previously generated rows inspected for overlap.
    pub declutter_rows: u8,
    /// Columns closer than or equal to this distance count as overlapping.
    pub declutter_tolerance: u8,
    /// Columns an overlapping platform is shifted toward the centre.
    pub declutter_nudge: u8,
}

impl GenerationTuning {
    /// Column at the horizontal centre of the legal platform span.
    #[must_use]
    pub const fn centre_column(&self) -> u8 {
        (MIN_COLUMN + MAX_COLUMN) / 2
    }
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            presence_threshold: 150,
            item_odds: 4,
            declutter_rows: 4,
            declutter_tolerance: 3,
            declutter_nudge: 4,
        }
    }
}

/// Reasons a tuning file may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TuningError {
    /// Bounces must move the player upward.
    NonPositiveJumpVelocity {
        /// Rejected jump velocity.
        jump_velocity: i32,
    },
    /// Gravity must pull the player downward.
    NonPositiveGravity {
        /// Rejected gravity.
        gravity: i32,
    },
    /// The landing band cannot be negative.
    NegativeLandingBand {
        /// Rejected band height.
        landing_band: i32,
    },
    /// The horizontal clamp range is empty.
    EmptyHorizontalRange {
        /// Rejected left bound.
        min_x: i32,
        /// Rejected right bound.
        max_x: i32,
    },
    /// The scroll trigger and the bottom line must both lie on screen, in order.
    TriggerOutsideScreen {
        /// Rejected trigger line.
        trigger_y: i32,
        /// Rejected bottom line.
        screen_bottom: i32,
    },
    /// Item odds of zero would divide the range away.
    ZeroItemOdds,
    /// The declutter window must be shorter than the strip.
    DeclutterWindowTooLarge {
        /// Rejected window length.
        rows: u8,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveJumpVelocity { jump_velocity } => {
                write!(f, "jump_velocity must be positive (received {jump_velocity})")
            }
            Self::NonPositiveGravity { gravity } => {
                write!(f, "gravity must be positive (received {gravity})")
            }
            Self::NegativeLandingBand { landing_band } => {
                write!(f, "landing_band must not be negative (received {landing_band})")
            }
            Self::EmptyHorizontalRange { min_x, max_x } => {
                write!(f, "min_x ({min_x}) must be below max_x ({max_x})")
            }
            Self::TriggerOutsideScreen {
                trigger_y,
                screen_bottom,
            } => write!(
                f,
                "expected 0 < trigger_y ({trigger_y}) < screen_bottom ({screen_bottom}) < {SCREEN_HEIGHT}"
            ),
            Self::ZeroItemOdds => write!(f, "item_odds must be at least 1"),
            Self::DeclutterWindowTooLarge { rows } => write!(
                f,
                "declutter_rows ({rows}) must be below the strip capacity {STRIP_CAPACITY}"
            ),
        }
    }
}

impl Error for TuningError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Tuning::default().validate(), Ok(()));
    }

    #[test]
    fn centre_column_sits_mid_span() {
        assert_eq!(GenerationTuning::default().centre_column(), 15);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [physics]
            jump_velocity = 10

            [generation]
            declutter_nudge = 2
            "#,
        )
        .expect("parse tuning");

        assert_eq!(tuning.physics.jump_velocity, 10);
        assert_eq!(tuning.physics.gravity, 1);
        assert_eq!(tuning.generation.declutter_nudge, 2);
        assert_eq!(tuning.scroll, ScrollTuning::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<Tuning, _> = toml::from_str("[physics]\nterminal_velocity = 4\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn validation_rejects_zero_item_odds() {
        let mut tuning = Tuning::default();
        tuning.generation.item_odds = 0;
        assert_eq!(tuning.validate(), Err(TuningError::ZeroItemOdds));
    }

    #[test]
    fn validation_rejects_trigger_below_bottom_line() {
        let mut tuning = Tuning::default();
        tuning.scroll.trigger_y = 220;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::TriggerOutsideScreen { trigger_y: 220, .. })
        ));
    }
}
