#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Hopscroll adapters.
//!
//! Scenes are expressed in native screen pixels (`SCREEN_WIDTH` by
//! `SCREEN_HEIGHT`); backends scale them to their window through a
//! [`Viewport`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use hopscroll_core::{
    Controls, Facing, Steering, PLATFORM_SPAN_TILES, PLAYER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH,
    TILE_SIZE,
};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used for each kind of scene element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Platform tiles.
    pub platform: Color,
    /// Collectible stars.
    pub item: Color,
    /// Player body.
    pub player: Color,
    /// Player eye, drawn on the facing side.
    pub player_eye: Color,
    /// HUD and end-screen text.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            platform: Color::from_rgb_u8(0xfc, 0xa0, 0x44),
            item: Color::from_rgb_u8(0xf8, 0xb8, 0x00),
            player: Color::from_rgb_u8(0xf8, 0x38, 0x00),
            player_eye: Color::from_rgb_u8(0xfc, 0xfc, 0xfc),
            text: Color::from_rgb_u8(0xfc, 0xfc, 0xfc),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Whether the left button is held.
    pub left: bool,
    /// Whether the right button is held.
    pub right: bool,
    /// Whether the down button was pressed this frame.
    pub down: bool,
}

impl FrameInput {
    /// Converts the raw buttons into simulation controls.
    #[must_use]
    pub const fn controls(&self) -> Controls {
        Controls {
            steering: Steering::from_buttons(self.left, self.right),
            restart: self.down,
        }
    }
}

/// Platform drawn at a projected screen position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformPresentation {
    /// Top-left corner in screen pixels; may sit partly above the screen.
    pub position: Vec2,
    /// Number of tiles drawn side by side.
    pub span_tiles: u8,
}

impl PlatformPresentation {
    /// Creates a platform of the standard drawn width.
    #[must_use]
    pub fn new(column: u8, top: i32) -> Self {
        Self {
            position: Vec2::new(f32::from(column) * TILE_SIZE as f32, top as f32),
            span_tiles: PLATFORM_SPAN_TILES,
        }
    }

    /// Width of the platform in screen pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        f32::from(self.span_tiles) * TILE_SIZE as f32
    }
}

/// Collectible star resting on a platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemPresentation {
    /// Top-left corner of the star's tile in screen pixels.
    pub position: Vec2,
}

impl ItemPresentation {
    /// Places a star one tile above the middle of a platform.
    #[must_use]
    pub fn above(platform: &PlatformPresentation) -> Self {
        Self {
            position: platform.position + Vec2::new(TILE_SIZE as f32, -(TILE_SIZE as f32)),
        }
    }
}

/// Player sprite state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Top-left corner in screen pixels.
    pub position: Vec2,
    /// Direction the sprite faces.
    pub facing: Facing,
    /// Animation frame, `0` while rising and `1` while falling.
    pub frame: u8,
}

impl Default for PlayerPresentation {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            facing: Facing::Left,
            frame: 0,
        }
    }
}

impl PlayerPresentation {
    /// Edge length of the sprite in screen pixels.
    pub const SIZE: f32 = PLAYER_SIZE as f32;
}

/// Text shown once a run has ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndScreen {
    /// Lines drawn top to bottom, centred horizontally.
    pub lines: Vec<String>,
}

impl EndScreen {
    /// Builds the end screen for the provided final score.
    #[must_use]
    pub fn for_score(total: u32) -> Self {
        Self {
            lines: vec![
                String::from("Game Over :("),
                format!("Score: {}", format_score(total)),
                String::from("Press down arrow to restart"),
            ],
        }
    }
}

/// Scene description combining platforms, items, the player and text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Platforms currently visible, including seam copies.
    pub platforms: Vec<PlatformPresentation>,
    /// Stars resting on visible platforms.
    pub items: Vec<ItemPresentation>,
    /// Player sprite.
    pub player: PlayerPresentation,
    /// Score shown in the HUD.
    pub score_text: String,
    /// End-of-run text, present only once the run has ended.
    pub end_screen: Option<EndScreen>,
}

impl Scene {
    /// Removes every element so the scene can be refilled without
    /// reallocating.
    pub fn clear(&mut self) {
        self.platforms.clear();
        self.items.clear();
        self.player = PlayerPresentation::default();
        self.score_text.clear();
        self.end_screen = None;
    }
}

/// Formats a score as decimal digits, zero-padded to at least five.
#[must_use]
pub fn format_score(total: u32) -> String {
    format!("{total:05}")
}

/// Integer enlargement of the native screen used to size the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    scale: u32,
}

impl Viewport {
    /// Scale used when none is requested.
    pub const DEFAULT_SCALE: u32 = 3;

    /// Creates a viewport enlarging every native pixel `scale` times.
    pub fn new(scale: u32) -> Result<Self, RenderingError> {
        if scale == 0 {
            return Err(RenderingError::InvalidScale { scale });
        }
        Ok(Self { scale })
    }

    /// Window size in pixels.
    #[must_use]
    pub fn window_size(&self) -> (i32, i32) {
        let scale = i32::try_from(self.scale).unwrap_or(i32::MAX);
        (
            SCREEN_WIDTH.saturating_mul(scale),
            SCREEN_HEIGHT.saturating_mul(scale),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Colors of the scene elements.
    pub palette: Palette,
    /// Native-to-window scaling.
    pub viewport: Viewport,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, viewport: Viewport, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            palette: Palette::default(),
            viewport,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Hopscroll scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure is called once per displayed frame
    /// with the input captured by the adapter, and refreshes the scene before
    /// it is drawn. The simulation advances exactly one step per call.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when describing a presentation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RenderingError {
    /// The window scale must be positive to produce a visible window.
    #[error("scale must be positive (received {scale})")]
    InvalidScale {
        /// Provided scale that failed validation.
        scale: u32,
    },
}
