#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Hopscroll.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The native 256x240 screen is scaled uniformly to fit the window and
//! letterboxed; anything drawn outside the native screen is covered by the
//! bars.

use std::{f32::consts::PI, time::Duration};

use anyhow::Result;
use glam::Vec2;
use hopscroll_core::{Facing, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use hopscroll_rendering::{
    Color, FrameInput, Palette, PlayerPresentation, Presentation, RenderingBackend, Scene,
};
use macroquad::{
    color::BLACK,
    input::{is_key_down, is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
};
use tracing::info;

const HUD_FONT_SIZE: f32 = 8.0;
const EYE_SIZE: f32 = 4.0;

/// Raw key observations gathered during a single frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyObservations {
    /// Left arrow or `A` is held.
    pub left_held: bool,
    /// Right arrow or `D` is held.
    pub right_held: bool,
    /// Down arrow or `S` went down this frame.
    pub down_pressed: bool,
    /// `Escape` or `Q` went down this frame.
    pub quit_pressed: bool,
}

impl KeyObservations {
    fn poll() -> Self {
        Self {
            left_held: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right_held: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            down_pressed: is_key_pressed(KeyCode::Down) || is_key_pressed(KeyCode::S),
            quit_pressed: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }

    /// Input forwarded to the simulation.
    #[must_use]
    pub const fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.left_held,
            right: self.right_held,
            down: self.down_pressed,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            palette,
            viewport,
            scene,
        } = presentation;

        let (window_width, window_height) = viewport.window_size();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keys = KeyObservations::poll();
                if keys.quit_pressed {
                    break;
                }

                update_scene(keys.frame_input(), &mut scene);

                macroquad::window::clear_background(BLACK);
                let metrics = SceneMetrics::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_backdrop(&metrics, background);
                draw_platforms(&scene, &metrics, &palette);
                draw_items(&scene, &metrics, &palette);
                draw_player(&scene.player, &metrics, &palette);
                draw_letterbox(&metrics);
                draw_hud(&scene, &metrics, &palette);

                let frame = Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                if let Some(per_second) = fps_counter.record_frame(frame) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Uniform scale and offsets placing the native screen inside the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    window: Vec2,
}

impl SceneMetrics {
    fn new(window_width: f32, window_height: f32) -> Self {
        let native = Vec2::new(SCREEN_WIDTH as f32, SCREEN_HEIGHT as f32);
        let window = Vec2::new(window_width.max(0.0), window_height.max(0.0));
        let scale = (window.x / native.x).min(window.y / native.y).max(0.0);
        let offset = (window - native * scale) * 0.5;
        Self {
            scale,
            offset,
            window,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        self.offset + position * self.scale
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }

    /// Rectangles covering the window outside the native screen.
    fn letterbox(&self) -> [(Vec2, Vec2); 4] {
        let native = Vec2::new(SCREEN_WIDTH as f32, SCREEN_HEIGHT as f32) * self.scale;
        let right = self.offset.x + native.x;
        let bottom = self.offset.y + native.y;
        [
            (Vec2::ZERO, Vec2::new(self.window.x, self.offset.y)),
            (
                Vec2::new(0.0, bottom),
                Vec2::new(self.window.x, self.window.y - bottom),
            ),
            (Vec2::ZERO, Vec2::new(self.offset.x, self.window.y)),
            (
                Vec2::new(right, 0.0),
                Vec2::new(self.window.x - right, self.window.y),
            ),
        ]
    }
}

fn draw_backdrop(metrics: &SceneMetrics, background: macroquad::color::Color) {
    let origin = metrics.to_screen(Vec2::ZERO);
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        metrics.length(SCREEN_WIDTH as f32),
        metrics.length(SCREEN_HEIGHT as f32),
        background,
    );
}

fn draw_letterbox(metrics: &SceneMetrics) {
    for (origin, size) in metrics.letterbox() {
        if size.x > 0.0 && size.y > 0.0 {
            macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, BLACK);
        }
    }
}

fn draw_platforms(scene: &Scene, metrics: &SceneMetrics, palette: &Palette) {
    let fill = to_macroquad_color(palette.platform);
    let edge = to_macroquad_color(palette.platform.lighten(0.5));
    let tile = metrics.length(TILE_SIZE as f32);

    for platform in &scene.platforms {
        for index in 0..platform.span_tiles {
            let corner = metrics.to_screen(
                platform.position + Vec2::new(f32::from(index) * TILE_SIZE as f32, 0.0),
            );
            macroquad::shapes::draw_rectangle(corner.x, corner.y, tile, tile, fill);
            macroquad::shapes::draw_rectangle(corner.x, corner.y, tile, tile * 0.25, edge);
        }
    }
}

fn draw_items(scene: &Scene, metrics: &SceneMetrics, palette: &Palette) {
    let color = to_macroquad_color(palette.item);
    let half_tile = TILE_SIZE as f32 * 0.5;

    for item in &scene.items {
        let center = item.position + Vec2::splat(half_tile);
        let points = star_points(center, half_tile, half_tile * 0.4);
        let center = to_macroquad_vec2(metrics.to_screen(center));
        for index in 0..points.len() {
            let from = metrics.to_screen(points[index]);
            let to = metrics.to_screen(points[(index + 1) % points.len()]);
            macroquad::shapes::draw_triangle(
                center,
                to_macroquad_vec2(from),
                to_macroquad_vec2(to),
                color,
            );
        }
    }
}

fn draw_player(player: &PlayerPresentation, metrics: &SceneMetrics, palette: &Palette) {
    let corner = metrics.to_screen(player.position);
    let size = metrics.length(PlayerPresentation::SIZE);
    macroquad::shapes::draw_rectangle(
        corner.x,
        corner.y,
        size,
        size,
        to_macroquad_color(palette.player),
    );

    let eye = metrics.to_screen(player.position + eye_offset(player.facing, player.frame));
    let eye_size = metrics.length(EYE_SIZE);
    macroquad::shapes::draw_rectangle(
        eye.x,
        eye.y,
        eye_size,
        eye_size,
        to_macroquad_color(palette.player_eye),
    );
}

fn draw_hud(scene: &Scene, metrics: &SceneMetrics, palette: &Palette) {
    let color = to_macroquad_color(palette.text);
    let font_size = metrics.length(HUD_FONT_SIZE);

    let score = metrics.to_screen(Vec2::new(TILE_SIZE as f32, 2.0 * TILE_SIZE as f32));
    macroquad::text::draw_text(&scene.score_text, score.x, score.y, font_size, color);

    if let Some(end_screen) = &scene.end_screen {
        let line_height = 2.0 * TILE_SIZE as f32;
        let first_line = SCREEN_HEIGHT as f32 * 0.4;
        for (index, line) in end_screen.lines.iter().enumerate() {
            let dimensions =
                macroquad::text::measure_text(line, None, font_size.max(1.0) as u16, 1.0);
            let baseline = metrics.to_screen(Vec2::new(
                SCREEN_WIDTH as f32 * 0.5,
                first_line + index as f32 * line_height,
            ));
            macroquad::text::draw_text(
                line,
                baseline.x - dimensions.width * 0.5,
                baseline.y,
                font_size,
                color,
            );
        }
    }
}

/// Outer and inner vertices of a five-pointed star, alternating, starting
/// at the top point.
fn star_points(center: Vec2, outer: f32, inner: f32) -> [Vec2; 10] {
    let mut points = [Vec2::ZERO; 10];
    for (index, point) in points.iter_mut().enumerate() {
        let radius = if index % 2 == 0 { outer } else { inner };
        let angle = -PI * 0.5 + index as f32 * PI / 5.0;
        *point = center + Vec2::new(angle.cos(), angle.sin()) * radius;
    }
    points
}

/// Eye position inside the sprite: on the facing side, one pixel lower
/// while falling.
fn eye_offset(facing: Facing, frame: u8) -> Vec2 {
    let x = match facing {
        Facing::Left => 2.0,
        Facing::Right => PlayerPresentation::SIZE - 2.0 - EYE_SIZE,
    };
    Vec2::new(x, 4.0 + f32::from(frame.min(1)))
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the frame rate once a second has
    /// elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

fn to_macroquad_vec2(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}
