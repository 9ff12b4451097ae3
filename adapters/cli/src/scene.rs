use glam::Vec2;
use hopscroll_core::{scroll::is_visible, GameState};
use hopscroll_rendering::{
    format_score, EndScreen, ItemPresentation, PlatformPresentation, PlayerPresentation, Scene,
};
use hopscroll_world::{query, World};

/// Rebuilds the scene from the current world state.
///
/// Rows near the seam are drawn at whichever of their projections is on
/// screen, so platforms stay continuous as the strip wraps.
pub(crate) fn capture(world: &World, scene: &mut Scene) {
    scene.clear();

    let scroll = query::scroll(world);
    for (row, platform) in query::strip_view(world).iter() {
        if !platform.is_present() {
            continue;
        }
        for top in scroll.candidate_tops(row).filter(|top| is_visible(*top)) {
            let presentation = PlatformPresentation::new(platform.column(), top);
            if platform.has_item() {
                scene.items.push(ItemPresentation::above(&presentation));
            }
            scene.platforms.push(presentation);
        }
    }

    let player = query::player(world);
    scene.player = PlayerPresentation {
        position: Vec2::new(player.x as f32, player.y as f32),
        facing: player.facing,
        frame: player.sprite_frame(),
    };

    let score = query::score(world);
    scene.score_text = format_score(score.total);
    if query::game_state(world) == GameState::GameOver {
        scene.end_screen = Some(EndScreen::for_score(score.total));
    }
}
