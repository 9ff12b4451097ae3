use hopscroll_core::{scroll::is_visible, Controls, PlayerState, Steering, PLAYER_SIZE};
use hopscroll_world::{query, World};

/// Horizontal slack, in pixels, inside which the autopilot stops steering.
const DEAD_ZONE: i32 = 2;

/// Chooses controls for a headless run.
///
/// A finished run is restarted immediately. Otherwise the player is steered
/// toward the centre of the closest platform it can still reach: the nearest
/// one above while rising, or the nearest one below while falling.
pub(crate) fn controls(world: &World) -> Controls {
    if query::game_state(world).awaits_restart() {
        return Controls {
            steering: Steering::None,
            restart: true,
        };
    }

    let player = query::player(world);
    Controls {
        steering: target_centre(world, &player).map_or(Steering::None, |centre| {
            steer_toward(player.x + PLAYER_SIZE / 2, centre)
        }),
        restart: false,
    }
}

fn target_centre(world: &World, player: &PlayerState) -> Option<i32> {
    let scroll = query::scroll(world);
    let mut above = None;
    let mut below = None;

    for (row, platform) in query::strip_view(world).iter() {
        if !platform.is_present() {
            continue;
        }
        let (left, right) = platform.landing_span();
        let centre = (left + right) / 2;
        for top in scroll.candidate_tops(row).filter(|top| is_visible(*top)) {
            let distance = top - player.y;
            let slot = if distance >= 0 { &mut below } else { &mut above };
            if slot.map_or(true, |(best, _)| distance.abs() < best) {
                *slot = Some((distance.abs(), centre));
            }
        }
    }

    let preferred = if player.vertical_velocity < 0 {
        above.or(below)
    } else {
        below
    };
    preferred.map(|(_, centre)| centre)
}

fn steer_toward(x: i32, target: i32) -> Steering {
    if x < target - DEAD_ZONE {
        Steering::Right
    } else if x > target + DEAD_ZONE {
        Steering::Left
    } else {
        Steering::None
    }
}
