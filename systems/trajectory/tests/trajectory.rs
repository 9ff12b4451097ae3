use hopscroll_core::{
    Command, Event, Facing, GameState, Platform, PlayerState, ScrollOffset, Steering, StripRow,
    Trigger, Tuning,
};
use hopscroll_system_trajectory::Trajectory;
use hopscroll_world::{self as world, query, World};

#[test]
fn landing_on_an_item_platform_collects_it_through_the_world() {
    let mut world = playing_world(PlayerState {
        x: 160,
        y: 184,
        vertical_velocity: 5,
        facing: Facing::Left,
    });
    place(&mut world, 24, Platform::at(19).with_item(true));

    let events = frame(&mut world, Steering::None);

    assert!(events.contains(&Event::PlayerLanded {
        row: StripRow::wrapping(24)
    }));
    assert!(events.contains(&Event::ItemCollected {
        row: StripRow::wrapping(24),
        items: 1,
    }));
    assert_eq!(query::player(&world).vertical_velocity, -9);
    assert!(!query::platform(&world, StripRow::wrapping(24)).has_item());
}

#[test]
fn climbing_past_the_trigger_recycles_the_trailing_row() {
    let mut world = playing_world(PlayerState {
        x: 120,
        y: 110,
        vertical_velocity: -10,
        facing: Facing::Left,
    });

    let events = frame(&mut world, Steering::None);

    assert_eq!(query::scroll(&world), ScrollOffset::new(9));
    assert_eq!(query::player(&world).y, 110);
    let recycled: Vec<StripRow> = events
        .iter()
        .filter_map(|event| match event {
            Event::RowRecycled { row } => Some(*row),
            _ => None,
        })
        .collect();
    assert_eq!(recycled, vec![StripRow::wrapping(29)]);
}

#[test]
fn falling_below_the_screen_freezes_the_world() {
    let mut world = playing_world(PlayerState {
        x: 120,
        y: 205,
        vertical_velocity: 3,
        facing: Facing::Left,
    });

    let events = frame(&mut world, Steering::Right);
    assert!(events.contains(&Event::StateChanged {
        from: GameState::Playing,
        to: GameState::Falling,
    }));

    let frozen = query::player(&world);
    let events = frame(&mut world, Steering::Right);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. })));
    assert_eq!(query::player(&world), frozen);
}

fn playing_world(player: PlayerState) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::ResetRun { player }, &mut events);
    world::apply(
        &mut world,
        Command::Transition {
            trigger: Trigger::ResetComplete,
        },
        &mut events,
    );
    world
}

fn place(world: &mut World, row: usize, platform: Platform) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::PlacePlatform {
            row: StripRow::wrapping(row),
            platform,
        },
        &mut events,
    );
}

fn frame(world: &mut World, steering: Steering) -> Vec<Event> {
    let trajectory = Trajectory::new(&Tuning::default());
    let mut commands = Vec::new();
    trajectory.handle(
        steering,
        query::player(world),
        query::scroll(world),
        query::strip_view(world),
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}
