use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use hopscroll_core::{
    Controls, Event, GameState, Platform, PlayerState, ScoreSnapshot, ScrollOffset, Steering,
    StripRow, Trigger, Tuning,
};
use hopscroll_system_session::{Config, Session};
use hopscroll_world::query;

const SEED: u64 = 0x4d59_5df4_d0f3_3173;
const FRAME_LIMIT: usize = 2_000;

fn steer(steering: Steering) -> Controls {
    Controls {
        steering,
        restart: false,
    }
}

fn restart() -> Controls {
    Controls {
        steering: Steering::None,
        restart: true,
    }
}

/// Holds right until the player sits past every legal platform span and
/// drops below the screen.
fn fall_off(session: &mut Session) {
    for _ in 0..FRAME_LIMIT {
        let report = session.step(steer(Steering::Right));
        if report.state != GameState::Playing {
            assert!(report.events.contains(&Event::StateChanged {
                from: GameState::Playing,
                to: GameState::Falling,
            }));
            return;
        }
    }
    panic!("player never left the screen");
}

#[test]
fn dropping_off_the_screen_ends_and_down_restarts_the_run() {
    let mut session = Session::new(Config::new(Tuning::default(), SEED));
    fall_off(&mut session);
    assert_eq!(query::game_state(session.world()), GameState::Falling);
    assert!(query::player(session.world()).y > 208);

    let report = session.step(steer(Steering::None));
    assert_eq!(report.state, GameState::GameOver);
    assert_eq!(
        report.events,
        vec![Event::StateChanged {
            from: GameState::Falling,
            to: GameState::GameOver,
        }]
    );

    let frozen = query::player(session.world());
    let report = session.step(steer(Steering::Left));
    assert_eq!(report.state, GameState::GameOver);
    assert!(report.events.is_empty());
    assert_eq!(query::player(session.world()), frozen);

    let report = session.step(restart());
    assert!(report.restarted());
    assert_eq!(report.state, GameState::Playing);

    let world = session.world();
    assert_eq!(query::run(world), 2);
    assert_eq!(query::score(world), ScoreSnapshot::default());
    assert_eq!(query::scroll(world), ScrollOffset::ZERO);
    assert_eq!(query::player(world), PlayerState::spawn(9));
}

#[test]
fn down_restarts_straight_from_falling() {
    let mut session = Session::new(Config::new(Tuning::default(), SEED));
    fall_off(&mut session);

    let report = session.step(restart());

    let transitions: Vec<(GameState, GameState)> = report
        .events
        .iter()
        .filter_map(|event| match event {
            Event::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (GameState::Falling, GameState::ResetPending),
            (GameState::ResetPending, GameState::Playing),
        ]
    );
    assert!(!report.events.contains(&Event::TransitionRejected {
        state: GameState::Falling,
        trigger: Trigger::Restart,
    }));
}

#[test]
fn every_row_is_generated_before_it_can_be_read() {
    let mut session = Session::new(Config::new(Tuning::default(), SEED));
    for frame in 0..600 {
        let steering = if (frame / 25) % 2 == 0 {
            Steering::Left
        } else {
            Steering::Right
        };
        let _ = session.step(Controls {
            steering,
            restart: true,
        });
        let world = session.world();
        for row in StripRow::all() {
            assert!(
                query::row_generations(world, row) >= 1,
                "row {} unread at frame {frame}",
                row.get()
            );
        }
        for (row, platform) in query::strip_view(world).iter() {
            assert!(
                !platform.is_present() || (3..27).contains(&platform.column()),
                "row {} column {}",
                row.get(),
                platform.column()
            );
        }
    }
}

#[test]
fn score_never_decreases_within_a_run() {
    let mut session = Session::new(Config::new(Tuning::default(), SEED));
    let mut previous = query::score(session.world());

    for frame in 0..FRAME_LIMIT {
        let steering = match frame % 40 {
            0..=14 => Steering::Left,
            15..=29 => Steering::Right,
            _ => Steering::None,
        };
        let report = session.step(steer(steering));
        let score = query::score(session.world());
        assert!(score.total >= previous.total, "score dropped at frame {frame}");
        assert_eq!(score.total, score.previous_max_height);
        previous = score;
        if report.state != GameState::Playing {
            break;
        }
    }
}

#[test]
fn recycled_rows_are_refilled_in_the_same_frame() {
    let mut session = Session::new(Config::new(Tuning::default(), SEED));

    for frame in 0..FRAME_LIMIT {
        let steering = if frame % 16 < 8 {
            Steering::Left
        } else {
            Steering::Right
        };
        let report = session.step(steer(steering));
        let recycled: Vec<StripRow> = report
            .events
            .iter()
            .filter_map(|event| match event {
                Event::RowRecycled { row } => Some(*row),
                _ => None,
            })
            .collect();
        let placed: Vec<StripRow> = report
            .events
            .iter()
            .filter_map(|event| match event {
                Event::PlatformPlaced { row, .. } => Some(*row),
                _ => None,
            })
            .collect();
        assert_eq!(recycled, placed);
        if report.state != GameState::Playing {
            break;
        }
    }
}

#[test]
fn deterministic_replay_produces_identical_frames() {
    let first = replay(SEED);
    let second = replay(SEED);
    assert_eq!(first, second, "replay diverged between runs");

    let other = replay(SEED ^ 0xff);
    assert_ne!(first.fingerprint(), other.fingerprint());
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut session = Session::new(Config::new(Tuning::default(), seed));
    let mut frames = Vec::new();

    for frame in 0..1_500 {
        let controls = Controls {
            steering: match frame % 30 {
                0..=9 => Steering::Left,
                10..=19 => Steering::None,
                _ => Steering::Right,
            },
            restart: frame % 7 == 0,
        };
        let report = session.step(controls);
        let world = session.world();
        frames.push(FrameState {
            state: report.state,
            player: query::player(world),
            score: query::score(world),
            scroll: query::scroll(world),
            run: query::run(world),
            strip: query::strip_view(world).to_array().to_vec(),
        });
    }

    ReplayOutcome { frames }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    frames: Vec<FrameState>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct FrameState {
    state: GameState,
    player: PlayerState,
    score: ScoreSnapshot,
    scroll: ScrollOffset,
    run: u32,
    strip: Vec<Platform>,
}
