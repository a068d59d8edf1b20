use space_defender::entities::*;

fn make_state() -> GameState {
    GameState {
        player: Some(PlayerShip { x: 400, y: 540 }),
        bullets: vec![Bullet { x: 10, y: 20 }],
        enemies: vec![Enemy { x: 30, y: 40 }, Enemy { x: 50, y: 60 }],
        score: 70,
        level: 1,
        ticks: 12,
        enemies_spawned: 2,
        shots_fired: 1,
        width: 800,
        height: 600,
    }
}

#[test]
fn input_state_tracks_each_direction_independently() {
    let mut input = InputState::default();
    input.set(Direction::Left, true);
    input.set(Direction::Up, true);
    assert!(input.is_pressed(Direction::Left));
    assert!(input.is_pressed(Direction::Up));
    assert!(!input.is_pressed(Direction::Right));
    assert!(!input.is_pressed(Direction::Down));

    input.set(Direction::Left, false);
    assert!(!input.left);
    assert!(input.up);

    input.clear();
    assert_eq!(input, InputState::default());
}

#[test]
fn game_state_clone_is_independent() {
    let original = make_state();
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player = None;
    cloned.score = 999;
    cloned.enemies.push(Enemy { x: 5, y: 5 });

    assert_eq!(original.player, Some(PlayerShip { x: 400, y: 540 }));
    assert_eq!(original.score, 70);
    assert_eq!(original.enemies.len(), 2);
}

#[test]
fn snapshot_copies_positions_in_list_order() {
    let state = make_state();
    let snap = Snapshot::from(&state);

    assert_eq!(snap.player, Some(Position { x: 400, y: 540 }));
    assert_eq!(snap.bullets, vec![Position { x: 10, y: 20 }]);
    assert_eq!(
        snap.enemies,
        vec![Position { x: 30, y: 40 }, Position { x: 50, y: 60 }]
    );
    assert_eq!(snap.score, 70);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.ticks, 12);
    assert_eq!((snap.width, snap.height), (800, 600));
}

#[test]
fn snapshot_serializes_to_json() {
    let snap = Snapshot::from(&make_state());
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["player"]["x"], 400);
    assert_eq!(json["enemies"][1]["y"], 60);
    assert_eq!(json["score"], 70);
}
