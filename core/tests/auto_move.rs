use gloria_core::io::{self, MapData};
use gloria_core::types::{Penalty, PenaltyKind, Player, RETURN_TO_START};
use gloria_core::GameEngine;

fn corridor_engine() -> GameEngine {
    let data: MapData =
        serde_json::from_str(r#"{"name": "corridor", "grid": [[1, 2, 2, 2, 9]]}"#).unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.add_player(Player::new_human("P1", "Ana"));
    engine.add_player(Player::new_human("P2", "Rui"));
    engine
}

fn room_of(engine: &GameEngine, id: &str) -> String {
    engine
        .player(id)
        .and_then(|p| p.current_room.clone())
        .expect("player is placed")
}

#[test]
fn zero_steps_is_a_no_op() {
    let mut engine = corridor_engine();
    engine.apply_auto_move("P1", 0).unwrap();
    assert_eq!(room_of(&engine, "P1"), "0-0");
    assert_eq!(engine.player("P1").unwrap().log.len(), 0);
}

#[test]
fn positive_steps_walk_toward_the_goal() {
    let mut engine = corridor_engine();
    engine.apply_auto_move("P1", 2).unwrap();
    assert_eq!(room_of(&engine, "P1"), "2-0");
    // No movement points were involved.
    assert_eq!(engine.player("P1").unwrap().movement_points, 0);
}

#[test]
fn steps_are_capped_by_the_path_length() {
    let mut engine = corridor_engine();
    engine.apply_auto_move("P1", 99).unwrap();
    assert_eq!(room_of(&engine, "P1"), "4-0", "stops at the goal room");
}

#[test]
fn negative_steps_walk_toward_the_start() {
    let mut engine = corridor_engine();
    engine.apply_auto_move("P1", 3).unwrap();
    engine.apply_auto_move("P1", -2).unwrap();
    assert_eq!(room_of(&engine, "P1"), "1-0");
}

#[test]
fn return_to_start_sentinel_jumps_to_spawn() {
    let mut engine = corridor_engine();
    engine.apply_auto_move("P1", 3).unwrap();
    engine.apply_auto_move("P1", RETURN_TO_START).unwrap();
    assert_eq!(room_of(&engine, "P1"), "0-0");
}

#[test]
fn unknown_player_is_an_error_dead_end_is_not() {
    let mut engine = corridor_engine();
    assert!(engine.apply_auto_move("ghost", 2).is_err());

    // A map without a goal room gives forward auto-moves nowhere to go.
    let data: MapData =
        serde_json::from_str(r#"{"name": "no-goal", "grid": [[1, 2]]}"#).unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.add_player(Player::new_human("P1", "Ana"));
    engine.apply_auto_move("P1", 2).unwrap();
    assert_eq!(room_of(&engine, "P1"), "0-0", "no path, no movement");
}

// --- Penalties drive auto-movement ---

fn penalty_engine(penalty: Penalty) -> GameEngine {
    let data: MapData =
        serde_json::from_str(r#"{"name": "trap", "grid": [[1, 2, 4, 2, 9]]}"#).unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.set_penalties(vec![penalty]);
    engine.add_player(Player::new_human("P1", "Ana"));
    engine.add_player(Player::new_human("P2", "Rui"));
    engine
}

#[test]
fn retreat_penalty_pushes_the_victim_back() {
    let mut engine = penalty_engine(Penalty::new("Back two", PenaltyKind::Retreat, 2));
    engine.set_movement_points("P1", 2).unwrap();

    assert!(engine.try_move("P1", "1-0"));
    assert!(engine.try_move("P1", "2-0"), "landing on the penalty room");

    assert_eq!(room_of(&engine, "P1"), "0-0", "retreated toward the start");
}

#[test]
fn skip_penalty_sets_the_counter() {
    let mut engine = penalty_engine(Penalty::new("Sit out", PenaltyKind::SkipTurn, 2));
    engine.set_movement_points("P1", 2).unwrap();

    assert!(engine.try_move("P1", "1-0"));
    assert!(engine.try_move("P1", "2-0"));

    assert_eq!(engine.player("P1").unwrap().skip_turns, 2);
    assert_eq!(room_of(&engine, "P1"), "2-0", "skip does not relocate");
}

#[test]
fn benefit_penalty_advances_everyone_else() {
    let mut engine = penalty_engine(Penalty::new("Rivals gain", PenaltyKind::BenefitOpponents, 2));
    engine.set_movement_points("P1", 2).unwrap();

    assert!(engine.try_move("P1", "1-0"));
    assert!(engine.try_move("P1", "2-0"));

    assert_eq!(room_of(&engine, "P1"), "2-0", "the victim stays put");
    assert_eq!(room_of(&engine, "P2"), "2-0", "the opponent gained two rooms");
}

#[test]
fn penalty_fires_only_when_points_run_out() {
    let mut engine = penalty_engine(Penalty::new("Back two", PenaltyKind::Retreat, 2));
    engine.set_movement_points("P1", 3).unwrap();

    assert!(engine.try_move("P1", "1-0"));
    assert!(engine.try_move("P1", "2-0"));

    assert_eq!(
        room_of(&engine, "P1"),
        "2-0",
        "a point remains, the trap stays quiet"
    );
}
