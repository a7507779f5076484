use gloria_core::io::{self, MapData};
use gloria_core::logic::bots::{self, get_strategy};
use gloria_core::types::{BotDifficulty, BotKind, Player};
use gloria_core::{GameEngine, Labyrinth};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn build(map_json: &str) -> Labyrinth {
    let data: MapData = serde_json::from_str(map_json).unwrap();
    io::build_labyrinth(&data)
}

fn bot_at(kind: BotKind, room: &str) -> Player {
    let mut bot = Player::new_bot("B1", "Bot", kind);
    bot.move_to(room.to_string());
    bot
}

fn decide(labyrinth: &Labyrinth, bot: &Player) -> Option<String> {
    let mut rng = StdRng::seed_from_u64(42);
    get_strategy(bot.strategy.unwrap()).next_move(labyrinth, bot, 3, &mut rng)
}

/// Goal route locked, lever reachable below the start: the bot must head
/// for the lever, not bang on the locked door.
#[test]
fn shortest_path_bot_reroutes_toward_the_lever() {
    let labyrinth = build(
        r#"{
            "name": "blocked",
            "grid": [[1, 2, 9], [6, 0, 0]],
            "locked": [{"room_a": "1-0", "room_b": "2-0"}],
            "levers": [
                {"id": "L1", "room_id": "0-1", "door_room_a": "1-0", "door_room_b": "2-0"}
            ]
        }"#,
    );
    let bot = bot_at(BotKind::ShortestPath(BotDifficulty::Hard), "0-0");

    assert!(!bots::is_path_clear(&labyrinth, "0-0", "2-0"));
    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("0-1"));
}

#[test]
fn shortest_path_bot_takes_the_clear_route() {
    let labyrinth = build(r#"{"name": "open", "grid": [[1, 2, 2, 9]]}"#);
    let bot = bot_at(BotKind::ShortestPath(BotDifficulty::Hard), "0-0");

    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("1-0"));
}

#[test]
fn bot_at_the_goal_proposes_nothing() {
    let labyrinth = build(r#"{"name": "open", "grid": [[1, 2, 9]]}"#);
    let bot = bot_at(BotKind::ShortestPath(BotDifficulty::Hard), "2-0");

    assert_eq!(decide(&labyrinth, &bot), None);
}

#[test]
fn easy_bot_still_proposes_a_legal_move() {
    let labyrinth = build(r#"{"name": "open", "grid": [[1, 2, 2, 9]]}"#);
    let bot = bot_at(BotKind::ShortestPath(BotDifficulty::Easy), "1-0");

    // Plan or fumble, the proposal must be a room it can actually enter.
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let step = get_strategy(bot.strategy.unwrap())
            .next_move(&labyrinth, &bot, 3, &mut rng)
            .expect("an open neighbor always exists here");
        assert!(labyrinth.is_valid_move("1-0", &step), "illegal step {}", step);
    }
}

#[test]
fn coward_detours_around_a_penalty_room() {
    // Ideal step 1-0 is a penalty room; 0-1 is the safe detour.
    let labyrinth = build(
        r#"{
            "name": "scare",
            "grid": [[1, 4, 9], [2, 2, 2]]
        }"#,
    );
    let bot = bot_at(BotKind::Coward, "0-0");

    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("0-1"));
}

#[test]
fn cornered_coward_accepts_the_risky_step() {
    // Only route to the goal runs through the penalty room.
    let labyrinth = build(r#"{"name": "corner", "grid": [[1, 4, 9]]}"#);
    let bot = bot_at(BotKind::Coward, "0-0");

    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("1-0"));
}

#[test]
fn coward_follows_a_safe_ideal_step() {
    let labyrinth = build(r#"{"name": "open", "grid": [[1, 2, 4, 9]]}"#);
    let bot = bot_at(BotKind::Coward, "0-0");

    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("1-0"));
}

#[test]
fn explorer_hunts_the_nearest_lever_first() {
    let labyrinth = build(
        r#"{
            "name": "explore",
            "grid": [[1, 2, 9], [6, 0, 0]],
            "locked": [{"room_a": "1-0", "room_b": "2-0"}],
            "levers": [
                {"id": "L1", "room_id": "0-1", "door_room_a": "1-0", "door_room_b": "2-0"}
            ]
        }"#,
    );
    let bot = bot_at(BotKind::Explorer, "0-0");

    assert_eq!(decide(&labyrinth, &bot).as_deref(), Some("0-1"));
}

#[test]
fn explorer_heads_for_the_goal_once_levers_are_spent() {
    let mut labyrinth = build(
        r#"{
            "name": "explore",
            "grid": [[1, 2, 9], [6, 0, 0]],
            "levers": [
                {"id": "L1", "room_id": "0-1", "door_room_a": "1-0", "door_room_b": "2-0"}
            ]
        }"#,
    );
    // Activate the lone lever through the engine.
    let mut engine = GameEngine::new(labyrinth, 7);
    engine.add_player(Player::new_bot("B1", "Bot", BotKind::Explorer));
    engine.set_movement_points("B1", 1).unwrap();
    assert!(engine.try_move("B1", "0-1"));
    labyrinth = engine.labyrinth().clone();

    let bot = bot_at(BotKind::Explorer, "0-0");
    assert_eq!(
        decide(&labyrinth, &bot).as_deref(),
        Some("1-0"),
        "no levers left, go win"
    );
}

#[test]
fn engine_drives_a_bot_to_the_goal() {
    let data: MapData =
        serde_json::from_str(r#"{"name": "open", "grid": [[1, 2, 2, 9]]}"#).unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.add_player(Player::new_bot(
        "B1",
        "Bot",
        BotKind::ShortestPath(BotDifficulty::Hard),
    ));

    engine.set_movement_points("B1", 3).unwrap();
    while engine.is_game_running() && engine.player("B1").unwrap().movement_points > 0 {
        engine.execute_bot_turn();
    }

    assert!(!engine.is_game_running());
    assert_eq!(engine.winner().unwrap().id, "B1");
}

#[test]
fn bot_with_no_move_forfeits_its_points() {
    // The bot's only exit is locked and there is no lever to open it.
    let data: MapData = serde_json::from_str(
        r#"{
            "name": "sealed",
            "grid": [[1, 2, 9]],
            "locked": [{"room_a": "0-0", "room_b": "1-0"}]
        }"#,
    )
    .unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.add_player(Player::new_bot(
        "B1",
        "Bot",
        BotKind::ShortestPath(BotDifficulty::Hard),
    ));

    engine.set_movement_points("B1", 3).unwrap();
    assert!(!engine.execute_bot_turn());
    assert_eq!(engine.player("B1").unwrap().movement_points, 0);
    assert_eq!(
        engine.player("B1").unwrap().current_room.as_deref(),
        Some("0-0")
    );
}
