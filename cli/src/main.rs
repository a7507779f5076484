use clap::Parser;
use gloria_core::io;
use gloria_core::types::{BotDifficulty, BotKind, Player, RoomType};
use gloria_core::GameEngine;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Parser, Debug)]
#[command(author, version, about = "Labyrinth race simulator", long_about = None)]
struct Args {
    /// Path to the map JSON file
    #[arg(short, long)]
    map: String,

    /// Path to the penalty deck JSON file
    #[arg(short, long)]
    penalties: Option<String>,

    /// Path to the riddle pool JSON file
    #[arg(short, long)]
    riddles: Option<String>,

    /// Number of bot players
    #[arg(short, long, default_value_t = 3)]
    bots: usize,

    /// Random seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Sides on the movement die
    #[arg(long, default_value_t = 6)]
    die_sides: u32,

    /// Give up after this many turns
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Write a match report to this path when done
    #[arg(short, long)]
    output: Option<String>,
}

fn bot_lineup(count: usize) -> Vec<Player> {
    let kinds = [
        BotKind::ShortestPath(BotDifficulty::Hard),
        BotKind::Coward,
        BotKind::Explorer,
        BotKind::ShortestPath(BotDifficulty::Medium),
        BotKind::ShortestPath(BotDifficulty::Easy),
    ];
    (0..count)
        .map(|i| {
            let kind = kinds[i % kinds.len()];
            Player::new_bot(format!("B{}", i + 1), format!("Bot {} ({:?})", i + 1, kind), kind)
        })
        .collect()
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let labyrinth = match io::load_labyrinth(&args.map) {
        Ok(labyrinth) => labyrinth,
        Err(e) => {
            eprintln!("failed to load map {}: {}", args.map, e);
            std::process::exit(1);
        }
    };

    let mut engine = GameEngine::new(labyrinth, args.seed);

    if let Some(path) = &args.penalties {
        match io::load_penalties(path) {
            Ok(penalties) => engine.set_penalties(penalties),
            Err(e) => {
                warn!("failed to load penalties from {}: {}, using fallback", path, e);
                engine.set_penalties(io::fallback_penalties());
            }
        }
    }
    if let Some(path) = &args.riddles {
        match io::load_riddles(path) {
            Ok(riddles) => engine.set_riddles(riddles),
            Err(e) => warn!("failed to load riddles from {}: {}", path, e),
        }
    }

    for player in bot_lineup(args.bots) {
        engine.add_player(player);
    }

    let mut dice = StdRng::seed_from_u64(args.seed);

    while engine.is_game_running() && engine.turn_count() <= args.max_turns {
        let Some(player_id) = engine.current_player().map(|p| p.id.clone()) else {
            eprintln!("no players registered");
            std::process::exit(1);
        };

        let roll = dice.gen_range(1..=args.die_sides);
        if engine.set_movement_points(&player_id, roll).is_err() {
            break;
        }
        info!("turn {}: {} rolls {}", engine.turn_count(), player_id, roll);

        // A bot that cannot move forfeits its remaining points, so this
        // loop always terminates.
        loop {
            let Some(player) = engine.player(&player_id) else {
                break;
            };
            if !engine.is_game_running() || player.movement_points == 0 {
                break;
            }
            if !engine.execute_bot_turn() {
                break;
            }
        }

        // Riddle rooms are resolved here, outside the engine.
        if engine.is_game_running() {
            let landed_on_riddle = engine
                .player(&player_id)
                .and_then(|p| p.current_room.as_deref())
                .and_then(|room| engine.labyrinth().room(room))
                .map_or(false, |room| room.kind == RoomType::Riddle);
            if landed_on_riddle {
                if let Some(riddle) = engine.draw_riddle() {
                    // Bots guess; a real driver would prompt the player.
                    let correct = dice.gen_bool(0.5);
                    println!("{} answers a riddle: {}", player_id, correct);
                    let _ = engine.resolve_riddle(&player_id, &riddle, correct);
                }
            }
        }

        if engine.is_game_running() {
            if engine.consume_boost(&player_id) {
                info!("{} spends a boost and goes again", player_id);
            } else {
                engine.next_turn();
            }
        }
    }

    match engine.winner() {
        Some(winner) => println!("winner after {} turns: {}", engine.turn_count(), winner.name),
        None => println!("no winner within {} turns", args.max_turns),
    }

    for player in engine.players() {
        let room = player.current_room.as_deref().unwrap_or("-");
        println!("  {} finished in {} ({} events)", player.name, room, player.log.len());
    }

    if let Some(path) = args.output {
        let winner_name = engine.winner().map(|w| w.name.clone());
        if let Err(e) =
            io::write_match_report(&path, engine.players(), winner_name.as_deref())
        {
            eprintln!("failed to write report {}: {}", path, e);
            std::process::exit(1);
        }
        println!("report written to {}", path);
    }
}
