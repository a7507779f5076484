//! Pluggable bot decision strategies.
//!
//! Each strategy answers one question: given the labyrinth and a player,
//! which adjacent room should the bot step into next? `None` tells the
//! engine to burn the remaining movement points without moving.

use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::labyrinth::Labyrinth;
use crate::types::{BotDifficulty, BotKind, Player, RoomId};

pub mod coward;
pub mod explorer;
pub mod shortest_path;

pub trait BotStrategy: Send + Sync {
    fn next_move(
        &self,
        labyrinth: &Labyrinth,
        player: &Player,
        roll: u32,
        rng: &mut StdRng,
    ) -> Option<RoomId>;
}

type StrategyMap = HashMap<BotKind, Box<dyn BotStrategy>>;

static REGISTRY: OnceLock<StrategyMap> = OnceLock::new();

pub fn get_strategy(kind: BotKind) -> &'static dyn BotStrategy {
    REGISTRY
        .get_or_init(init_registry)
        .get(&kind)
        .map(|s| s.as_ref())
        .unwrap_or(&IdleStrategy)
}

fn init_registry() -> StrategyMap {
    let mut m: StrategyMap = HashMap::new();
    for difficulty in [
        BotDifficulty::Easy,
        BotDifficulty::Medium,
        BotDifficulty::Hard,
    ] {
        m.insert(
            BotKind::ShortestPath(difficulty),
            Box::new(shortest_path::ShortestPathBot { difficulty }),
        );
    }
    m.insert(BotKind::Coward, Box::new(coward::CowardBot));
    m.insert(BotKind::Explorer, Box::new(explorer::ExplorerBot));
    m
}

/// Fallback for an unregistered kind: never proposes a move.
struct IdleStrategy;

impl BotStrategy for IdleStrategy {
    fn next_move(
        &self,
        _labyrinth: &Labyrinth,
        _player: &Player,
        _roll: u32,
        _rng: &mut StdRng,
    ) -> Option<RoomId> {
        None
    }
}

// --- Shared pathfinding primitives ---

/// True iff every passage along the shortest route from `start` to `target`
/// is currently unlocked. A room is trivially clear of itself.
pub fn is_path_clear(labyrinth: &Labyrinth, start: &str, target: &str) -> bool {
    let path = labyrinth.shortest_path(start, target);
    if path.is_empty() {
        return false;
    }
    path.windows(2)
        .all(|pair| labyrinth.is_valid_move(&pair[0], &pair[1]))
}

/// The room immediately after `start` on the shortest route to `target`.
pub fn first_step_toward(labyrinth: &Labyrinth, start: &str, target: &str) -> Option<RoomId> {
    let path = labyrinth.shortest_path(start, target);
    path.into_iter().nth(1)
}

/// Adjacent rooms the player could legally step into, in id order.
pub fn open_neighbors(labyrinth: &Labyrinth, room: &str) -> Vec<RoomId> {
    labyrinth
        .neighbors(room)
        .into_iter()
        .filter(|n| labyrinth.is_valid_move(room, n))
        .collect()
}

/// BFS outward for the closest room hosting an un-activated lever that the
/// player can actually walk to.
pub fn nearest_reachable_lever(labyrinth: &Labyrinth, start: &str) -> Option<RoomId> {
    for room in labyrinth.bfs_from(start) {
        if room == start {
            continue;
        }
        let Some(lever) = labyrinth.lever(&room) else {
            continue;
        };
        if !lever.activated && is_path_clear(labyrinth, start, &room) {
            return Some(room);
        }
    }
    None
}
