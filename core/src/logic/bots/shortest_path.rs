use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use super::{first_step_toward, is_path_clear, nearest_reachable_lever, open_neighbors, BotStrategy};
use crate::labyrinth::Labyrinth;
use crate::types::{BotDifficulty, Player, RoomId};

/// Heads straight for the goal. When the route is blocked by locked doors,
/// hunts the nearest reachable un-activated lever; failing that, shuffles
/// into any open neighbor. Lower difficulties sometimes wander on purpose.
pub struct ShortestPathBot {
    pub difficulty: BotDifficulty,
}

impl BotStrategy for ShortestPathBot {
    fn next_move(
        &self,
        labyrinth: &Labyrinth,
        player: &Player,
        _roll: u32,
        rng: &mut StdRng,
    ) -> Option<RoomId> {
        let current = player.current_room.as_deref()?;
        let goal = labyrinth.goal_room_id()?;

        if current == goal {
            return None;
        }

        let chance = self.difficulty.mistake_chance();
        if chance > 0.0 && rng.gen_bool(chance) {
            debug!("bot {} fumbles and wanders", player.name);
            return open_neighbors(labyrinth, current).choose(rng).cloned();
        }

        if is_path_clear(labyrinth, current, goal) {
            if let Some(step) = first_step_toward(labyrinth, current, goal) {
                return Some(step);
            }
        }

        // Route blocked: head for the closest lever we can still reach.
        if let Some(lever_room) = nearest_reachable_lever(labyrinth, current) {
            debug!("bot {} reroutes toward lever room {}", player.name, lever_room);
            if let Some(step) = first_step_toward(labyrinth, current, &lever_room) {
                return Some(step);
            }
        }

        open_neighbors(labyrinth, current).into_iter().next()
    }
}
