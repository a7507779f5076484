use log::debug;
use rand::rngs::StdRng;

use super::{first_step_toward, open_neighbors, BotStrategy};
use crate::labyrinth::Labyrinth;
use crate::types::{Player, RoomId, RoomType};

/// Follows the ideal route, but detours around penalty rooms: when the next
/// step would land on one, it takes the open non-penalty neighbor closest to
/// the goal. Cornered, it swallows the risk.
pub struct CowardBot;

impl BotStrategy for CowardBot {
    fn next_move(
        &self,
        labyrinth: &Labyrinth,
        player: &Player,
        _roll: u32,
        _rng: &mut StdRng,
    ) -> Option<RoomId> {
        let current = player.current_room.as_deref()?;
        let goal = labyrinth.goal_room_id()?;

        let ideal = first_step_toward(labyrinth, current, goal)?;

        if !is_penalty_room(labyrinth, &ideal) {
            return Some(ideal);
        }

        debug!("bot {} balks at penalty room {}", player.name, ideal);
        let mut best: Option<(u64, RoomId)> = None;
        for neighbor in open_neighbors(labyrinth, current) {
            if is_penalty_room(labyrinth, &neighbor) {
                continue;
            }
            let Some(distance) = labyrinth.shortest_path_weight(&neighbor, goal) else {
                continue;
            };
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, neighbor));
            }
        }

        match best {
            Some((_, detour)) => Some(detour),
            // No safe alternative; risk the ideal step.
            None => Some(ideal),
        }
    }
}

fn is_penalty_room(labyrinth: &Labyrinth, id: &str) -> bool {
    labyrinth
        .room(id)
        .map_or(false, |room| room.kind == RoomType::Penalty)
}
