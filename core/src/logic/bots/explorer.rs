use log::debug;
use rand::rngs::StdRng;

use super::{first_step_toward, nearest_reachable_lever, BotStrategy};
use crate::labyrinth::Labyrinth;
use crate::types::{Player, RoomId};

/// Seeks out un-activated levers before caring about the goal; with nothing
/// left to pull, it races for the exit like everyone else.
pub struct ExplorerBot;

impl BotStrategy for ExplorerBot {
    fn next_move(
        &self,
        labyrinth: &Labyrinth,
        player: &Player,
        _roll: u32,
        _rng: &mut StdRng,
    ) -> Option<RoomId> {
        let current = player.current_room.as_deref()?;

        if let Some(lever_room) = nearest_reachable_lever(labyrinth, current) {
            debug!("bot {} explores toward lever room {}", player.name, lever_room);
            return first_step_toward(labyrinth, current, &lever_room);
        }

        let goal = labyrinth.goal_room_id()?;
        first_step_toward(labyrinth, current, goal)
    }
}
