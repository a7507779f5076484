//! The turn/movement state machine, room effects, and the undo stack.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::labyrinth::Labyrinth;
use crate::logic::bots;
use crate::logic::decks::{BoostDeck, PenaltyDeck, RiddlePool};
use crate::logic::GameError;
use crate::types::{
    GameSnapshot, Penalty, PenaltyKind, Player, PlayerId, PlayerMoment, Riddle, RoomId, RoomType,
    RETURN_TO_START,
};

/// One match: owns the labyrinth, the roster, the turn queue, the effect
/// decks and the snapshot history. Driven one operation at a time by an
/// external caller; nothing else mutates this state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameEngine {
    labyrinth: Labyrinth,
    /// Registration order; the turn queue is rebuilt from this on undo.
    players: Vec<Player>,
    turn_queue: VecDeque<PlayerId>,
    history: Vec<GameSnapshot>,
    penalties: PenaltyDeck,
    boosts: BoostDeck,
    riddles: RiddlePool,
    game_running: bool,
    winner: Option<PlayerId>,
    spawn_index: usize,
    turn_count: u32,
    /// Seed for the next deterministic draw; re-seeded after every use so a
    /// fixed starting seed replays the whole match.
    rng_seed: u64,
}

impl GameEngine {
    pub fn new(labyrinth: Labyrinth, seed: u64) -> Self {
        Self {
            labyrinth,
            players: Vec::new(),
            turn_queue: VecDeque::new(),
            history: Vec::new(),
            penalties: PenaltyDeck::default(),
            boosts: BoostDeck::default(),
            riddles: RiddlePool::default(),
            game_running: true,
            winner: None,
            spawn_index: 0,
            turn_count: 1,
            rng_seed: seed,
        }
    }

    pub fn set_penalties(&mut self, penalties: Vec<Penalty>) {
        self.penalties = PenaltyDeck::new(penalties);
    }

    pub fn set_riddles(&mut self, riddles: Vec<Riddle>) {
        self.riddles = RiddlePool::new(riddles);
    }

    // --- Roster ---

    /// Registers a player. An unplaced player spawns on the next entry
    /// point, round-robin, and remembers it as its spawn room.
    pub fn add_player(&mut self, mut player: Player) {
        if player.current_room.is_none() {
            let entries = self.labyrinth.entry_points();
            if !entries.is_empty() {
                let spawn = entries[self.spawn_index % entries.len()].clone();
                info!("spawn: {} enters at {}", player.name, spawn);
                player.move_to(spawn.clone());
                player.spawn_room = Some(spawn);
                self.spawn_index += 1;
            }
        } else if player.spawn_room.is_none() {
            player.spawn_room = player.current_room.clone();
        }
        self.turn_queue.push_back(player.id.clone());
        self.players.push(player);
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        let head = self.turn_queue.front()?;
        self.player(head)
    }

    pub fn labyrinth(&self) -> &Labyrinth {
        &self.labyrinth
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn is_game_running(&self) -> bool {
        self.game_running
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.as_deref().and_then(|id| self.player(id))
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    /// External dice input: gives the player its movement points for the
    /// turn.
    pub fn set_movement_points(&mut self, player_id: &str, points: u32) -> Result<(), GameError> {
        let index = self
            .player_index(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        self.players[index].movement_points = points;
        Ok(())
    }

    /// Direct restoration hook for the persistence layer (and tests); in
    /// normal play skip turns are only set by penalties.
    pub fn set_skip_turns(&mut self, player_id: &str, turns: u32) -> Result<(), GameError> {
        let index = self
            .player_index(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        self.players[index].skip_turns = turns;
        Ok(())
    }

    // --- Movement ---

    /// Attempts to step `player_id` into the adjacent room `target_id`.
    ///
    /// Returns false — with no mutation and no snapshot — when the game is
    /// over, either id is unknown, the player is unplaced, or the passage
    /// is missing/locked. On success a snapshot is pushed first, then the
    /// player relocates and pays one movement point; room effects fire when
    /// the points hit zero or the target is the goal.
    pub fn try_move(&mut self, player_id: &str, target_id: &str) -> bool {
        if !self.game_running {
            return false;
        }
        if self.labyrinth.room(target_id).is_none() {
            return false;
        }
        let Some(index) = self.player_index(player_id) else {
            return false;
        };
        let Some(current) = self.players[index].current_room.clone() else {
            return false;
        };
        if !self.labyrinth.is_valid_move(&current, target_id) {
            debug!(
                "invalid move {} -> {} (wall or locked door)",
                current, target_id
            );
            return false;
        }

        self.save_snapshot();

        let turn = self.turn_count;
        let player = &mut self.players[index];
        player.move_to(target_id.to_string());
        player.log_event(turn, "MOVE", format!("Moved to {}", target_id));
        player.decrement_movement_points();

        let out_of_points = self.players[index].movement_points == 0;
        let at_goal = self
            .labyrinth
            .goal_room_id()
            .map_or(false, |goal| goal == target_id);
        if out_of_points || at_goal {
            self.check_room_effects(index, target_id);
        }
        true
    }

    fn check_room_effects(&mut self, index: usize, room_id: &str) {
        let at_goal = self
            .labyrinth
            .goal_room_id()
            .map_or(false, |goal| goal == room_id);
        if at_goal {
            self.game_running = false;
            self.winner = Some(self.players[index].id.clone());
            let turn = self.turn_count;
            self.players[index].log_event(turn, "WIN", "Reached the treasure room");
            info!("game over, {} wins", self.players[index].name);
            return;
        }

        let Some(kind) = self.labyrinth.room(room_id).map(|room| room.kind) else {
            return;
        };
        match kind {
            RoomType::Penalty => self.handle_penalty(index),
            RoomType::Lever => self.activate_lever(index, room_id),
            RoomType::Boost => self.handle_boost(index),
            // Riddle rooms are resolved by the driver via draw_riddle.
            _ => {}
        }
    }

    // --- Room effects ---

    fn handle_penalty(&mut self, victim: usize) {
        let penalty = self.penalties.draw();
        let turn = self.turn_count;
        self.players[victim].log_event(turn, "PENALTY", penalty.description.clone());
        info!(
            "penalty for {}: {}",
            self.players[victim].name, penalty.description
        );

        match penalty.kind {
            PenaltyKind::Retreat => self.auto_move_index(victim, -penalty.value.abs()),
            PenaltyKind::SkipTurn => {
                self.players[victim].skip_turns = penalty.value.max(0) as u32;
            }
            PenaltyKind::BenefitOpponents => {
                for other in 0..self.players.len() {
                    if other != victim {
                        self.auto_move_index(other, penalty.value.abs());
                    }
                }
            }
        }
    }

    fn handle_boost(&mut self, index: usize) {
        let boost = self.boosts.draw();
        let turn = self.turn_count;
        self.players[index].boosts += 1;
        self.players[index].log_event(turn, "BOOST", boost.description.clone());
        info!("boost for {}: {}", self.players[index].name, boost.description);
    }

    /// Pulls the lever hosted in `room_id`, if any. Pulling an already
    /// activated lever changes nothing; this is the only path that unlocks
    /// a passage during play.
    fn activate_lever(&mut self, index: usize, room_id: &str) {
        let Some(lever) = self.labyrinth.lever(room_id) else {
            return;
        };
        if lever.activated {
            info!("lever {} was already pulled", lever.id);
            return;
        }
        let lever_id = lever.id.clone();
        let door_a = lever.door_a.clone();
        let door_b = lever.door_b.clone();

        if self.labyrinth.edge_weight(&door_a, &door_b).is_none() {
            warn!(
                "lever {} controls a missing passage {}<->{}",
                lever_id, door_a, door_b
            );
            return;
        }

        self.labyrinth.set_connection_locked(&door_a, &door_b, false);
        if let Some(lever) = self.labyrinth.lever_mut(room_id) {
            lever.activated = true;
        }
        let turn = self.turn_count;
        self.players[index].log_event(
            turn,
            "LEVER",
            format!("Pulled lever {} opening {}<->{}", lever_id, door_a, door_b),
        );
        info!(
            "{} pulled lever {}, passage {}<->{} is open",
            self.players[index].name, lever_id, door_a, door_b
        );
    }

    // --- Turn rotation ---

    /// Finishes the head player's turn and rotates to the next player that
    /// is not sitting out. Skipped players have their counter decremented
    /// and move to the tail without acting.
    pub fn next_turn(&mut self) {
        if !self.game_running || self.turn_queue.is_empty() {
            return;
        }

        if let Some(finished) = self.turn_queue.pop_front() {
            if let Some(index) = self.player_index(&finished) {
                self.players[index].movement_points = 0;
            }
            self.turn_queue.push_back(finished);
        }

        loop {
            let Some(head) = self.turn_queue.front().cloned() else {
                break;
            };
            let Some(index) = self.player_index(&head) else {
                break;
            };
            if self.players[index].skip_turns == 0 {
                break;
            }
            self.players[index].decrement_skip_turn();
            let turn = self.turn_count;
            self.players[index].log_event(turn, "SKIP", "Sat out a turn");
            info!("{} sits this one out", self.players[index].name);
            self.turn_queue.rotate_left(1);
        }

        self.turn_count += 1;
    }

    // --- Forced movement ---

    /// Engine-driven relocation along the shortest path: positive steps walk
    /// toward the goal, negative toward the start, [`RETURN_TO_START`] jumps
    /// straight back to the spawn room. Costs no movement points and takes
    /// no snapshot; a missing path makes this a no-op.
    pub fn apply_auto_move(&mut self, player_id: &str, steps: i32) -> Result<(), GameError> {
        let index = self
            .player_index(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        self.auto_move_index(index, steps);
        Ok(())
    }

    fn auto_move_index(&mut self, index: usize, steps: i32) {
        if steps == 0 {
            return;
        }
        let turn = self.turn_count;

        if steps == RETURN_TO_START {
            let target = self.players[index]
                .spawn_room
                .clone()
                .or_else(|| self.labyrinth.start_room_id().cloned());
            if let Some(target) = target {
                let player = &mut self.players[index];
                player.move_to(target.clone());
                player.log_event(turn, "AUTO_MOVE", format!("Sent back to start, {}", target));
                info!("{} is sent back to the start", player.name);
            }
            return;
        }

        let target = if steps > 0 {
            self.labyrinth.goal_room_id()
        } else {
            self.labyrinth.start_room_id()
        };
        let Some(target) = target.cloned() else {
            return;
        };
        let Some(current) = self.players[index].current_room.clone() else {
            return;
        };

        let path = self.labyrinth.shortest_path(&current, &target);
        if path.len() < 2 {
            return;
        }
        let hops = (steps.unsigned_abs() as usize).min(path.len() - 1);
        let destination = path[hops].clone();

        let player = &mut self.players[index];
        player.move_to(destination.clone());
        player.log_event(turn, "AUTO_MOVE", format!("Forced to {}", destination));
        debug!("{} forced {} hops to {}", player.name, hops, destination);
    }

    // --- Bots ---

    /// Asks the head-of-queue bot for a move and executes it. Returns true
    /// when a move was made; a bot with no move burns its remaining points.
    pub fn execute_bot_turn(&mut self) -> bool {
        if !self.game_running {
            return false;
        }
        let Some(head) = self.turn_queue.front().cloned() else {
            return false;
        };
        let Some(index) = self.player_index(&head) else {
            return false;
        };
        let player = &self.players[index];
        if !player.is_bot || player.movement_points == 0 {
            return false;
        }
        let Some(kind) = player.strategy else {
            return false;
        };

        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        let decision = bots::get_strategy(kind).next_move(
            &self.labyrinth,
            player,
            player.movement_points,
            &mut rng,
        );
        self.rng_seed = rng.gen();

        match decision {
            Some(target) => {
                let moved = self.try_move(&head, &target);
                if moved {
                    debug!("bot {} moved to {}", head, target);
                }
                moved
            }
            None => {
                // Nowhere to go: the turn's points are forfeit.
                self.players[index].movement_points = 0;
                false
            }
        }
    }

    // --- Riddles & boosts (driver-resolved effects) ---

    /// Draws the next riddle for the driver to ask. `None` when no riddles
    /// were loaded.
    pub fn draw_riddle(&mut self) -> Option<Riddle> {
        let mut rng = StdRng::seed_from_u64(self.rng_seed);
        let riddle = self.riddles.draw(&mut rng);
        self.rng_seed = rng.gen();
        riddle
    }

    /// Applies a riddle outcome: forward by the bonus on a correct answer,
    /// back by the penalty otherwise.
    pub fn resolve_riddle(
        &mut self,
        player_id: &str,
        riddle: &Riddle,
        answered_correctly: bool,
    ) -> Result<(), GameError> {
        let index = self
            .player_index(player_id)
            .ok_or(GameError::PlayerNotFound)?;
        let turn = self.turn_count;
        if answered_correctly {
            self.players[index].log_event(turn, "RIDDLE", format!("Solved: {}", riddle.question));
            self.auto_move_index(index, riddle.bonus.abs());
        } else {
            self.players[index].log_event(turn, "RIDDLE", format!("Missed: {}", riddle.question));
            self.auto_move_index(index, -riddle.penalty.abs());
        }
        Ok(())
    }

    /// Spends one boost charge. The driver grants the extra roll; the turn
    /// queue itself is not reordered.
    pub fn consume_boost(&mut self, player_id: &str) -> bool {
        let Some(index) = self.player_index(player_id) else {
            return false;
        };
        if self.players[index].boosts == 0 {
            return false;
        }
        self.players[index].boosts -= 1;
        let turn = self.turn_count;
        self.players[index].log_event(turn, "BOOST", "Spent a boost for an extra turn");
        true
    }

    // --- Snapshots & undo ---

    fn save_snapshot(&mut self) {
        let Some(head) = self.turn_queue.front().cloned() else {
            return;
        };
        let players = self
            .players
            .iter()
            .map(|p| PlayerMoment {
                player: p.id.clone(),
                room: p.current_room.clone(),
                movement_points: p.movement_points,
                skip_turns: p.skip_turns,
            })
            .collect();
        let activated_levers = self
            .labyrinth
            .levers()
            .filter(|(_, lever)| lever.activated)
            .map(|(host, _)| host.clone())
            .collect();
        self.history.push(GameSnapshot {
            head,
            players,
            activated_levers,
        });
        debug!("snapshot saved, stack depth {}", self.history.len());
    }

    /// Rolls the world back one committed move. Returns false on an empty
    /// history. Restores every player's room/points/skips, resets every
    /// lever to locked and re-activates exactly the recorded ones, then
    /// rotates the turn queue so the captured head player acts again.
    ///
    /// Drawn penalty/boost items and event logs are deliberately not
    /// restored.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };

        for moment in &snapshot.players {
            if let Some(index) = self.player_index(&moment.player) {
                let player = &mut self.players[index];
                player.current_room = moment.room.clone();
                player.movement_points = moment.movement_points;
                player.skip_turns = moment.skip_turns;
            }
        }

        self.reset_all_levers();
        for host in &snapshot.activated_levers {
            self.force_lever(host, true);
        }

        self.rotate_queue_to(&snapshot.head);
        info!("undo: back to {}'s turn", snapshot.head);
        true
    }

    /// Deactivates every lever and re-locks its passage.
    fn reset_all_levers(&mut self) {
        let activated: Vec<RoomId> = self
            .labyrinth
            .levers()
            .filter(|(_, lever)| lever.activated)
            .map(|(host, _)| host.clone())
            .collect();
        for host in activated {
            self.force_lever(&host, false);
        }
    }

    fn force_lever(&mut self, host: &str, activated: bool) {
        let Some(lever) = self.labyrinth.lever(host) else {
            return;
        };
        let door_a = lever.door_a.clone();
        let door_b = lever.door_b.clone();
        self.labyrinth.set_connection_locked(&door_a, &door_b, !activated);
        if let Some(lever) = self.labyrinth.lever_mut(host) {
            lever.activated = activated;
        }
    }

    /// Rebuilds the turn queue in registration order, rotated so `head`
    /// is at the front.
    fn rotate_queue_to(&mut self, head: &str) {
        let Some(position) = self.players.iter().position(|p| p.id == head) else {
            return;
        };
        self.turn_queue = self.players[position..]
            .iter()
            .chain(self.players[..position].iter())
            .map(|p| p.id.clone())
            .collect();
    }

    // --- Rematch ---

    /// Resets the world for a rematch with the same roster: players return
    /// to their spawn rooms with cleared points/skips/boosts/logs, levers
    /// re-lock, and the snapshot history empties.
    pub fn reset_match(&mut self) {
        self.game_running = true;
        self.winner = None;
        self.turn_count = 1;
        self.history.clear();
        self.reset_all_levers();
        for player in &mut self.players {
            player.current_room = player.spawn_room.clone();
            player.movement_points = 0;
            player.skip_turns = 0;
            player.boosts = 0;
            player.log.clear();
        }
        self.turn_queue = self.players.iter().map(|p| p.id.clone()).collect();
    }
}
