use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- ID Aliases ---
pub type RoomId = String;
pub type PlayerId = String;
pub type LeverId = String;

/// Sentinel step count for forced movement: send the player back to its
/// spawn room instead of walking a path.
pub const RETURN_TO_START: i32 = -99;

// --- Rooms ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum RoomType {
    Start,
    Normal,
    Riddle,
    Lever,
    Penalty,
    Boost,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomType,
    /// Grid column, also the first half of the id.
    pub x: u32,
    /// Grid row, also the second half of the id.
    pub y: u32,
    pub label: String,
}

impl Room {
    pub fn new(x: u32, y: u32, kind: RoomType, label: impl Into<String>) -> Self {
        Self {
            id: room_id(x, y),
            kind,
            x,
            y,
            label: label.into(),
        }
    }

    /// Riddle, boost, penalty and lever rooms trigger something on entry.
    pub fn is_special(&self) -> bool {
        matches!(
            self.kind,
            RoomType::Riddle | RoomType::Boost | RoomType::Penalty | RoomType::Lever
        )
    }
}

/// Canonical id for the room at grid cell (x, y).
pub fn room_id(x: u32, y: u32) -> RoomId {
    format!("{}-{}", x, y)
}

// --- Levers ---

/// A one-shot mechanism that unlocks the passage between two rooms.
/// `activated` only ever flips back to false through an undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Lever {
    pub id: LeverId,
    pub door_a: RoomId,
    pub door_b: RoomId,
    pub activated: bool,
}

impl Lever {
    pub fn new(id: impl Into<String>, door_a: impl Into<String>, door_b: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            door_a: door_a.into(),
            door_b: door_b.into(),
            activated: false,
        }
    }
}

// --- Players ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

impl BotDifficulty {
    /// Chance that the bot throws away its plan and wanders instead.
    pub fn mistake_chance(&self) -> f64 {
        match self {
            BotDifficulty::Easy => 0.5,
            BotDifficulty::Medium => 0.25,
            BotDifficulty::Hard => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum BotKind {
    /// Beelines for the goal, hunts levers when blocked.
    ShortestPath(BotDifficulty),
    /// Refuses to step into penalty rooms unless cornered.
    Coward,
    /// Chases un-activated levers before heading for the goal.
    Explorer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_bot: bool,
    pub strategy: Option<BotKind>,
    pub current_room: Option<RoomId>,
    /// Set once at first placement; the target of a return-to-start effect.
    pub spawn_room: Option<RoomId>,
    pub movement_points: u32,
    pub skip_turns: u32,
    pub boosts: u32,
    /// Append-only. Not rolled back by undo.
    pub log: Vec<GameEvent>,
}

impl Player {
    pub fn new_human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, false, None)
    }

    pub fn new_bot(id: impl Into<String>, name: impl Into<String>, kind: BotKind) -> Self {
        Self::new(id, name, true, Some(kind))
    }

    fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        is_bot: bool,
        strategy: Option<BotKind>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_bot,
            strategy,
            current_room: None,
            spawn_room: None,
            movement_points: 0,
            skip_turns: 0,
            boosts: 0,
            log: Vec::new(),
        }
    }

    pub fn move_to(&mut self, room: RoomId) {
        self.current_room = Some(room);
    }

    pub fn decrement_movement_points(&mut self) {
        self.movement_points = self.movement_points.saturating_sub(1);
    }

    pub fn decrement_skip_turn(&mut self) {
        self.skip_turns = self.skip_turns.saturating_sub(1);
    }

    pub fn log_event(&mut self, turn: u32, kind: impl Into<String>, description: impl Into<String>) {
        self.log.push(GameEvent::new(turn, kind, description));
    }
}

// --- Events ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameEvent {
    pub turn: u32,
    pub kind: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    pub fn new(turn: u32, kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            turn,
            kind: kind.into(),
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

// --- Penalties & Boosts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PenaltyKind {
    /// Push the victim back toward the start.
    Retreat,
    /// The victim sits out its next turn(s).
    SkipTurn,
    /// Every opponent advances toward the goal.
    BenefitOpponents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Penalty {
    pub description: String,
    pub kind: PenaltyKind,
    pub value: i32,
}

impl Penalty {
    pub fn new(description: impl Into<String>, kind: PenaltyKind, value: i32) -> Self {
        Self {
            description: description.into(),
            kind,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Boost {
    pub description: String,
}

impl Boost {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

// --- Riddles ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Riddle {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
    /// Forward steps on a correct answer.
    pub bonus: i32,
    /// Backward steps on a wrong answer.
    pub penalty: i32,
}

impl Riddle {
    /// Accepts the literal answer (case-insensitive) or a 1-based index
    /// into `options`.
    pub fn check_answer(&self, input: &str) -> bool {
        let input = input.trim();
        if input.eq_ignore_ascii_case(&self.answer) {
            return true;
        }
        if let Ok(index) = input.parse::<usize>() {
            if index >= 1 {
                if let Some(option) = self.options.get(index - 1) {
                    return option.eq_ignore_ascii_case(&self.answer);
                }
            }
        }
        false
    }

    /// The question plus numbered options, ready for display.
    pub fn prompt(&self) -> String {
        let mut out = self.question.clone();
        for (i, option) in self.options.iter().enumerate() {
            out.push_str(&format!("\n[{}] {}", i + 1, option));
        }
        out
    }
}

// --- Snapshots ---

/// Per-player capture inside a [`GameSnapshot`]. Boost charges are
/// deliberately absent: undo does not refund them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerMoment {
    pub player: PlayerId,
    pub room: Option<RoomId>,
    pub movement_points: u32,
    pub skip_turns: u32,
}

/// One committed move's worth of world state, captured immediately before
/// the move mutates anything. Consumed exactly once by an undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GameSnapshot {
    /// Whoever held the head of the turn queue at capture time.
    pub head: PlayerId,
    pub players: Vec<PlayerMoment>,
    /// Host rooms of the levers that were activated at capture time.
    pub activated_levers: Vec<RoomId>,
}
