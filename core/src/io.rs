//! Loading the board and its config files, and writing the match report.
//!
//! The map file is a JSON grid of cell codes plus two optional lists: doors
//! that start locked, and lever bindings. Rooms connect to their four grid
//! neighbors; everything else is a wall.

use chrono::Utc;
use log::{info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::labyrinth::Labyrinth;
use crate::types::{Lever, Penalty, PenaltyKind, Player, Riddle, Room, RoomId, RoomType};

// Cell codes used by the map grid.
pub const CODE_EMPTY: u8 = 0;
pub const CODE_START: u8 = 1;
pub const CODE_NORMAL: u8 = 2;
pub const CODE_RIDDLE: u8 = 3;
pub const CODE_PENALTY: u8 = 4;
pub const CODE_BOOST: u8 = 5;
pub const CODE_LEVER: u8 = 6;
pub const CODE_EXIT: u8 = 9;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory shape of a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MapData {
    pub name: String,
    pub grid: Vec<Vec<u8>>,
    #[serde(default)]
    pub locked: Vec<LockedDoor>,
    #[serde(default)]
    pub levers: Vec<LeverBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LockedDoor {
    pub room_a: RoomId,
    pub room_b: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LeverBinding {
    #[serde(default)]
    pub id: Option<String>,
    /// Room the lever sits in.
    pub room_id: RoomId,
    /// The two rooms whose connecting door it opens.
    pub door_room_a: RoomId,
    pub door_room_b: RoomId,
}

fn room_type_for_code(code: u8) -> Option<RoomType> {
    match code {
        CODE_START => Some(RoomType::Start),
        CODE_NORMAL => Some(RoomType::Normal),
        CODE_RIDDLE => Some(RoomType::Riddle),
        CODE_PENALTY => Some(RoomType::Penalty),
        CODE_BOOST => Some(RoomType::Boost),
        CODE_LEVER => Some(RoomType::Lever),
        CODE_EXIT => Some(RoomType::Exit),
        _ => None,
    }
}

/// Builds a playable labyrinth out of parsed map data.
pub fn build_labyrinth(data: &MapData) -> Labyrinth {
    let mut labyrinth = Labyrinth::new();

    for (y, row) in data.grid.iter().enumerate() {
        for (x, &code) in row.iter().enumerate() {
            let Some(kind) = room_type_for_code(code) else {
                if code != CODE_EMPTY {
                    warn!("unknown cell code {} at ({}, {})", code, x, y);
                }
                continue;
            };
            let room = Room::new(x as u32, y as u32, kind, "");
            let id = room.id.clone();
            labyrinth.add_room(room);
            if kind == RoomType::Start {
                labyrinth.add_entry_point(id.clone());
                labyrinth.set_start_room(id.clone());
            }
            if kind == RoomType::Exit {
                labyrinth.set_goal_room(id);
            }
        }
    }

    // Second pass: connect each room to its upper and left neighbor, which
    // covers all four directions once the sweep completes.
    for (y, row) in data.grid.iter().enumerate() {
        for x in 0..row.len() {
            let (x, y) = (x as u32, y as u32);
            let Some(current) = labyrinth.room_at(x, y).map(|r| r.id.clone()) else {
                continue;
            };
            if y > 0 {
                if let Some(up) = labyrinth.room_at(x, y - 1).map(|r| r.id.clone()) {
                    labyrinth.add_corridor(&current, &up);
                }
            }
            if x > 0 {
                if let Some(left) = labyrinth.room_at(x - 1, y).map(|r| r.id.clone()) {
                    labyrinth.add_corridor(&current, &left);
                }
            }
        }
    }

    for door in &data.locked {
        labyrinth.set_connection_locked(&door.room_a, &door.room_b, true);
    }

    for (i, binding) in data.levers.iter().enumerate() {
        let id = binding.id.clone().unwrap_or_else(|| format!("L{}", i));
        let lever = Lever::new(id, binding.door_room_a.clone(), binding.door_room_b.clone());
        labyrinth.add_lever(binding.room_id.clone(), lever);
    }

    info!(
        "loaded map '{}': {} rooms, {} locked doors, {} levers",
        data.name,
        labyrinth.rooms().count(),
        data.locked.len(),
        data.levers.len()
    );
    labyrinth
}

pub fn load_map(path: impl AsRef<Path>) -> Result<MapData, MapError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn load_labyrinth(path: impl AsRef<Path>) -> Result<Labyrinth, MapError> {
    Ok(build_labyrinth(&load_map(path)?))
}

/// Reads the penalty deck. The engine must never run with an empty deck, so
/// callers fall back to [`fallback_penalties`] when this errors or returns
/// nothing.
pub fn load_penalties(path: impl AsRef<Path>) -> Result<Vec<Penalty>, MapError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn fallback_penalties() -> Vec<Penalty> {
    vec![Penalty::new("Lose a turn", PenaltyKind::SkipTurn, 1)]
}

pub fn load_riddles(path: impl AsRef<Path>) -> Result<Vec<Riddle>, MapError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

// --- Match report ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub timestamp: chrono::DateTime<Utc>,
    pub winner: Option<String>,
    pub players: Vec<PlayerReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerReport {
    pub name: String,
    pub kind: String,
    pub events: Vec<crate::types::GameEvent>,
}

/// Summarizes a finished match as pretty JSON for post-game analysis.
pub fn write_match_report(
    path: impl AsRef<Path>,
    players: &[Player],
    winner: Option<&str>,
) -> Result<(), MapError> {
    let report = MatchReport {
        timestamp: Utc::now(),
        winner: winner.map(str::to_string),
        players: players
            .iter()
            .map(|p| PlayerReport {
                name: p.name.clone(),
                kind: if p.is_bot { "BOT" } else { "HUMAN" }.to_string(),
                events: p.log.clone(),
            })
            .collect(),
    };
    std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
