pub mod bots;
pub mod decks;
pub mod engine;

pub use engine::GameEngine;

use thiserror::Error;

/// Failures the driver has to handle. Expected in-game conditions (illegal
/// moves, no path, empty undo history) are boolean/`Option` returns instead,
/// so the turn loop never has to unwind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("player not found")]
    PlayerNotFound,
    #[error("room not found")]
    RoomNotFound,
}
