pub mod graph;
pub mod io;
pub mod labyrinth;
pub mod logic;
pub mod types;

pub use labyrinth::Labyrinth;
pub use logic::engine::GameEngine;
pub use logic::GameError;
pub use types::*;

#[cfg(feature = "schema")]
pub fn export_schema() -> String {
    let schema = schemars::schema_for!(logic::engine::GameEngine);
    serde_json::to_string_pretty(&schema).unwrap()
}
