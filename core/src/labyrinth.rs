use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{WeightedGraph, LOCKED_WEIGHT, OPEN_WEIGHT};
use crate::types::{room_id, Lever, Room, RoomId};

/// The physical and logical structure of the board: the connectivity graph,
/// the room registry, the levers, and the designated start/entry/goal rooms.
///
/// Everything here is built once by the loader. During play the only
/// mutations are lock-state changes through [`Labyrinth::set_connection_locked`]
/// and lever flags through the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Labyrinth {
    graph: WeightedGraph,
    rooms: BTreeMap<RoomId, Room>,
    /// Levers keyed by the room that hosts them (one per room at most).
    levers: BTreeMap<RoomId, Lever>,
    entry_points: Vec<RoomId>,
    start_room: Option<RoomId>,
    goal_room: Option<RoomId>,
}

impl Labyrinth {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Construction (loader only) ---

    pub fn add_room(&mut self, room: Room) {
        if self.rooms.contains_key(&room.id) {
            return;
        }
        self.graph.add_vertex(room.id.clone());
        self.rooms.insert(room.id.clone(), room);
    }

    /// Connects two existing rooms with an open passage. Unknown rooms and
    /// already-connected pairs are left untouched.
    pub fn add_corridor(&mut self, a: &str, b: &str) {
        if !self.rooms.contains_key(a) || !self.rooms.contains_key(b) {
            return;
        }
        if self.graph.edge_weight(a, b).is_some() {
            return;
        }
        self.graph.add_edge(a, b, OPEN_WEIGHT);
    }

    /// Binds a lever to its host room. The controlled edge may legitimately
    /// not exist yet in a hand-edited map; activation will warn and no-op.
    pub fn add_lever(&mut self, host_room: impl Into<RoomId>, lever: Lever) {
        let host_room = host_room.into();
        if self.graph.edge_weight(&lever.door_a, &lever.door_b).is_none() {
            warn!(
                "lever {} in {} controls a missing passage {}<->{}",
                lever.id, host_room, lever.door_a, lever.door_b
            );
        }
        self.levers.insert(host_room, lever);
    }

    pub fn add_entry_point(&mut self, id: impl Into<RoomId>) {
        self.entry_points.push(id.into());
    }

    pub fn set_start_room(&mut self, id: impl Into<RoomId>) {
        self.start_room = Some(id.into());
    }

    pub fn set_goal_room(&mut self, id: impl Into<RoomId>) {
        self.goal_room = Some(id.into());
    }

    // --- Lookups ---

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn room_at(&self, x: u32, y: u32) -> Option<&Room> {
        self.rooms.get(&room_id(x, y))
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn lever(&self, host_room: &str) -> Option<&Lever> {
        self.levers.get(host_room)
    }

    pub(crate) fn lever_mut(&mut self, host_room: &str) -> Option<&mut Lever> {
        self.levers.get_mut(host_room)
    }

    /// (host room, lever) pairs in room-id order.
    pub fn levers(&self) -> impl Iterator<Item = (&RoomId, &Lever)> {
        self.levers.iter()
    }

    pub fn entry_points(&self) -> &[RoomId] {
        &self.entry_points
    }

    pub fn start_room_id(&self) -> Option<&RoomId> {
        self.start_room.as_ref()
    }

    pub fn goal_room_id(&self) -> Option<&RoomId> {
        self.goal_room.as_ref()
    }

    // --- Movement & pathfinding ---

    /// True iff a passage exists between the rooms and it is not locked.
    pub fn is_valid_move(&self, from: &str, to: &str) -> bool {
        matches!(self.graph.edge_weight(from, to), Some(w) if w < LOCKED_WEIGHT)
    }

    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        self.graph.edge_weight(a, b)
    }

    /// Rooms adjacent to `id`, locked passages included.
    pub fn neighbors(&self, id: &str) -> Vec<RoomId> {
        self.graph.neighbors(id)
    }

    /// Inclusive room sequence from `start` to `end`; empty when no route
    /// exists. Locked passages count as expensive but present, so the path
    /// only crosses one when there is no open alternative.
    pub fn shortest_path(&self, start: &str, end: &str) -> Vec<RoomId> {
        self.graph.shortest_path(start, end)
    }

    pub fn shortest_path_weight(&self, start: &str, end: &str) -> Option<u64> {
        self.graph.shortest_path_weight(start, end)
    }

    /// Breadth-first room order from `start`, seeing through locked doors.
    pub fn bfs_from(&self, start: &str) -> Vec<RoomId> {
        self.graph.bfs_order(start)
    }

    // --- Lock mutation ---

    /// Locks or unlocks the passage between two rooms. Only the loader and
    /// the lever-activation path may call this; a missing passage warns and
    /// changes nothing.
    pub fn set_connection_locked(&mut self, a: &str, b: &str, locked: bool) {
        if self.graph.edge_weight(a, b).is_none() {
            warn!("cannot set lock state of missing passage {}<->{}", a, b);
            return;
        }
        let weight = if locked { LOCKED_WEIGHT } else { OPEN_WEIGHT };
        self.graph.add_edge(a, b, weight);
    }
}
