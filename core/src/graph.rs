use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use crate::types::RoomId;

/// Weight of a traversable passage.
pub const OPEN_WEIGHT: u32 = 1;
/// Sentinel weight of a locked passage. Anything at or above this is not a
/// legal move, but the edge stays in the graph so distance estimates still
/// see through locked doors.
pub const LOCKED_WEIGHT: u32 = 1_000;

/// Undirected weighted graph over room ids.
///
/// Openness is encoded in the weight: [`OPEN_WEIGHT`] means traversable,
/// [`LOCKED_WEIGHT`] means present-but-blocked, and the absence of an edge
/// means there is no passage at all. BTreeMap adjacency keeps every
/// iteration order deterministic, which the path tie-breaking relies on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct WeightedGraph {
    adjacency: BTreeMap<RoomId, BTreeMap<RoomId, u32>>,
}

impl WeightedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, id: impl Into<RoomId>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Creates or overwrites the undirected edge between `a` and `b`.
    /// Unknown endpoints are registered as vertices.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) {
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), weight);
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), weight);
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Direct edge weight, or `None` when the rooms are not connected.
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        self.adjacency.get(a)?.get(b).copied()
    }

    /// All rooms connected to `id` by any edge, locked or not, in id order.
    pub fn neighbors(&self, id: &str) -> Vec<RoomId> {
        match self.adjacency.get(id) {
            Some(edges) => edges.keys().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Dijkstra from `start` to `end`, inclusive of both endpoints.
    ///
    /// Returns an empty vec when either id is unknown or no route exists.
    /// Equal-cost routes resolve toward the lexicographically smaller room
    /// id: neighbors relax in BTreeMap order and only a strictly better
    /// cost replaces a predecessor.
    pub fn shortest_path(&self, start: &str, end: &str) -> Vec<RoomId> {
        let Some((_, path)) = self.dijkstra(start, end) else {
            return Vec::new();
        };
        path
    }

    /// Total cost of the shortest route, or `None` when unreachable.
    pub fn shortest_path_weight(&self, start: &str, end: &str) -> Option<u64> {
        self.dijkstra(start, end).map(|(cost, _)| cost)
    }

    fn dijkstra(&self, start: &str, end: &str) -> Option<(u64, Vec<RoomId>)> {
        if !self.contains_vertex(start) || !self.contains_vertex(end) {
            return None;
        }
        if start == end {
            return Some((0, vec![start.to_string()]));
        }

        let mut dist: BTreeMap<&str, u64> = BTreeMap::new();
        let mut prev: BTreeMap<&str, &str> = BTreeMap::new();
        let mut heap: BinaryHeap<Reverse<(u64, &str)>> = BinaryHeap::new();

        dist.insert(start, 0);
        heap.push(Reverse((0, start)));

        while let Some(Reverse((cost, node))) = heap.pop() {
            if cost > *dist.get(node).unwrap_or(&u64::MAX) {
                continue;
            }
            if node == end {
                break;
            }
            if let Some(edges) = self.adjacency.get(node) {
                for (neighbor, weight) in edges {
                    let neighbor = neighbor.as_str();
                    let next_cost = cost + u64::from(*weight);
                    if next_cost < *dist.get(neighbor).unwrap_or(&u64::MAX) {
                        dist.insert(neighbor, next_cost);
                        prev.insert(neighbor, node);
                        heap.push(Reverse((next_cost, neighbor)));
                    }
                }
            }
        }

        let total = *dist.get(end)?;
        let mut path = vec![end.to_string()];
        let mut cursor = end;
        while let Some(&previous) = prev.get(cursor) {
            path.push(previous.to_string());
            cursor = previous;
        }
        if cursor != start {
            return None;
        }
        path.reverse();
        Some((total, path))
    }

    /// Room ids in breadth-first order from `start`, locked edges included.
    /// Hop distance never decreases along the sequence.
    pub fn bfs_order(&self, start: &str) -> Vec<RoomId> {
        if !self.contains_vertex(start) {
            return Vec::new();
        }

        let mut order = Vec::with_capacity(self.adjacency.len());
        let mut queue = VecDeque::new();
        let mut visited: BTreeMap<&str, ()> = BTreeMap::new();

        visited.insert(start, ());
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            order.push(node.to_string());
            if let Some(edges) = self.adjacency.get(node) {
                for neighbor in edges.keys() {
                    let neighbor = neighbor.as_str();
                    if visited.insert(neighbor, ()).is_none() {
                        queue.push_back(neighbor);
                    }
                }
            }
        }
        order
    }
}
