use gloria_core::graph::{WeightedGraph, LOCKED_WEIGHT, OPEN_WEIGHT};
use gloria_core::io::{self, MapData};
use gloria_core::logic::bots::open_neighbors;
use gloria_core::types::Player;
use gloria_core::GameEngine;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn open_field_engine() -> GameEngine {
    let data: MapData = serde_json::from_str(
        r#"{"name": "field", "grid": [[1, 2, 2], [2, 2, 2], [2, 2, 2]]}"#,
    )
    .unwrap();
    let mut engine = GameEngine::new(io::build_labyrinth(&data), 7);
    engine.add_player(Player::new_human("P1", "Ana"));
    engine
}

fn fingerprint(engine: &GameEngine) -> Vec<(String, Option<String>, u32, u32)> {
    engine
        .players()
        .iter()
        .map(|p| {
            (
                p.id.clone(),
                p.current_room.clone(),
                p.movement_points,
                p.skip_turns,
            )
        })
        .collect()
}

proptest! {
    /// Any number of committed random moves unwinds back to the exact
    /// starting state.
    #[test]
    fn random_walks_round_trip_through_undo(seed in 0u64..1_000, steps in 1usize..25) {
        let mut engine = open_field_engine();
        engine.set_movement_points("P1", 100).unwrap();
        let before = fingerprint(&engine);

        let mut rng = StdRng::seed_from_u64(seed);
        let mut committed = 0;
        for _ in 0..steps {
            let current = engine
                .player("P1")
                .and_then(|p| p.current_room.clone())
                .unwrap();
            let options = open_neighbors(engine.labyrinth(), &current);
            let target = options.choose(&mut rng).unwrap().clone();
            if engine.try_move("P1", &target) {
                committed += 1;
            }
        }

        prop_assert_eq!(engine.history_depth(), committed);
        for _ in 0..committed {
            prop_assert!(engine.undo());
        }
        prop_assert_eq!(fingerprint(&engine), before);
        prop_assert!(!engine.undo(), "history must be exhausted");
    }

    /// Whatever edges we throw at the graph, a returned path is walkable:
    /// right endpoints, every hop over a real edge, cost equal to the
    /// reported weight.
    #[test]
    fn shortest_paths_are_walkable(
        edges in prop::collection::vec((0usize..8, 0usize..8, prop::bool::ANY), 1..30),
        from in 0usize..8,
        to in 0usize..8,
    ) {
        let mut graph = WeightedGraph::new();
        for i in 0..8 {
            graph.add_vertex(format!("r{}", i));
        }
        for (a, b, locked) in &edges {
            if a != b {
                let weight = if *locked { LOCKED_WEIGHT } else { OPEN_WEIGHT };
                graph.add_edge(&format!("r{}", a), &format!("r{}", b), weight);
            }
        }

        let from = format!("r{}", from);
        let to = format!("r{}", to);
        let path = graph.shortest_path(&from, &to);
        let weight = graph.shortest_path_weight(&from, &to);

        if path.is_empty() {
            prop_assert_eq!(weight, None);
        } else {
            prop_assert_eq!(path.first().map(String::as_str), Some(from.as_str()));
            prop_assert_eq!(path.last().map(String::as_str), Some(to.as_str()));

            let mut total = 0u64;
            for pair in path.windows(2) {
                let edge = graph.edge_weight(&pair[0], &pair[1]);
                prop_assert!(edge.is_some(), "hop {}->{} has no edge", pair[0], pair[1]);
                total += u64::from(edge.unwrap());
            }
            prop_assert_eq!(weight, Some(total));
        }
    }

    /// BFS from any vertex visits each reachable vertex exactly once,
    /// starting with the origin.
    #[test]
    fn bfs_visits_reachable_vertices_once(
        edges in prop::collection::vec((0usize..8, 0usize..8), 1..30),
        start in 0usize..8,
    ) {
        let mut graph = WeightedGraph::new();
        for i in 0..8 {
            graph.add_vertex(format!("r{}", i));
        }
        for (a, b) in &edges {
            if a != b {
                graph.add_edge(&format!("r{}", a), &format!("r{}", b), OPEN_WEIGHT);
            }
        }

        let start = format!("r{}", start);
        let order = graph.bfs_order(&start);

        prop_assert_eq!(order.first(), Some(&start));
        let mut seen = std::collections::BTreeSet::new();
        for room in &order {
            prop_assert!(seen.insert(room.clone()), "{} visited twice", room);
            prop_assert!(!graph.shortest_path(&start, room).is_empty());
        }
    }
}
