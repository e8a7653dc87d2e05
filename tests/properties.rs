use std::time::{Duration, Instant};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use tracetty::generator::{generate_array, generate_graph, node_name, ArrayKind, TraversalFamily};
use tracetty::playback::PlaybackController;
use tracetty::snapshot::{Event, Snapshot};

fn trace(len: usize) -> Vec<Snapshot> {
    (0..len)
        .map(|i| Snapshot::new(i as u32 + 1, Event::Line).with_binding("i", json!(i)))
        .collect()
}

fn array_kind() -> impl Strategy<Value = ArrayKind> {
    prop_oneof![Just(ArrayKind::Sorted), Just(ArrayKind::Random)]
}

proptest! {
    #[test]
    fn generated_graph_is_connected(seed in any::<u64>(), nodes in 2usize..=20, directed in any::<bool>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = generate_graph(&mut rng, nodes, directed, TraversalFamily::Bfs);

        prop_assert_eq!(graph.adjacency.len(), nodes);
        prop_assert!(graph.is_connected_from(&node_name(0)));
        for (node, neighbors) in &graph.adjacency {
            prop_assert!(!neighbors.contains(node), "self loop at {}", node);
            if !directed {
                for next in neighbors {
                    prop_assert!(graph.adjacency[next].contains(node));
                }
            }
        }
    }

    #[test]
    fn generated_target_is_in_array(seed in any::<u64>(), size in 0usize..40, kind in array_kind()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let generated = generate_array(&mut rng, size, kind);

        prop_assert_eq!(generated.values.len(), size.clamp(1, 20));
        prop_assert!(generated.values.contains(&generated.target));
        if kind == ArrayKind::Sorted {
            prop_assert!(generated.values.windows(2).all(|w| w[0] < w[1]));
        }
        let target_line = format!("target = {}", generated.target);
        prop_assert!(generated.snippet.contains(&target_line));
    }

    #[test]
    fn stepping_reaches_the_end(len in 1usize..64) {
        let mut controller = PlaybackController::default();
        controller.load(trace(len));
        for _ in 1..len {
            prop_assert!(controller.step_forward());
        }
        prop_assert!(controller.is_at_end());
        prop_assert!(!controller.step_forward());
        prop_assert_eq!(controller.index(), len - 1);
    }

    #[test]
    fn seek_is_clamped(len in 1usize..64, target in any::<i64>()) {
        let mut controller = PlaybackController::default();
        controller.load(trace(len));
        controller.seek(target);
        let expected = target.clamp(0, len as i64 - 1) as usize;
        prop_assert_eq!(controller.index(), expected);
        prop_assert_eq!(controller.current().map(|s| s.position), Some(expected as u32 + 1));
    }

    #[test]
    fn tick_advances_at_most_once(len in 2usize..32, late_ms in 0u64..5_000, speed in 1u64..1_000) {
        let mut controller = PlaybackController::new(speed);
        controller.load(trace(len));
        let start = Instant::now();
        controller.set_playing_at(true, start);

        // However late the poll comes, only one step is taken
        let now = start + Duration::from_millis(speed + late_ms);
        prop_assert!(controller.tick(now));
        prop_assert_eq!(controller.index(), 1);
        prop_assert!(!controller.tick(now));
        prop_assert_eq!(controller.index(), 1);
    }
}
