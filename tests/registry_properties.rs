// tests/registry_properties.rs

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use watchpoints::fs::mock::MockFileSystem;
use watchpoints::paths::{collapse_roots, is_within, RequestedPathSet};
use watchpoints::registry::WatchPointRegistry;
use watchpoints::types::MergePolicy;

// Paths under "/w" drawn from a tiny alphabet, so requests overlap often.
fn path_strategy() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 1..4).prop_map(
        |parts| {
            let mut path = PathBuf::from("/w");
            for part in parts {
                path.push(part);
            }
            path
        },
    )
}

fn requests_strategy() -> impl Strategy<Value = Vec<Vec<PathBuf>>> {
    proptest::collection::vec(proptest::collection::vec(path_strategy(), 0..4), 1..6)
}

fn policy_strategy() -> impl Strategy<Value = MergePolicy> {
    prop_oneof![Just(MergePolicy::Collapse), Just(MergePolicy::Append)]
}

fn mock_fs(dirs: &[PathBuf]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    for dir in dirs {
        fs.add_dir(dir);
    }
    fs
}

fn is_covered(path: &PathBuf, points: &BTreeSet<PathBuf>) -> bool {
    points.iter().any(|point| is_within(path, point, true))
}

proptest! {
    #[test]
    fn collapse_roots_is_minimal_and_idempotent(
        paths in proptest::collection::vec(path_strategy(), 0..10),
    ) {
        let collapsed = collapse_roots(paths.clone());

        for path in &paths {
            prop_assert!(collapsed.iter().any(|root| is_within(path, root, true)));
        }
        for (i, a) in collapsed.iter().enumerate() {
            for (j, b) in collapsed.iter().enumerate() {
                if i != j {
                    prop_assert!(!is_within(a, b, true), "{:?} nested in {:?}", a, b);
                }
            }
        }
        prop_assert_eq!(collapse_roots(collapsed.clone()), collapsed);
    }

    #[test]
    fn every_requested_root_stays_covered(
        existing in proptest::collection::vec(path_strategy(), 0..6),
        requests in requests_strategy(),
        policy in policy_strategy(),
    ) {
        let fs = mock_fs(&existing);
        let mut registry = WatchPointRegistry::with_file_system(policy, Arc::new(fs));

        for request in requests {
            registry
                .register_additional_paths(&RequestedPathSet::from_roots(request))
                .unwrap();
            for root in registry.all_requested_roots() {
                prop_assert!(
                    is_covered(root, registry.current_watch_points()),
                    "{:?} not covered by {:?}",
                    root,
                    registry.current_watch_points()
                );
            }
        }
    }

    #[test]
    fn collapse_policy_keeps_watch_points_disjoint(
        existing in proptest::collection::vec(path_strategy(), 0..6),
        requests in requests_strategy(),
    ) {
        let fs = mock_fs(&existing);
        let mut registry =
            WatchPointRegistry::with_file_system(MergePolicy::Collapse, Arc::new(fs));

        for request in requests {
            let prior = registry.current_watch_points().clone();
            let update = registry
                .register_additional_paths(&RequestedPathSet::from_roots(request))
                .unwrap();
            let current = registry.current_watch_points();

            let as_vec: Vec<PathBuf> = current.iter().cloned().collect();
            prop_assert_eq!(collapse_roots(as_vec.clone()), as_vec);

            // Nothing watched before is left uncovered.
            for point in &prior {
                prop_assert!(is_covered(point, current));
            }
            for point in update.subsumed_watch_points() {
                prop_assert!(prior.contains(point));
                prop_assert!(!current.contains(point));
            }
        }
    }

    #[test]
    fn updates_only_report_fresh_points(
        existing in proptest::collection::vec(path_strategy(), 0..6),
        requests in requests_strategy(),
        policy in policy_strategy(),
    ) {
        let fs = mock_fs(&existing);
        let mut registry = WatchPointRegistry::with_file_system(policy, Arc::new(fs));

        for request in requests {
            let prior_points = registry.current_watch_points().clone();
            let prior_roots = registry.all_requested_roots().clone();
            let update = registry
                .register_additional_paths(&RequestedPathSet::from_roots(request))
                .unwrap();

            prop_assert!(registry.all_requested_roots().is_superset(&prior_roots));
            if policy == MergePolicy::Append {
                prop_assert!(registry.current_watch_points().is_superset(&prior_points));
            }
            for point in update.new_watch_points() {
                prop_assert!(!prior_points.contains(point));
                prop_assert!(registry.current_watch_points().contains(point));
            }
        }
    }

    #[test]
    fn events_fire_exactly_for_requested_paths(
        requests in requests_strategy(),
        candidates in proptest::collection::vec(path_strategy(), 1..10),
        policy in policy_strategy(),
    ) {
        let fs = MockFileSystem::new();
        fs.add_dir("/w");
        let mut registry = WatchPointRegistry::with_file_system(policy, Arc::new(fs));

        let sets: Vec<RequestedPathSet> =
            requests.into_iter().map(RequestedPathSet::from_roots).collect();
        for set in &sets {
            registry.register_additional_paths(set).unwrap();
        }

        for path in &candidates {
            let expected = sets.iter().any(|set| set.contains(path));
            prop_assert_eq!(registry.should_fire_event(path), expected, "path {:?}", path);
        }
    }
}
