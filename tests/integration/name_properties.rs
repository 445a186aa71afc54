use loadtree::context::ContextRegistry;
use loadtree::{ApiError, ArtifactCoordinate, RepositoryConfig, RepositorySpec};
use proptest::prelude::*;

fn spec() -> RepositorySpec {
    RepositorySpec::One(RepositoryConfig::with_dependencies(vec![
        ArtifactCoordinate::new("org.example", "lib", "1.0"),
    ]))
}

fn seeded() -> ContextRegistry {
    let mut registry = ContextRegistry::new();
    registry.create("root", None, spec(), Vec::new()).unwrap();
    registry.create("child", Some("root"), spec(), Vec::new()).unwrap();
    registry
}

proptest! {
    #[test]
    fn names_with_separator_are_rejected(prefix in "[a-z]{0,6}", suffix in "[a-z]{0,6}") {
        let mut registry = seeded();
        let before = registry.names();
        let name = format!("{}/{}", prefix, suffix);

        let result = registry.create(&name, None, spec(), Vec::new());

        prop_assert!(matches!(result, Err(ApiError::InvalidName(ref n)) if *n == name));
        prop_assert_eq!(registry.names(), before);
    }

    #[test]
    fn unknown_parents_are_rejected(parent in "[a-z]{1,8}") {
        prop_assume!(parent != "root" && parent != "system");
        let mut registry = seeded();
        let before = registry.names();

        let result = registry.create("leaf", Some(&parent), spec(), Vec::new());

        prop_assert!(matches!(result, Err(ApiError::UnknownParent(ref p)) if *p == parent));
        prop_assert_eq!(registry.names(), before);
    }

    #[test]
    fn recreate_leaves_one_entry(name in "[a-z]{1,8}", times in 1usize..5) {
        let mut registry = ContextRegistry::new();
        for _ in 0..times {
            registry.create(&name, None, spec(), Vec::new()).unwrap();
        }
        prop_assert_eq!(registry.names(), vec![name.clone()]);
    }

    #[test]
    fn remove_is_idempotent(names in proptest::collection::vec("[a-c]{1,2}", 1..8)) {
        let mut registry = ContextRegistry::new();
        for name in &names {
            registry.create(name, None, spec(), Vec::new()).unwrap();
        }
        let target = names[0].clone();

        prop_assert!(registry.remove(&target) >= 1);
        prop_assert_eq!(registry.remove(&target), 0);
        prop_assert!(registry.names().iter().all(|n| n.split('/').all(|s| s != target)));
    }
}
