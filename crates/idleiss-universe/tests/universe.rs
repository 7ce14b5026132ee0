//! Integration tests for `idleiss-universe`: constellation generation
//! through the public API and configuration loading from fixture files.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use idleiss_types::{SecurityTier, SystemId};
use idleiss_universe::{
    ConfigError, ConsistencyRule, Constellation, GraphExport, NameRegistry, StructureGap,
    Universe, UniverseConfig, UniverseError, edge_list, verify,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn edge_set(constellation: &Constellation) -> BTreeSet<(SystemId, SystemId)> {
    constellation.edges().collect()
}

// =========================================================================
// Generation
// =========================================================================

#[test]
fn constellations_smaller_than_two_are_rejected() {
    let mut universe = Universe::new(42, 1.35).unwrap();
    for count in [0, 1] {
        let err = universe.generate_constellation(count).unwrap_err();
        assert!(matches!(err, UniverseError::InvalidArgument { .. }));
    }
}

#[test]
fn two_systems_without_random_edges_are_joined() {
    let mut universe = Universe::new(42, 0.0).unwrap();
    let constellation = universe.generate_constellation(2).unwrap();

    assert_eq!(constellation.len(), 2);
    assert_eq!(constellation.edge_count(), 1);
    for system in constellation.iter() {
        assert_eq!(system.degree(), 1);
    }
    assert!(constellation.is_connected());
}

#[test]
fn repeated_generation_stays_connected() {
    let mut universe = Universe::new(42, 1.35).unwrap();
    let mut seen = BTreeSet::new();
    for _ in 0..5 {
        let constellation = universe.generate_constellation(15).unwrap();
        assert_eq!(constellation.len(), 15);
        assert!(constellation.is_connected());
        constellation.verify_adjacency().unwrap();
        for id in constellation.ids() {
            assert!(seen.insert(id), "system id {id} reused");
        }
    }
    assert_eq!(seen.len(), 75);
}

#[test]
fn many_sizes_and_seeds_connect() {
    for seed in 0..20_u64 {
        let mut universe = Universe::new(seed, 1.0).unwrap();
        for count in [2, 3, 7, 40, 250] {
            let constellation = universe.generate_constellation(count).unwrap();
            assert_eq!(constellation.len(), count);
            assert!(constellation.is_connected(), "seed {seed}, {count} systems");
        }
    }
}

#[test]
fn sparse_and_dense_connectedness_both_connect() {
    for connectedness in [0.0, 0.2, 3.0] {
        let mut universe = Universe::new(9, connectedness).unwrap();
        let constellation = universe.generate_constellation(60).unwrap();
        assert!(constellation.is_connected());
        assert!(constellation.edge_count() >= 59);
    }
}

#[test]
fn same_seed_same_universe() {
    let mut a = Universe::new(2024, 1.35).unwrap();
    let mut b = Universe::new(2024, 1.35).unwrap();
    for count in [15, 4, 30] {
        let left = a.generate_constellation(count).unwrap();
        let right = b.generate_constellation(count).unwrap();
        assert_eq!(left, right);
        assert_eq!(edge_set(&left), edge_set(&right));
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = Universe::new(1, 1.35).unwrap();
    let mut b = Universe::new(2, 1.35).unwrap();
    let left = a.generate_constellation(30).unwrap();
    let right = b.generate_constellation(30).unwrap();
    let left_names: Vec<&str> = left.iter().map(|s| s.name()).collect();
    let right_names: Vec<&str> = right.iter().map(|s| s.name()).collect();
    assert_ne!(left_names, right_names);
}

#[test]
fn generated_names_are_unique_and_well_formed() {
    let mut universe = Universe::new(3, 1.35).unwrap();
    let mut names = BTreeSet::new();
    for _ in 0..10 {
        let constellation = universe.generate_constellation(50).unwrap();
        for system in constellation.iter() {
            let name = system.name();
            assert_eq!(name.len(), 6);
            let dash = name.find('-').unwrap();
            assert!((1..=4).contains(&dash), "dash at {dash} in {name}");
            assert!(
                name.chars()
                    .all(|c| c == '-' || c.is_ascii_uppercase() || c.is_ascii_digit())
            );
            assert!(names.insert(name.to_owned()), "duplicate name {name}");
            assert!(universe.name_exists(name));
        }
    }
}

#[test]
fn export_agrees_with_graph() {
    let mut universe = Universe::new(11, 1.35).unwrap();
    let constellation = universe.generate_constellation(20).unwrap();
    let export = GraphExport::from_constellation(&constellation);

    assert_eq!(export.node_count(), 20);
    assert_eq!(export.edge_count(), constellation.edge_count());
    assert!(export.isolated.is_empty());
    assert!(export.is_connected());

    let listing = edge_list(&constellation);
    assert!(listing.starts_with("Graph "));
    assert_eq!(listing.matches("->").count(), constellation.edge_count());
}

// =========================================================================
// Configuration
// =========================================================================

#[test]
fn json_fixture_loads_and_reserves_names() {
    let universe = Universe::load(&fixture("universe.json")).unwrap();
    let config = universe.config().unwrap();

    assert_eq!(config.universe_seed, 1337);
    assert_eq!(universe.session().seed(), 1337);
    assert!((universe.connectedness() - 1.25).abs() < f64::EPSILON);
    assert_eq!(universe.session().names().len(), 21);
    for name in ["The Forge", "Jita", "Kimotoro", "Eha", "Delve", "1DQ1-A", "YZ9-F6"] {
        assert!(universe.name_exists(name), "{name} not reserved");
    }
}

#[test]
fn yaml_fixture_matches_json_fixture() {
    let json = UniverseConfig::from_file(&fixture("universe.json")).unwrap();
    let yaml = UniverseConfig::from_file(&fixture("universe.yaml")).unwrap();
    assert_eq!(json, yaml);
    assert_eq!(
        yaml.universe_structure["Delve"].tier(),
        Some(SecurityTier::Null)
    );
}

#[test]
fn configured_universe_generates_around_reserved_names() {
    let mut universe = Universe::load(&fixture("universe.yaml")).unwrap();
    let reserved: Vec<String> = universe.session().names().names().map(str::to_owned).collect();

    let constellation = universe.generate_constellation(25).unwrap();
    assert!(constellation.is_connected());
    for system in constellation.iter() {
        assert!(!reserved.iter().any(|name| name == system.name()));
    }
    assert_eq!(universe.session().names().len(), reserved.len() + 25);
}

#[test]
fn overfull_null_constellation_is_rejected() {
    let err = Universe::load(&fixture("overfull_null.json")).unwrap_err();
    match err {
        ConfigError::Invalid {
            source:
                UniverseError::ConfigConsistency {
                    rule,
                    expected,
                    actual,
                    region,
                    constellation,
                },
        } => {
            assert_eq!(rule, ConsistencyRule::NullSystemsPerConstellation);
            assert_eq!((expected, actual), (2, 3));
            assert_eq!(region.as_deref(), Some("Fountain"));
            assert_eq!(constellation.as_deref(), Some("Pegasus"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mismatched_system_count_fails_first_rule() {
    let mut config = UniverseConfig::from_file(&fixture("universe.json")).unwrap();
    config.system_count = 100;
    config.constellation_count = 10;
    config.systems_per_constellation = 9;

    let err = Universe::from_config(config).unwrap_err();
    assert!(matches!(
        err,
        UniverseError::ConfigConsistency {
            rule: ConsistencyRule::SystemsByConstellation,
            expected: 90,
            actual: 100,
            ..
        }
    ));
    assert!(err.to_string().contains("expected 90, found 100"));
}

#[test]
fn missing_key_is_reported_by_name() {
    let mut document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fixture("universe.json")).unwrap()).unwrap();
    document
        .as_object_mut()
        .unwrap()
        .remove("Null Security Regions");

    let err = Universe::parse_json(&document.to_string()).unwrap_err();
    match err {
        ConfigError::Invalid {
            source: UniverseError::ConfigStructure(StructureGap::TopLevel { keys }),
        } => {
            assert_eq!(keys, vec!["Null Security Regions"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn null_rating_in_json_is_an_invalid_tier() {
    let mut document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(fixture("universe.json")).unwrap()).unwrap();
    document["Universe Structure"]["Delve"]["Security"] = serde_json::Value::Null;

    let err = Universe::parse_json(&document.to_string()).unwrap_err();
    match err {
        ConfigError::Invalid {
            source: UniverseError::InvalidSecurityTier { region, value },
        } => {
            assert_eq!(region, "Delve");
            assert_eq!(value, "null");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = Universe::parse_yaml("Universe Seed: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
}

#[test]
fn verify_shares_registry_with_prior_names() {
    let config = UniverseConfig::from_file(&fixture("universe.json")).unwrap();
    let mut registry = NameRegistry::new();
    registry.register("Jita").unwrap();

    let err = verify(&config, &mut registry).unwrap_err();
    assert!(matches!(err, UniverseError::DuplicateName(ref name) if name == "Jita"));
    assert_eq!(registry.len(), 1);

    let mut fresh = NameRegistry::new();
    verify(&config, &mut fresh).unwrap();
    assert_eq!(fresh.len(), 21);
}
