//! Building networks from configuration, and build-time validation.

use solverforge_config::{EnvironmentMode, NetworkConfig};
use solverforge_core::{HardSoftScore, SimpleScore};
use solverforge_network::joiner::equal;
use solverforge_network::{ConstraintFactory, ConstraintNetwork, ConstraintWeightOverrides, NetworkError};

#[derive(Clone, Debug, PartialEq)]
struct Visit {
    id: u32,
    room: u32,
    minutes: i64,
}

fn visit(id: u32, room: u32, minutes: i64) -> Visit {
    Visit { id, room, minutes }
}

fn define(factory: &ConstraintFactory<HardSoftScore>) {
    factory
        .for_each::<Visit>()
        .join(
            factory.for_each::<Visit>(),
            equal(|v: &Visit| v.room).and(solverforge_network::joiner::less_than(
                |(a,): &(Visit,)| a.id,
                |b: &Visit| b.id,
            )),
        )
        .penalize("clinic/Shared room", HardSoftScore::ONE_HARD);

    factory
        .for_each::<Visit>()
        .penalize_weighted("clinic/Long visit", HardSoftScore::ONE_SOFT, |(v,): &(Visit,)| {
            v.minutes
        });

    factory
        .for_each::<Visit>()
        .penalize_with("clinic/Overtime", |(v,): &(Visit,)| {
            HardSoftScore::of_soft((v.minutes - 60).max(0))
        });
}

fn build(config: &NetworkConfig) -> Result<ConstraintNetwork<HardSoftScore>, NetworkError> {
    let factory = ConstraintFactory::new().with_config(config)?;
    define(&factory);
    factory.build()
}

#[test]
fn test_toml_weights_replace_defined_weights() {
    let config = NetworkConfig::from_toml_str(
        r#"
        environment_mode = "full_assert"

        [constraint_weights]
        "clinic/Shared room" = "5hard/0soft"
        "clinic/Long visit" = "0hard/2soft"
        "#,
    )
    .unwrap();

    let mut network = build(&config).unwrap();
    assert_eq!(network.environment_mode(), EnvironmentMode::FullAssert);
    network.insert(visit(1, 7, 30));
    network.insert(visit(2, 7, 90));

    assert_eq!(
        network.constraint_score("clinic/Shared room"),
        Some(HardSoftScore::ZERO)
    );
    network.flush();
    assert_eq!(
        network.constraint_score("clinic/Shared room"),
        Some(HardSoftScore::of_hard(-5))
    );
    assert_eq!(
        network.constraint_score("clinic/Long visit"),
        Some(HardSoftScore::of_soft(-240))
    );
    assert_eq!(
        network.constraint_score("clinic/Overtime"),
        Some(HardSoftScore::of_soft(-30))
    );
    assert_eq!(network.score(), HardSoftScore::of(-5, -270));

    let analysis = network.analyze();
    let shared = analysis.constraint("clinic/Shared room").unwrap();
    assert_eq!(shared.weight, Some(HardSoftScore::of_hard(5)));
    assert_eq!(analysis.constraint("clinic/Overtime").unwrap().weight, None);
}

#[test]
fn test_yaml_config_disables_match_retention() {
    let config = NetworkConfig::from_yaml_str(
        "environment_mode: fast_assert\nconstraint_match_enabled: false\n",
    )
    .unwrap();

    let mut network = build(&config).unwrap();
    network.insert(visit(1, 1, 120));
    network.flush();

    let analysis = network.analyze();
    assert_eq!(analysis.score, HardSoftScore::of_soft(-180));
    let long = analysis.constraint("clinic/Long visit").unwrap();
    assert_eq!(long.match_count, 1);
    assert!(long.matches.is_empty());
    assert!(network.indictments().is_empty());
}

#[test]
fn test_unparseable_weight_is_rejected() {
    let config = NetworkConfig::from_toml_str(
        r#"
        [constraint_weights]
        "clinic/Shared room" = "lots"
        "#,
    )
    .unwrap();

    match build(&config) {
        Err(NetworkError::InvalidWeight { name, .. }) => assert_eq!(name, "clinic/Shared room"),
        other => panic!("expected an invalid weight, got {:?}", other),
    }
}

#[test]
fn test_override_of_unknown_constraint_is_rejected() {
    let mut overrides = ConstraintWeightOverrides::new();
    overrides.put("clinic/Missing", HardSoftScore::ONE_HARD);
    let factory = ConstraintFactory::new().with_weight_overrides(overrides);
    define(&factory);

    assert_eq!(
        factory.build().unwrap_err(),
        NetworkError::UnknownConstraint {
            name: "clinic/Missing".to_string()
        }
    );
}

#[test]
fn test_override_of_computed_impact_is_rejected() {
    let mut overrides = ConstraintWeightOverrides::new();
    overrides.put("clinic/Overtime", HardSoftScore::ONE_SOFT);
    let factory = ConstraintFactory::new().with_weight_overrides(overrides);
    define(&factory);

    assert_eq!(
        factory.build().unwrap_err(),
        NetworkError::FixedImpact {
            name: "clinic/Overtime".to_string()
        }
    );
}

#[test]
fn test_duplicate_constraint_names_are_rejected() {
    let factory = ConstraintFactory::<SimpleScore>::new();
    factory.for_each::<u8>().penalize("dup", SimpleScore::of(1));
    factory.for_each::<u16>().reward("dup", SimpleScore::of(1));

    assert_eq!(
        factory.build().unwrap_err(),
        NetworkError::DuplicateConstraint {
            name: "dup".to_string()
        }
    );
}

#[test]
fn test_dangling_stream_is_rejected() {
    let factory = ConstraintFactory::<SimpleScore>::new();
    factory.for_each::<u8>().penalize("small", SimpleScore::of(1));
    let _dangling = factory.for_each::<u8>().filter(|(x,): &(u8,)| *x > 3);

    assert_eq!(
        factory.build().unwrap_err(),
        NetworkError::UnconsumedStream { node: "filter" }
    );
}

#[test]
fn test_unconsumed_fact_classes_are_tracked_only() {
    let factory = ConstraintFactory::<SimpleScore>::new();
    factory.for_each::<u8>().penalize("bytes", SimpleScore::of(1));
    let mut network = factory.build().unwrap();

    let ignored = network.insert("not a byte");
    network.insert(3u8);
    assert_eq!(network.calculate_score(), SimpleScore::of(-1));
    assert_eq!(network.fact_count(), 2);

    network.retract::<&'static str>(ignored);
    assert_eq!(network.fact_count(), 1);
    assert_eq!(network.calculate_score(), SimpleScore::of(-1));
}

#[test]
#[should_panic(expected = "unknown fact handle")]
fn test_retract_twice_panics() {
    let factory = ConstraintFactory::<SimpleScore>::new();
    factory.for_each::<u8>().penalize("bytes", SimpleScore::of(1));
    let mut network = factory.build().unwrap();

    let handle = network.insert(1u8);
    network.retract::<u8>(handle);
    network.retract::<u8>(handle);
}

#[test]
#[should_panic(expected = "not its class")]
fn test_update_as_other_class_panics() {
    let factory = ConstraintFactory::<SimpleScore>::new();
    factory.for_each::<u8>().penalize("bytes", SimpleScore::of(1));
    let mut network = factory.build().unwrap();

    let handle = network.insert(1u8);
    network.update(handle, 1u16);
}

#[test]
#[should_panic(expected = "different constraint factories")]
fn test_streams_of_different_factories_cannot_join() {
    let first = ConstraintFactory::<SimpleScore>::new();
    let second = ConstraintFactory::<SimpleScore>::new();
    first
        .for_each::<u8>()
        .join(second.for_each::<u8>(), equal(|x: &u8| *x))
        .penalize("pairs", SimpleScore::of(1));
}

#[test]
fn test_build_reports_network_shape() {
    let factory = ConstraintFactory::<HardSoftScore>::new();
    define(&factory);
    let network = factory.build().unwrap();

    // Four entry nodes and one join.
    assert_eq!(network.node_count(), 5);
    assert_eq!(network.constraint_count(), 3);
    assert_eq!(network.environment_mode(), EnvironmentMode::NonAsserted);
}
