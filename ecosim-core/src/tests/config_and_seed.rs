use super::support::*;
use super::*;
use std::cmp::Ordering;

#[test]
fn config_validation_rejects_a_zero_grid() {
    let mut cfg = test_config(6, 2, 1);
    cfg.grid_size = 0;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("grid_size"));
}

#[test]
fn config_validation_rejects_a_zero_starve_time() {
    let mut cfg = test_config(6, 2, 1);
    cfg.starve_time = 0;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("starve_time"));
}

#[test]
fn config_validation_rejects_a_zero_hunting_radius() {
    let mut cfg = test_config(6, 2, 1);
    cfg.hunting_radius = 0;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("hunting_radius"));
}

#[test]
fn config_validation_rejects_zero_max_ticks() {
    let mut cfg = test_config(6, 2, 1);
    cfg.max_ticks = 0;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("max_ticks"));
}

#[test]
fn config_validation_rejects_out_of_range_probabilities() {
    let mut cfg = test_config(6, 2, 1);
    cfg.prey_reproduce_prob = 1.5;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("prey_reproduce_prob"));

    let mut cfg = test_config(6, 2, 1);
    cfg.predator_reproduce_prob = -0.1;
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("predator_reproduce_prob"));
}

#[test]
fn config_validation_rejects_populations_beyond_capacity() {
    let cfg = test_config(3, 8, 2);
    let err = Simulation::new(cfg, 1).expect_err("config should be rejected");
    assert!(err.to_string().contains("capacity"));
}

#[test]
fn seeding_places_the_exact_population_on_unique_cells() {
    let cfg = test_config(8, 10, 4);
    let sim = Simulation::new(cfg, 11).expect("simulation should initialize");
    assert_eq!(
        sim.world.counts(),
        PopulationCounts {
            prey: 10,
            predators: 4,
        }
    );
    assert_world_consistent(&sim.world);
}

#[test]
fn seeding_fills_a_grid_at_full_capacity() {
    let cfg = test_config(3, 5, 4);
    let sim = Simulation::new(cfg, 23).expect("simulation should initialize");
    assert_eq!(sim.world.len(), 9);
    let tags = sim.world.tag_grid();
    for y in 0..3 {
        for x in 0..3 {
            assert_ne!(tags.at(x, y), CellTag::Empty, "every cell must be filled");
        }
    }
    assert_world_consistent(&sim.world);
}

#[test]
fn seeded_predators_start_with_a_full_countdown() {
    let cfg = test_config(8, 0, 5);
    let sim = Simulation::new(cfg, 3).expect("simulation should initialize");
    for agent in sim.world.agents() {
        let BehaviorState::Predator {
            hunger,
            starve_time,
            hunting_radius,
            ..
        } = agent.behavior
        else {
            panic!("only predators were seeded");
        };
        assert_eq!(hunger, starve_time);
        assert_eq!(starve_time, 20);
        assert_eq!(hunting_radius, 2);
    }
}

#[test]
fn seeding_is_reproducible_for_a_fixed_seed() {
    let cfg = test_config(8, 10, 4);
    let a = Simulation::new(cfg.clone(), 55).expect("simulation should initialize");
    let b = Simulation::new(cfg, 55).expect("simulation should initialize");
    assert_eq!(
        compare_snapshots(&a.snapshot(), &b.snapshot()),
        Ordering::Equal
    );
}
