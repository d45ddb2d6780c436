//! Whole-world behavior over single ticks.

use proptest::prelude::*;
use protolife_core::{CellKind, Direction, Position, SimConfig};
use protolife_genome::{Genome, TAPE_LEN};
use protolife_world::{Cell, CellState, World};

fn empty_world() -> World {
    let mut config = SimConfig::default();
    config.world.width = 10;
    config.world.height = 10;
    config.seed = 42;
    let mut world = World::new(config).unwrap();
    world.wipe();
    world
}

fn genome(prefix: &[u8]) -> Genome {
    let mut tape = [0u8; TAPE_LEN];
    tape[..prefix.len()].copy_from_slice(prefix);
    Genome::from_tape(tape)
}

/// Every gene skips one place; none of them is an instruction
fn filler() -> Genome {
    Genome::filled(1)
}

fn life_at(world: &World, pos: Position) -> &protolife_world::Life {
    world
        .get(pos)
        .and_then(Cell::as_life)
        .unwrap_or_else(|| panic!("no life cell at {:?}", pos))
}

#[test]
fn scenario_idle_cell_pays_upkeep() {
    let mut world = empty_world();
    let pos = Position::new(5, 5);
    world.spawn_life(pos, filler(), Direction::East, 50.0).unwrap();

    world.tick();

    let life = life_at(&world, pos);
    assert_eq!(life.age, 1);
    assert!(life.is_alive());
    assert!((life.energy - (50.0 - 3.01)).abs() < 1e-4);
    assert_eq!(world.stats().life, 1);
    assert_eq!(world.cells().count(), 1);
}

#[test]
fn scenario_organic_denatures_into_mineral() {
    let mut world = empty_world();
    let pos = Position::new(4, 9);
    let organic = Cell::with_state(
        pos,
        world.config().organic.color,
        CellState::Organic(protolife_world::Organic::with_age(299)),
    );
    world.place(organic, pos).unwrap();

    world.tick();

    let cell = world.get(pos).unwrap();
    assert_eq!(cell.kind(), CellKind::Mineral);
    assert_eq!(cell.age(), 0);
    assert_eq!(world.stats().mineral, 1);
    assert_eq!(world.stats().organic, 0);
}

#[test]
fn scenario_mineral_sinks_one_row() {
    let mut world = empty_world();
    let pos = Position::new(3, 3);
    let mineral = world.config().mineral.clone();
    world.place(Cell::mineral(pos, &mineral), pos).unwrap();

    world.tick();

    assert!(world.get(pos).unwrap().is_empty());
    let sunk = world.get(Position::new(3, 4)).unwrap();
    assert_eq!(sunk.kind(), CellKind::Mineral);
    assert_eq!(sunk.position, Position::new(3, 4));
}

#[test]
fn scenario_duplication_halves_energy() {
    let mut world = empty_world();
    let parent_pos = Position::new(5, 5);
    world
        .spawn_life(parent_pos, filler(), Direction::North, 250.0)
        .unwrap();

    world.tick();

    // East is the first direction scanned
    let child = life_at(&world, Position::new(6, 5));
    assert_eq!(child.energy, 125.0);
    assert_eq!(child.heading, Direction::East);
    assert_eq!(child.age, 0);

    let parent = life_at(&world, parent_pos);
    assert!((parent.energy - (125.0 - 3.01)).abs() < 1e-4);
    assert!(parent.genome.mismatches(&child.genome) <= 1);

    let living = world.cells().filter(|c| c.kind() == CellKind::Life).count();
    assert_eq!(living, 2);
}

#[test]
fn duplication_fills_first_free_direction() {
    let mut world = empty_world();
    let parent_pos = Position::new(5, 5);
    let organic = world.config().organic.clone();
    for direction in [Direction::East, Direction::NorthEast] {
        let pos = parent_pos.step(direction);
        world.place(Cell::organic(pos, &organic), pos).unwrap();
    }
    world
        .spawn_life(parent_pos, filler(), Direction::South, 300.0)
        .unwrap();

    world.tick();

    let child = life_at(&world, parent_pos.step(Direction::North));
    assert_eq!(child.heading, Direction::North);
    // the child landed in a row not yet scanned, so it already took a turn
    assert_eq!(child.age, 1);
    assert!((child.energy - (150.0 - 3.01)).abs() < 1e-4);
}

#[test]
fn crowded_parent_dies_and_leaves_organic() {
    let mut world = empty_world();
    let parent_pos = Position::new(5, 5);
    let organic = world.config().organic.clone();
    for direction in Direction::all() {
        let pos = parent_pos.step(direction);
        world.place(Cell::organic(pos, &organic), pos).unwrap();
    }
    world
        .spawn_life(parent_pos, filler(), Direction::North, 250.0)
        .unwrap();

    world.tick();

    assert_eq!(world.get(parent_pos).unwrap().kind(), CellKind::Organic);
    assert_eq!(world.stats().life, 0);
    assert_eq!(world.stats().organic, 9);
}

#[test]
fn starving_cell_leaves_empty_slot() {
    let mut world = empty_world();
    let pos = Position::new(5, 5);
    world.spawn_life(pos, filler(), Direction::North, 1.0).unwrap();

    world.tick();

    assert!(world.get(pos).unwrap().is_empty());
    assert_eq!(world.stats().total(), 0);
}

#[test]
fn wraparound_east_edge() {
    let mut world = empty_world();
    // move along heading, then photosynthesize in place forever
    let tape = genome(&[12, 2, 16, 0]);
    world
        .spawn_life(Position::new(9, 4), tape, Direction::East, 50.0)
        .unwrap();

    world.tick();

    assert!(world.get(Position::new(9, 4)).unwrap().is_empty());
    let moved = world.get(Position::new(0, 4)).unwrap();
    assert_eq!(moved.kind(), CellKind::Life);
    assert_eq!(moved.position, Position::new(0, 4));
}

#[test]
fn no_neighbor_above_top_row() {
    let mut world = empty_world();
    // absent (code 6) jumps to gene 7, which photosynthesizes in place
    let tape = genome(&[12, 0, 0, 0, 0, 0, 7, 16, 0]);
    let pos = Position::new(5, 0);
    world.spawn_life(pos, tape, Direction::North, 50.0).unwrap();

    world.tick();

    let life = life_at(&world, pos);
    assert_eq!(life.pc.index(), 7);
    assert!(world.neighbor(pos, Direction::North).is_none());
}

#[test]
fn attack_kills_weaker_neighbor() {
    let mut world = empty_world();
    let attacker_pos = Position::new(5, 5);
    let defender_pos = Position::new(6, 5);
    // chemosynthesis finds no minerals this high up; it only ends the turn
    world
        .spawn_life(defender_pos, genome(&[47]), Direction::West, 80.0)
        .unwrap();
    world
        .spawn_life(attacker_pos, genome(&[18]), Direction::East, 100.0)
        .unwrap();

    world.tick();

    let attacker = life_at(&world, attacker_pos);
    let defender = life_at(&world, defender_pos);
    assert!(!defender.is_alive());
    assert_eq!(defender.energy, 0.0);
    let expected = 100.0 + (80.0 - 3.01) / 2.0 - 3.01;
    assert!((attacker.energy - expected).abs() < 1e-3);

    // the dead defender is cleared when the next scan reaches it
    world.tick();
    assert!(world.get(defender_pos).unwrap().is_empty());
}

#[test]
fn same_seed_same_history() {
    let mut config = SimConfig::default();
    config.world.width = 30;
    config.world.height = 80;
    config.seed = 9;
    config.life.mutation_chance = 1.0;

    let mut a = World::new(config.clone()).unwrap();
    let mut b = World::new(config).unwrap();
    a.run(150);
    b.run(150);

    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.stats(), b.stats());
}

proptest! {
    #[test]
    fn prop_donation_conserves_energy(energy in 10.0f32..190.0, reserve in 10.0f32..100.0) {
        let mut world = empty_world();
        let donor_pos = Position::new(5, 5);
        let recipient_pos = Position::new(4, 5);
        // donate forward; the foreign code jumps to a no-op chemosynthesis
        let donor = genome(&[32, 0, 0, 0, 0, 6, 47]);
        world.spawn_life(donor_pos, donor, Direction::West, energy).unwrap();
        world.spawn_life(recipient_pos, genome(&[47]), Direction::East, reserve).unwrap();

        world.tick();

        let donor = life_at(&world, donor_pos);
        let recipient = life_at(&world, recipient_pos);
        prop_assert!((donor.energy - (energy / 2.0 - 3.01)).abs() < 1e-3);
        prop_assert!((recipient.energy - (reserve + energy / 2.0 - 3.01)).abs() < 1e-3);
    }

    #[test]
    fn prop_duplication_conserves_energy(energy in 200.0f32..500.0, seed in any::<u64>()) {
        let mut config = SimConfig::default();
        config.world.width = 10;
        config.world.height = 10;
        config.seed = seed;
        config.life.mutation_chance = 1.0;
        let mut world = World::new(config).unwrap();
        world.wipe();

        let parent_pos = Position::new(5, 5);
        world.spawn_life(parent_pos, filler(), Direction::North, energy).unwrap();
        world.tick();

        let child = life_at(&world, Position::new(6, 5));
        let parent = life_at(&world, parent_pos);
        prop_assert_eq!(child.energy, energy / 2.0);
        prop_assert!((parent.energy + 3.01 - energy / 2.0).abs() < 1e-3);
        prop_assert!(parent.genome.mismatches(&child.genome) <= 1);
    }

    #[test]
    fn prop_horizontal_wrap(y in 0i32..10, x in 0i32..10) {
        let world = empty_world();
        let pos = Position::new(x, y);
        let east = world.neighbor(pos, Direction::East).unwrap();
        prop_assert_eq!(east.position, Position::new((x + 1) % 10, y));
        let west = world.neighbor(pos, Direction::West).unwrap();
        prop_assert_eq!(west.position, Position::new((x + 9) % 10, y));
        prop_assert_eq!(world.neighbor(pos, Direction::North).is_none(), y == 0);
        prop_assert_eq!(world.neighbor(pos, Direction::South).is_none(), y == 9);
    }
}
