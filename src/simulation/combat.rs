//! Combat phase: desperate pigeons fight whoever they bump into

use crate::ecs::world::{pair_mut, World};
use crate::entity::pigeon::Pigeon;
use crate::simulation::tick::SimulationEvent;

/// Two pigeons fight when closer than this on both axes
pub const FIGHT_RANGE: f64 = 5.0;

fn in_reach(a: &Pigeon, b: &Pigeon) -> bool {
    let (pa, pb) = (a.position(), b.position());
    (pa.x - pb.x).abs() < FIGHT_RANGE && (pa.y - pb.y).abs() < FIGHT_RANGE
}

/// Let every desperate pigeon attack the homeless pigeons next to it
///
/// A fight between two desperate pigeons happens once per frame: the one
/// earlier in the table starts it. Losers are removed as soon as they fall;
/// an attacker that falls stops scanning.
pub fn resolve_fights(world: &mut World, events: &mut Vec<SimulationEvent>) {
    let n = world.pigeons.len();

    for i in 0..n {
        if !world.alive[i] || !world.pigeons[i].is_desperate() {
            continue;
        }

        for j in 0..n {
            if j == i || !world.alive[j] {
                continue;
            }

            let (attacker, defender) = (&world.pigeons[i], &world.pigeons[j]);
            let counted_already = defender.is_desperate() && j < i;
            if counted_already
                || !attacker.is_homeless()
                || !defender.is_homeless()
                || !in_reach(attacker, defender)
            {
                continue;
            }

            let (attacker, defender) = pair_mut(&mut world.pigeons, i, j);
            let outcome = attacker.attack(defender, &mut world.rng);
            let (attacker_id, defender_id) = (attacker.id(), defender.id());
            let (attacker_dead, defender_dead) = (attacker.is_dead(), defender.is_dead());

            if defender_dead {
                world.remove_at(j);
                tracing::trace!(pigeon = ?defender_id, by = ?attacker_id, "Killed in combat");
                events.push(SimulationEvent::KilledInCombat {
                    pigeon: defender_id,
                    by: outcome.attacker_ate.then_some(attacker_id),
                });
            }
            if attacker_dead {
                world.remove_at(i);
                tracing::trace!(pigeon = ?attacker_id, by = ?defender_id, "Killed in combat");
                events.push(SimulationEvent::KilledInCombat {
                    pigeon: attacker_id,
                    by: outcome.defender_ate.then_some(defender_id),
                });
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{EntityId, Gender, HoleId, Vec2};

    fn empty_world() -> World {
        World::new(SimulationConfig {
            initial_pigeons: 0,
            predator_count: 0,
            seed: Some(21),
            ..SimulationConfig::default()
        })
        .unwrap()
    }

    fn fighter(x: f64, y: f64, fullness: f64) -> Pigeon {
        Pigeon::default()
            .with_stats(20.0, 3.0, 1.5)
            .with_fullness(fullness)
            .with_position(Vec2::new(x, y))
    }

    fn health(world: &World, id: EntityId) -> f64 {
        world.pigeon(id).map(Pigeon::health).unwrap_or(f64::NAN)
    }

    #[test]
    fn test_only_desperate_pigeons_start_fights() {
        let mut world = empty_world();
        let a = world.add(fighter(100.0, 100.0, 0.3));
        let b = world.add(fighter(102.0, 102.0, 0.3));

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);
        assert_eq!(health(&world, a), 20.0);
        assert_eq!(health(&world, b), 20.0);
    }

    #[test]
    fn test_desperate_pigeon_attacks_neighbour_once() {
        let mut world = empty_world();
        let a = world.add(fighter(100.0, 100.0, 0.1));
        let b = world.add(fighter(104.0, 96.0, 0.6));
        let far = world.add(fighter(105.0, 100.0, 0.6));

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);
        assert_eq!(health(&world, a), 17.0);
        assert_eq!(health(&world, b), 17.0);
        assert_eq!(health(&world, far), 20.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_two_desperate_pigeons_fight_once() {
        let mut world = empty_world();
        let a = world.add(fighter(100.0, 100.0, 0.1));
        let b = world.add(fighter(101.0, 101.0, 0.1));

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);
        assert_eq!(health(&world, a), 17.0);
        assert_eq!(health(&world, b), 17.0);
    }

    #[test]
    fn test_sheltered_pigeons_do_not_fight() {
        let mut world = empty_world();
        let template = Pigeon::default().with_gender(Gender::Female);
        let entrance = world.entrance_of(HoleId(0), &template).unwrap();
        let hidden = world.add(
            template
                .with_stats(20.0, 3.0, 1.5)
                .with_position(entrance),
        );
        world.shelter(hidden, HoleId(0)).unwrap();
        let hunter = world.add(fighter(entrance.x + 1.0, entrance.y, 0.1));

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);
        assert_eq!(health(&world, hidden), 20.0);
        assert_eq!(health(&world, hunter), 20.0);
    }

    #[test]
    fn test_loser_is_removed_and_eaten() {
        let mut world = empty_world();
        let hunter = world.add(
            Pigeon::default()
                .with_stats(20.0, 6.0, 1.0)
                .with_fullness(0.1)
                .with_position(Vec2::new(200.0, 200.0)),
        );
        let prey = world.add(
            Pigeon::default()
                .with_stats(20.0, 1.0, 1.0)
                .with_health(5.0)
                .with_position(Vec2::new(201.0, 200.0)),
        );

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);

        assert!(!world.is_living(prey));
        assert_eq!(world.size(), 1);
        assert_eq!(
            events,
            vec![SimulationEvent::KilledInCombat {
                pigeon: prey,
                by: Some(hunter)
            }]
        );
        assert_eq!(world.pigeon(hunter).map(Pigeon::fullness), Some(1.5));
    }

    #[test]
    fn test_equal_knockout_removes_only_defender() {
        let mut world = empty_world();
        let attacker = world.add(
            Pigeon::default()
                .with_stats(20.0, 5.0, 1.0)
                .with_health(3.0)
                .with_fullness(0.1)
                .with_position(Vec2::new(400.0, 400.0)),
        );
        let defender = world.add(
            Pigeon::default()
                .with_stats(20.0, 5.0, 1.0)
                .with_health(3.0)
                .with_fullness(0.6)
                .with_position(Vec2::new(402.0, 401.0)),
        );

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);

        assert_eq!(
            events,
            vec![SimulationEvent::KilledInCombat {
                pigeon: defender,
                by: Some(attacker)
            }]
        );
        assert!(world.is_living(attacker));
        assert!(!world.is_living(defender));
        assert_eq!(health(&world, attacker), 8.0);
    }

    #[test]
    fn test_fallen_attacker_stops_scanning() {
        let mut world = empty_world();
        let weak = world.add(
            Pigeon::default()
                .with_stats(20.0, 1.0, 1.0)
                .with_health(2.0)
                .with_fullness(0.1)
                .with_position(Vec2::new(300.0, 300.0)),
        );
        let strong = world.add(
            Pigeon::default()
                .with_stats(20.0, 6.0, 1.0)
                .with_position(Vec2::new(301.0, 300.0)),
        );
        let bystander = world.add(fighter(300.0, 301.0, 0.8));

        let mut events = Vec::new();
        resolve_fights(&mut world, &mut events);

        assert!(!world.is_living(weak));
        assert_eq!(world.pigeon(strong).map(Pigeon::fullness), Some(1.5));
        assert_eq!(health(&world, bystander), 20.0);
        assert_eq!(
            events,
            vec![SimulationEvent::KilledInCombat {
                pigeon: weak,
                by: Some(strong)
            }]
        );
    }
}
