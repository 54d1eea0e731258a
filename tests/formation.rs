use std::collections::BTreeMap;

use galaga_tui::game::{
    Direction, EnemyManager, EnemyTier, IdAllocator, Playfield, ENEMIES_PER_ROW,
};

fn field() -> Playfield {
    Playfield::new(800.0, 600.0)
}

#[test]
fn rows_are_centred() {
    let mut manager = EnemyManager::new(field());
    let ships = manager.create_and_place_enemy_ships(1, &mut IdAllocator::default());
    assert_eq!(ships.len(), ENEMIES_PER_ROW.iter().sum::<usize>());

    let mut rows: BTreeMap<usize, Vec<f32>> = BTreeMap::new();
    for ship in &ships {
        rows.entry(ship.row).or_default().push(ship.body.center_x());
    }
    for (row, xs) in rows {
        assert_eq!(xs.len(), ENEMIES_PER_ROW[row]);
        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        assert!((mean - 400.0).abs() < 1e-3, "row {row} centred at {mean}");
    }
}

#[test]
fn tiers_follow_rows() {
    let mut manager = EnemyManager::new(field());
    let ships = manager.create_and_place_enemy_ships(2, &mut IdAllocator::default());
    for ship in &ships {
        assert_eq!(ship.tier, EnemyTier::for_row(ship.row));
        assert_eq!(ship.score_value, ship.tier.index() * 2);
    }
    assert!(ships.iter().all(|s| !s.is_bonus()));
}

#[test]
fn directions_split_on_later_levels() {
    let mut manager = EnemyManager::new(field());
    manager.create_and_place_enemy_ships(1, &mut IdAllocator::default());
    assert_eq!(manager.row_direction(0), manager.row_direction(1));

    manager.create_and_place_enemy_ships(2, &mut IdAllocator::default());
    assert_ne!(manager.row_direction(0), manager.row_direction(1));
    assert_eq!(manager.row_direction(0), Some(Direction::Left));

    manager.create_and_place_enemy_ships(3, &mut IdAllocator::default());
    assert_eq!(manager.row_speed(1), manager.row_speed(0).map(|s| s * 2.0));
}

#[test]
fn formation_stays_on_the_field() {
    for level in 1..=3 {
        let mut manager = EnemyManager::new(field());
        let mut ships = manager.create_and_place_enemy_ships(level, &mut IdAllocator::default());
        let mut turns = 0;
        for _ in 0..2_000 {
            if manager.move_enemy_ships(&mut ships) {
                turns += 1;
            }
            for ship in &ships {
                assert!(ship.body.x() >= 0.0, "level {level}: left edge crossed");
                assert!(ship.body.right() <= 800.0, "level {level}: right edge crossed");
            }
        }
        assert!(turns > 0, "level {level} never turned");
    }
}

#[test]
fn every_row_turns_together() {
    let mut manager = EnemyManager::new(field());
    let mut ships = manager.create_and_place_enemy_ships(3, &mut IdAllocator::default());
    let rows = ENEMIES_PER_ROW.len();
    let mut turns = 0;
    for _ in 0..1_000 {
        let before: Vec<_> = (0..rows).map(|r| manager.row_direction(r)).collect();
        let turned = manager.move_enemy_ships(&mut ships);
        let after: Vec<_> = (0..rows).map(|r| manager.row_direction(r)).collect();
        if turned {
            turns += 1;
            for row in 0..rows {
                assert_eq!(after[row], before[row].map(Direction::flipped));
            }
        } else {
            assert_eq!(before, after);
        }
    }
    assert!(turns > 1);
}
