//! Pack grouping.
//!
//! Regroups already-placed enemies into packs. A pack consumes existing
//! spawns and never adds any, so the enemy count is exactly preserved.
//! Members are pulled toward an anchor spawn; a member that finds no valid
//! spot within its attempts keeps its original position but still joins.

use std::f32::consts::TAU;

use voidline_core::{Weighted, ZoneRng};
use voidline_shared::Vec2;

use super::{Clearance, Layout};
use crate::config::{PackComposition, PackTemplateTable};
use crate::zone::{EnemyKind, EnemySpawn, Patrol, PatrolStyle};

/// Groups a fraction of `enemies` into packs. Returns the pack count.
pub(crate) fn group_into_packs(
    enemies: &mut [EnemySpawn],
    layout: &Layout,
    clearance: Clearance,
    table: &PackTemplateTable,
    tier_pool: &[Weighted<EnemyKind>],
    rng: &mut ZoneRng,
) -> u32 {
    let templates = table.weighted();
    if templates.is_empty() || enemies.len() < 2 {
        return 0;
    }

    let target = (enemies.len() as f32 * table.pack_fraction).floor() as usize;
    let mut order: Vec<usize> = (0..enemies.len()).collect();
    rng.shuffle(&mut order);

    let mut cursor = 0;
    let mut pack_id = 0;
    while cursor + 2 <= target {
        let Some(template) = rng.pick_weighted(&templates).copied() else {
            break;
        };
        let wanted = match &template.composition {
            PackComposition::Fixed { members } => members.len(),
            PackComposition::Free { size_min, size_max, .. } => {
                rng.int(*size_min as i32, *size_max as i32).max(0) as usize
            }
        };
        let size = wanted.min(target - cursor);
        if size < 2 {
            break;
        }

        let members = &order[cursor..cursor + size];
        cursor += size;

        let anchor = enemies[members[0]].position;
        let mut placed = vec![anchor];
        for (slot, &idx) in members.iter().enumerate() {
            let spawn = &mut enemies[idx];
            spawn.kind = member_kind(&template.composition, slot, tier_pool, rng).unwrap_or(spawn.kind);
            spawn.pack_id = Some(pack_id);
            spawn.patrol = Patrol { style: PatrolStyle::Wander, radius: table.pack_radius };

            if slot == 0 {
                continue;
            }
            if let Some(p) = find_member_spot(anchor, &placed, layout, clearance, table, rng) {
                spawn.position = p;
                placed.push(p);
            }
        }
        pack_id += 1;
    }

    pack_id
}

fn member_kind(
    composition: &PackComposition,
    slot: usize,
    tier_pool: &[Weighted<EnemyKind>],
    rng: &mut ZoneRng,
) -> Option<EnemyKind> {
    match composition {
        PackComposition::Fixed { members } => members.get(slot % members.len().max(1)).copied(),
        PackComposition::Free { pool, .. } if !pool.is_empty() => rng.pick(pool).copied(),
        PackComposition::Free { .. } => rng.pick_weighted(tier_pool).copied(),
    }
}

fn find_member_spot(
    anchor: Vec2,
    placed: &[Vec2],
    layout: &Layout,
    clearance: Clearance,
    table: &PackTemplateTable,
    rng: &mut ZoneRng,
) -> Option<Vec2> {
    for _ in 0..table.attempts_per_member {
        let direction = Vec2::from_angle(rng.range(0.0, TAU));
        let p = anchor + direction * rng.range(table.member_spacing, table.pack_radius);
        if !layout.bounds.contains(p) || !layout.is_clear(p, clearance) {
            continue;
        }
        if placed.iter().all(|q| q.distance(p) >= table.member_spacing) {
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PackTemplate, TierConfig};
    use crate::placement::scatter;
    use voidline_core::ZoneSeed;

    fn layout() -> Layout {
        Layout::new(3000.0, 2000.0, 80.0, Vec2::new(80.0, 1000.0), vec![Vec2::new(2920.0, 1000.0)])
    }

    fn spawns(count: u32, rng: &mut ZoneRng) -> Vec<EnemySpawn> {
        let clearance = Clearance { spawn: 300.0, exit: 200.0 };
        scatter(&layout(), count, 90.0, clearance, rng)
            .into_iter()
            .map(|p| EnemySpawn::new(p, EnemyKind::Drone, Patrol { style: PatrolStyle::Idle, radius: 50.0 }))
            .collect()
    }

    #[test]
    fn test_grouping_preserves_count() {
        let mut rng = ZoneRng::new(ZoneSeed::new(77));
        let mut enemies = spawns(40, &mut rng);
        let before = enemies.len();
        let clearance = Clearance { spawn: 300.0, exit: 200.0 };

        let packs = group_into_packs(
            &mut enemies,
            &layout(),
            clearance,
            &PackTemplateTable::default(),
            &TierConfig::asteroid_belt().enemy_pool,
            &mut rng,
        );

        assert!(packs > 0);
        assert_eq!(enemies.len(), before);
        let grouped = enemies.iter().filter(|e| e.pack_id.is_some()).count();
        assert!(grouped <= (before as f32 * 0.35) as usize);
        for e in &enemies {
            assert!(layout().is_clear(e.position, clearance));
        }
    }

    #[test]
    fn test_fixed_composition_applied() {
        let mut rng = ZoneRng::new(ZoneSeed::new(3));
        let mut enemies = spawns(30, &mut rng);
        let table = PackTemplateTable {
            pack_fraction: 1.0,
            templates: vec![PackTemplate {
                name: "pair".into(),
                weight: 1.0,
                composition: PackComposition::Fixed { members: vec![EnemyKind::Bulwark, EnemyKind::Sniper] },
            }],
            ..PackTemplateTable::default()
        };

        let packs = group_into_packs(&mut enemies, &layout(), Clearance::NONE, &table, &[], &mut rng);
        assert_eq!(packs as usize, enemies.len() / 2);
        for pack in 0..packs {
            let kinds: Vec<EnemyKind> = enemies.iter().filter(|e| e.pack_id == Some(pack)).map(|e| e.kind).collect();
            assert_eq!(kinds.len(), 2);
            assert!(kinds.contains(&EnemyKind::Bulwark));
            assert!(kinds.contains(&EnemyKind::Sniper));
        }
    }

    #[test]
    fn test_no_templates_no_packs() {
        let mut rng = ZoneRng::new(ZoneSeed::new(3));
        let mut enemies = spawns(10, &mut rng);
        let table = PackTemplateTable { templates: Vec::new(), ..PackTemplateTable::default() };
        assert_eq!(group_into_packs(&mut enemies, &layout(), Clearance::NONE, &table, &[], &mut rng), 0);
        assert!(enemies.iter().all(|e| e.pack_id.is_none()));
    }
}
