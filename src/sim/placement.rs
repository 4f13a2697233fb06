/// Entity placement on a generated map.
///
/// Every placement materializes its candidate cells first and samples an
/// index, so an impossible placement is reported instead of spinning.

use rand::Rng;

use crate::domain::entity::{Enemy, Item, Player};
use crate::domain::grid::{Grid, Pos};
use crate::domain::island::Island;
use crate::domain::tile::Tile;
use crate::error::GameError;

fn pick<T: Copy>(candidates: &[T], rng: &mut impl Rng) -> Option<T> {
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.gen_range(0..candidates.len())])
    }
}

/// Put the player on a random cell of a random island.
///
/// Only islands with room for the boat (two or more cells) are eligible.
/// Returns the player and the index of the chosen island.
pub fn place_player(islands: &[Island], rng: &mut impl Rng) -> Result<(Player, usize), GameError> {
    let eligible: Vec<usize> = (0..islands.len()).filter(|&i| islands[i].len() >= 2).collect();
    let idx = pick(&eligible, rng).ok_or_else(|| {
        GameError::Placement("no island has room for both the player and the boat".into())
    })?;
    let cell = pick(&islands[idx].cells, rng)
        .ok_or_else(|| GameError::Placement("chosen island has no cells".into()))?;
    Ok((Player::new(cell), idx))
}

/// Put the boat on the player's own island, off the player's cell.
pub fn place_boat(home: &Island, player: Pos, rng: &mut impl Rng) -> Result<Item, GameError> {
    let candidates: Vec<Pos> = home.cells.iter().copied().filter(|&p| p != player).collect();
    pick(&candidates, rng)
        .map(Item::boat)
        .ok_or_else(|| GameError::Placement("no free cell for the boat".into()))
}

/// Scatter `count` treasures over all island cells, never on the player and
/// never on a cell already holding an item (including earlier treasures).
pub fn place_treasures(
    islands: &[Island],
    player: Pos,
    existing: &[Item],
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Item>, GameError> {
    let mut candidates: Vec<Pos> = islands
        .iter()
        .flat_map(|i| i.cells.iter().copied())
        .filter(|&p| p != player && !existing.iter().any(|it| it.pos == p))
        .collect();

    let mut placed = Vec::with_capacity(count);
    for n in 0..count {
        if candidates.is_empty() {
            return Err(GameError::Placement(format!(
                "only room for {n} of {count} treasures"
            )));
        }
        let pos = candidates.swap_remove(rng.gen_range(0..candidates.len()));
        placed.push(Item::treasure(pos));
    }
    Ok(placed)
}

/// Drop `count` enemies on any Land cell except the player's.
/// Enemies may share cells with each other and with items.
pub fn place_enemies(
    grid: &Grid,
    player: Pos,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Enemy>, GameError> {
    if count == 0 {
        return Ok(vec![]);
    }
    let candidates: Vec<Pos> = grid
        .cells_of(Tile::Land)
        .into_iter()
        .filter(|&p| p != player)
        .collect();
    if candidates.is_empty() {
        return Err(GameError::Placement("no land left for enemies".into()));
    }
    Ok((0..count)
        .map(|_| Enemy::new(candidates[rng.gen_range(0..candidates.len())]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::ItemKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn island(cells: &[(usize, usize)]) -> Island {
        let cells: Vec<Pos> = cells.iter().map(|&(r, c)| Pos::new(r, c)).collect();
        Island { seed: cells[0], max_size: cells.len(), cells }
    }

    #[test]
    fn player_skips_single_cell_islands() {
        let islands = vec![island(&[(0, 0)]), island(&[(2, 2), (2, 3)]), island(&[(4, 4)])];
        for seed in 0..50 {
            let (player, idx) = place_player(&islands, &mut rng(seed)).unwrap();
            assert_eq!(idx, 1);
            assert!(islands[1].contains(player.pos));
            assert!(!player.has_boat);
        }
    }

    #[test]
    fn player_needs_a_two_cell_island() {
        let islands = vec![island(&[(0, 0)]), island(&[(3, 3)])];
        assert!(matches!(place_player(&islands, &mut rng(0)), Err(GameError::Placement(_))));
    }

    #[test]
    fn boat_is_on_home_island_but_not_under_player() {
        let home = island(&[(1, 1), (1, 2), (2, 1)]);
        for seed in 0..50 {
            let boat = place_boat(&home, Pos::new(1, 1), &mut rng(seed)).unwrap();
            assert_eq!(boat.kind, ItemKind::Boat);
            assert_ne!(boat.pos, Pos::new(1, 1));
            assert!(home.contains(boat.pos));
        }
    }

    #[test]
    fn boat_fails_on_lone_cell() {
        let home = island(&[(1, 1)]);
        assert!(place_boat(&home, Pos::new(1, 1), &mut rng(0)).is_err());
    }

    #[test]
    fn treasures_avoid_player_and_other_items() {
        let islands = vec![island(&[(0, 0), (0, 1), (0, 2)]), island(&[(3, 0), (3, 1), (3, 2), (3, 3)])];
        let player = Pos::new(0, 0);
        let boat = Item::boat(Pos::new(0, 1));
        for seed in 0..50 {
            let treasures = place_treasures(&islands, player, &[boat], 5, &mut rng(seed)).unwrap();
            assert_eq!(treasures.len(), 5);
            let cells: HashSet<Pos> = treasures.iter().map(|t| t.pos).collect();
            assert_eq!(cells.len(), 5);
            assert!(!cells.contains(&player));
            assert!(!cells.contains(&boat.pos));
            assert!(treasures.iter().all(|t| t.kind == ItemKind::Treasure));
        }
    }

    #[test]
    fn too_many_treasures_is_reported() {
        let islands = vec![island(&[(0, 0), (0, 1), (0, 2)])];
        let err = place_treasures(&islands, Pos::new(0, 0), &[], 3, &mut rng(3)).unwrap_err();
        assert_eq!(err, GameError::Placement("only room for 2 of 3 treasures".into()));
    }

    #[test]
    fn enemies_land_off_player() {
        let grid = Grid::from_diagram(&[
            "##.",
            "...",
            ".##",
        ]);
        let player = Pos::new(0, 0);
        for seed in 0..50 {
            let enemies = place_enemies(&grid, player, 3, &mut rng(seed)).unwrap();
            assert_eq!(enemies.len(), 3);
            for e in &enemies {
                assert!(grid.is_land(e.pos));
                assert_ne!(e.pos, player);
            }
        }
    }

    #[test]
    fn no_enemies_requested_needs_no_land() {
        let grid = Grid::from_diagram(&["#"]);
        assert!(place_enemies(&grid, Pos::new(0, 0), 0, &mut rng(0)).unwrap().is_empty());
        assert!(place_enemies(&grid, Pos::new(0, 0), 1, &mut rng(0)).is_err());
    }
}
