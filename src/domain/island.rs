/// Island growth: bounded breadth-first flood fill from a seed cell.
///
/// Growth reads the grid but never writes it. `Island::grow` returns the
/// island with the cells it claims; the caller applies them with
/// `Grid::claim`, so later islands see earlier ones as Land and can only
/// expand into still-Water cells.

use std::collections::{HashSet, VecDeque};

use super::grid::{Grid, Pos, GROWTH_DIRS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Island {
    /// Member cells in discovery order. `cells[0]` is the seed when non-empty.
    pub cells: Vec<Pos>,
    pub seed: Pos,
    pub max_size: usize,
}

impl Island {
    /// Grow an island from `seed` over the Water cells of `grid`.
    ///
    /// Neighbors are scanned east, south, west, north; scanning stops the
    /// moment the island reaches `max_size`. A seed that is off-grid or
    /// already Land yields an island with no cells.
    pub fn grow(grid: &Grid, seed: Pos, max_size: usize) -> Island {
        let mut island = Island { cells: Vec::new(), seed, max_size };
        if !grid.in_bounds(seed) || grid.is_land(seed) {
            return island;
        }

        let mut claimed: HashSet<Pos> = HashSet::with_capacity(max_size);
        let mut frontier: VecDeque<Pos> = VecDeque::with_capacity(max_size);
        claimed.insert(seed);
        island.cells.push(seed);
        frontier.push_back(seed);

        while island.cells.len() < max_size {
            let Some(here) = frontier.pop_front() else { break };
            for &dir in &GROWTH_DIRS {
                let Some(next) = grid.offset(here, dir) else { continue };
                if grid.is_land(next) || claimed.contains(&next) {
                    continue;
                }
                claimed.insert(next);
                island.cells.push(next);
                frontier.push_back(next);
                if island.cells.len() >= max_size {
                    break;
                }
            }
        }

        island
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.cells.contains(&pos)
    }

    /// Every member is reachable from the first cell through 4-neighbor
    /// steps that stay inside the island.
    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.cells.first() else { return true };
        let members: HashSet<Pos> = self.cells.iter().copied().collect();
        let mut seen: HashSet<Pos> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            for &(dr, dc) in &GROWTH_DIRS {
                let r = p.row as i64 + dr as i64;
                let c = p.col as i64 + dc as i64;
                if r < 0 || c < 0 {
                    continue;
                }
                let n = Pos::new(r as usize, c as usize);
                if members.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grow_and_claim(grid: &mut Grid, seed: Pos, max: usize) -> Island {
        let island = Island::grow(grid, seed, max);
        grid.claim(&island.cells);
        island
    }

    #[test]
    fn single_cell_at_corner() {
        let mut g = Grid::new(3, 3);
        let island = grow_and_claim(&mut g, Pos::new(0, 0), 1);
        assert_eq!(island.cells, vec![Pos::new(0, 0)]);
        assert!(g.is_land(Pos::new(0, 0)));
        assert_eq!(g.land_count(), 1);
    }

    #[test]
    fn grows_to_four_from_center() {
        let mut g = Grid::new(3, 3);
        let island = grow_and_claim(&mut g, Pos::new(1, 1), 4);
        assert_eq!(island.len(), 4);
        assert_eq!(g.land_count(), 4);
    }

    #[test]
    fn truncation_follows_east_south_west_north() {
        let g = Grid::new(3, 3);
        let island = Island::grow(&g, Pos::new(1, 1), 4);
        assert_eq!(
            island.cells,
            vec![Pos::new(1, 1), Pos::new(1, 2), Pos::new(2, 1), Pos::new(1, 0)]
        );
    }

    #[test]
    fn respects_max_size() {
        let mut g = Grid::new(3, 3);
        let island = grow_and_claim(&mut g, Pos::new(1, 1), 2);
        assert_eq!(island.len(), 2);
        assert_eq!(g.land_count(), 2);
    }

    #[test]
    fn fills_whole_grid() {
        let mut g = Grid::new(3, 3);
        let island = grow_and_claim(&mut g, Pos::new(0, 0), 9);
        assert_eq!(island.len(), 9);
        assert_eq!(g.land_count(), 9);
        assert!(island.is_connected());
    }

    #[test]
    fn land_seed_yields_empty_island() {
        let g = Grid::from_diagram(&["#..", "...", "..."]);
        let island = Island::grow(&g, Pos::new(0, 0), 2);
        assert!(island.is_empty());
        assert_eq!(g.land_count(), 1);
    }

    #[test]
    fn does_not_grow_into_existing_land() {
        let mut g = Grid::from_diagram(&[
            ".#...",
            ".#...",
            ".#...",
        ]);
        let island = grow_and_claim(&mut g, Pos::new(0, 0), 10);
        assert_eq!(island.len(), 3);
        assert!(island.cells.iter().all(|p| p.col == 0));
        assert!(island.is_connected());
    }

    #[test]
    fn walled_in_seed_stays_single() {
        let g = Grid::from_diagram(&[
            "###",
            "#.#",
            "###",
        ]);
        let island = Island::grow(&g, Pos::new(1, 1), 5);
        assert_eq!(island.cells, vec![Pos::new(1, 1)]);
    }

    #[test]
    fn disconnected_cells_detected() {
        let island = Island {
            cells: vec![Pos::new(0, 0), Pos::new(2, 2)],
            seed: Pos::new(0, 0),
            max_size: 2,
        };
        assert!(!island.is_connected());
    }
}
