/// Map generation: carve `island_count` disjoint islands into an all-water grid.
///
/// Each seed is drawn uniformly from the cells that are still Water, so a
/// seed is never placed on an existing island and there is no retry loop.
/// The generator owns the grid; each island's claimed cells are applied
/// with `Grid::claim` before the next island is grown.

use rand::Rng;

use crate::domain::grid::Grid;
use crate::domain::island::Island;
use crate::domain::tile::Tile;
use crate::error::GameError;

pub fn generate(
    rows: usize,
    cols: usize,
    island_count: usize,
    max_island_size: usize,
    rng: &mut impl Rng,
) -> Result<(Grid, Vec<Island>), GameError> {
    if rows == 0 || cols == 0 {
        return Err(GameError::Generation(format!("degenerate {rows}x{cols} grid")));
    }

    let mut grid = Grid::new(rows, cols);
    let mut islands = Vec::with_capacity(island_count);

    for n in 0..island_count {
        let free = grid.cells_of(Tile::Water);
        if free.is_empty() {
            return Err(GameError::Generation(format!(
                "no water left to seed island {} of {}",
                n + 1,
                island_count
            )));
        }
        let seed = free[rng.gen_range(0..free.len())];
        let island = Island::grow(&grid, seed, max_island_size);
        if island.is_empty() {
            return Err(GameError::Generation(format!(
                "island {} claimed no cells from seed ({}, {})",
                n + 1,
                seed.row,
                seed.col
            )));
        }
        grid.claim(&island.cells);
        tracing::debug!(
            island = n,
            row = seed.row,
            col = seed.col,
            size = island.len(),
            "grew island"
        );
        islands.push(island);
    }

    Ok((grid, islands))
}
