/// Movement rules: tile-only legality queries, no state mutation.
///
/// The step module asks these questions; it never inspects tiles itself.

use super::entity::{Enemy, Player};
use super::grid::{Direction, Grid, Pos, WANDER_DIRS};

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

/// Where the player would land moving one cell in `dir`, if that is legal.
///
/// Legal means in-bounds and walkable: Land always, Water only with the boat.
pub fn player_target(grid: &Grid, player: &Player, dir: Direction) -> Option<Pos> {
    let next = grid.offset(player.pos, dir.delta())?;
    grid.tile_at(next).is_walkable(player.has_boat).then_some(next)
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

/// In-bounds Land neighbors of `pos`, in up/down/left/right order.
pub fn enemy_moves(grid: &Grid, pos: Pos) -> Vec<Pos> {
    WANDER_DIRS
        .iter()
        .filter_map(|&d| grid.offset(pos, d))
        .filter(|&p| grid.is_land(p))
        .collect()
}

/// Does any enemy share the player's cell?
pub fn is_captured(player: Pos, enemies: &[Enemy]) -> bool {
    enemies.iter().any(|e| e.pos == player)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
