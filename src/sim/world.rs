/// GameState: the complete snapshot of a running game.
///
/// ## Lifecycle
///
/// Built once by `new_game` (generation + placement), then mutated in
/// place by `step::attempt_move` and `step::tick_enemies`. The phase
/// leaves `Active` exactly once; after that both transitions are no-ops.
///
/// ## Layering
///
/// `cell_view` answers "what is drawn here": player, else item, else
/// enemy, else the tile. Renderers use it instead of re-deriving the order.

use rand::Rng;

use crate::config::WorldConfig;
use crate::domain::entity::{Enemy, Item, ItemKind, Player};
use crate::domain::grid::{Grid, Pos};
use crate::domain::island::Island;
use crate::domain::tile::Tile;
use crate::error::GameError;

use super::generate::generate;
use super::placement;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Active,
    Won,
    Lost,
}

/// What occupies a cell from the viewer's point of view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellView {
    Player,
    Item(ItemKind),
    Enemy,
    Terrain(Tile),
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub grid: Grid,
    pub islands: Vec<Island>,
    pub player: Player,
    pub items: Vec<Item>,
    pub enemies: Vec<Enemy>,
    pub phase: Phase,
    pub treasure_total: usize,
    /// Move attempts processed while active.
    pub moves: u32,
    /// Enemy ticks processed while active.
    pub ticks: u64,
}

// ── Construction ──

impl GameState {
    /// Generate a map and populate it.
    pub fn new_game(config: &WorldConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        config.validate()?;

        let (grid, islands) = generate(
            config.rows,
            config.cols,
            config.island_count,
            config.max_island_size,
            rng,
        )?;

        let (player, home) = placement::place_player(&islands, rng)?;
        let boat = placement::place_boat(&islands[home], player.pos, rng)?;
        let mut items = vec![boat];
        let treasures =
            placement::place_treasures(&islands, player.pos, &items, config.treasure_count, rng)?;
        items.extend(treasures);
        let enemies = placement::place_enemies(&grid, player.pos, config.enemy_count, rng)?;

        tracing::debug!(
            player = ?player.pos,
            boat = ?boat.pos,
            treasures = config.treasure_count,
            enemies = enemies.len(),
            land = grid.land_count(),
            "placed entities"
        );

        Ok(GameState::from_parts(grid, islands, player, items, enemies))
    }

    /// Assemble a state from already-placed parts.
    pub fn from_parts(
        grid: Grid,
        islands: Vec<Island>,
        player: Player,
        items: Vec<Item>,
        enemies: Vec<Enemy>,
    ) -> Self {
        let treasure_total = items.iter().filter(|i| i.kind == ItemKind::Treasure).count();
        GameState {
            grid,
            islands,
            player,
            items,
            enemies,
            phase: Phase::Active,
            treasure_total,
            moves: 0,
            ticks: 0,
        }
    }
}

// ── Queries ──

impl GameState {
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn treasures_remaining(&self) -> usize {
        self.items.iter().filter(|i| i.kind == ItemKind::Treasure).count()
    }

    pub fn treasures_collected(&self) -> usize {
        self.treasure_total.saturating_sub(self.treasures_remaining())
    }

    /// First item at `pos`, in placement order.
    pub fn item_at(&self, pos: Pos) -> Option<&Item> {
        self.items.iter().find(|i| i.pos == pos)
    }

    pub fn enemy_at(&self, pos: Pos) -> bool {
        self.enemies.iter().any(|e| e.pos == pos)
    }

    /// Index of the island containing `pos`, if any.
    pub fn island_of(&self, pos: Pos) -> Option<usize> {
        self.islands.iter().position(|island| island.contains(pos))
    }

    pub fn cell_view(&self, pos: Pos) -> CellView {
        if self.player.pos == pos {
            CellView::Player
        } else if let Some(item) = self.item_at(pos) {
            CellView::Item(item.kind)
        } else if self.enemy_at(pos) {
            CellView::Enemy
        } else {
            CellView::Terrain(self.grid.tile_at(pos))
        }
    }
}
