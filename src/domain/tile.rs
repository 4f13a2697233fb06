/// The two terrain kinds of an archipelago map.
/// Land is always walkable; Water only once the player holds the boat.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Water,
    Land,
}

impl Tile {
    pub fn is_land(self) -> bool {
        matches!(self, Tile::Land)
    }

    /// Can the player step onto this tile?
    /// Land always; Water only once the boat has been collected.
    pub fn is_walkable(self, has_boat: bool) -> bool {
        match self {
            Tile::Land => true,
            Tile::Water => has_boat,
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Water
    }
}
