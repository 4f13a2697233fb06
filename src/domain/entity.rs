/// Entities: Player, Enemy, Item.
/// Enemies carry no identity beyond their slot in the enemy list.

use super::grid::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub pos: Pos,
    pub has_boat: bool,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Player { pos, has_boat: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub pos: Pos,
}

impl Enemy {
    pub fn new(pos: Pos) -> Self {
        Enemy { pos }
    }
}

/// Pickup kinds. Every consumer matches exhaustively, so adding a kind
/// forces each pickup/render site to decide what it does with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Boat,
    Treasure,
}

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Boat => "boat",
            ItemKind::Treasure => "treasure",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            ItemKind::Boat => '⛵',
            ItemKind::Treasure => '💎',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Pos,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Pos) -> Self {
        Item { kind, pos }
    }

    pub fn boat(pos: Pos) -> Self {
        Item::new(ItemKind::Boat, pos)
    }

    pub fn treasure(pos: Pos) -> Self {
        Item::new(ItemKind::Treasure, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_starts_without_boat() {
        let p = Player::new(Pos::new(2, 3));
        assert!(!p.has_boat);
        assert_eq!(p.pos, Pos::new(2, 3));
    }

    #[test]
    fn item_kinds_have_distinct_glyphs() {
        assert_ne!(ItemKind::Boat.glyph(), ItemKind::Treasure.glyph());
        assert_eq!(Item::boat(Pos::new(0, 0)).kind.name(), "boat");
        assert_eq!(Item::treasure(Pos::new(0, 0)).kind.name(), "treasure");
    }
}
