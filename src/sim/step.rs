/// The two state transitions: a player move attempt and an enemy tick.
///
/// Move processing order:
///   1. Movement (illegal moves are silent no-ops)
///   2. Boat pickup
///   3. Treasure collection + win check
///   4. Capture check (skipped once won)
///
/// Tick processing order:
///   1. Each enemy steps to a random Land neighbor (or stays put)
///   2. Capture check
///
/// Both return the events they produced. In a terminal phase they return
/// nothing and leave the state untouched.

use rand::Rng;

use crate::domain::entity::ItemKind;
use crate::domain::grid::Direction;
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Entry points
// ══════════════════════════════════════════════════════════════

pub fn attempt_move(state: &mut GameState, dir: Direction) -> Vec<GameEvent> {
    if state.phase != Phase::Active { return vec![]; }

    let mut events = Vec::new();
    state.moves += 1;

    resolve_player_movement(state, dir);
    resolve_boat_pickup(state, &mut events);
    resolve_treasure(state, &mut events);
    if state.phase == Phase::Active {
        resolve_capture(state, &mut events);
    }

    events
}

pub fn tick_enemies(state: &mut GameState, rng: &mut impl Rng) -> Vec<GameEvent> {
    if state.phase != Phase::Active { return vec![]; }

    let mut events = Vec::new();
    state.ticks += 1;

    resolve_enemy_movement(state, rng);
    resolve_capture(state, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

fn resolve_player_movement(state: &mut GameState, dir: Direction) {
    if let Some(next) = rules::player_target(&state.grid, &state.player, dir) {
        state.player.pos = next;
    }
}

fn resolve_boat_pickup(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let here = state.player.pos;
    let on_boat = state.items.iter().any(|i| i.kind == ItemKind::Boat && i.pos == here);
    if !on_boat { return; }

    state.player.has_boat = true;
    state.items.retain(|i| i.kind != ItemKind::Boat);
    tracing::debug!(item = ItemKind::Boat.name(), row = here.row, col = here.col, "picked up");
    events.push(GameEvent::BoatCollected);
}

fn resolve_treasure(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let here = state.player.pos;
    let before = state.items.len();
    state.items.retain(|i| !(i.kind == ItemKind::Treasure && i.pos == here));
    let picked = before - state.items.len();

    let remaining = state.treasures_remaining();
    if picked > 0 {
        tracing::debug!(item = ItemKind::Treasure.name(), row = here.row, col = here.col, remaining, "picked up");
    }
    for _ in 0..picked {
        events.push(GameEvent::TreasureCollected { remaining });
    }
    if remaining == 0 {
        state.phase = Phase::Won;
        events.push(GameEvent::won());
    }
}

// ══════════════════════════════════════════════════════════════
// Enemies
// ══════════════════════════════════════════════════════════════

fn resolve_enemy_movement(state: &mut GameState, rng: &mut impl Rng) {
    for i in 0..state.enemies.len() {
        let moves = rules::enemy_moves(&state.grid, state.enemies[i].pos);
        if !moves.is_empty() {
            state.enemies[i].pos = moves[rng.gen_range(0..moves.len())];
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Capture
// ══════════════════════════════════════════════════════════════

fn resolve_capture(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if rules::is_captured(state.player.pos, &state.enemies) {
        state.phase = Phase::Lost;
        events.push(GameEvent::lost());
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Enemy, Item, Player};
    use crate::domain::grid::{Grid, Pos};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn p(row: usize, col: usize) -> Pos {
        Pos::new(row, col)
    }

    /// Build a state from a diagram. `'#'` = Land, `'.'` = Water.
    fn state(rows: &[&str], player: Pos, items: Vec<Item>, enemies: Vec<Pos>) -> GameState {
        let grid = Grid::from_diagram(rows);
        let enemies = enemies.into_iter().map(Enemy::new).collect();
        GameState::from_parts(grid, vec![], Player::new(player), items, enemies)
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(0xA11CE)
    }

    // ── Movement ──

    #[test]
    fn moves_across_land() {
        let mut s = state(&["###"], p(0, 0), vec![Item::treasure(p(0, 2))], vec![]);
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(s.player.pos, p(0, 1));
        assert!(events.is_empty());
    }

    #[test]
    fn water_blocks_until_boat_collected() {
        let mut s = state(
            &["##.#"],
            p(0, 0),
            vec![Item::boat(p(0, 1)), Item::treasure(p(0, 3))],
            vec![],
        );

        // Walk onto the boat.
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(events, vec![GameEvent::BoatCollected]);
        assert!(s.player.has_boat);
        assert!(s.items.iter().all(|i| i.kind != ItemKind::Boat));

        // Now water is passable.
        attempt_move(&mut s, Direction::Right);
        assert_eq!(s.player.pos, p(0, 2));
    }

    #[test]
    fn water_move_without_boat_is_silent_noop() {
        let mut s = state(
            &[
                "...",
                ".#.",
                "...",
            ],
            p(1, 1),
            vec![Item::treasure(p(0, 0))],
            vec![],
        );
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert!(attempt_move(&mut s, dir).is_empty());
            assert_eq!(s.player.pos, p(1, 1));
        }
        assert!(s.is_active());
    }

    #[test]
    fn off_grid_move_is_noop_even_with_boat() {
        let mut s = state(&["#."], p(0, 0), vec![Item::treasure(p(0, 1))], vec![]);
        s.player.has_boat = true;
        for dir in [Direction::Up, Direction::Down, Direction::Left] {
            assert!(attempt_move(&mut s, dir).is_empty());
            assert_eq!(s.player.pos, p(0, 0));
        }
    }

    // ── Treasure / win ──

    #[test]
    fn last_treasure_wins_once() {
        let mut s = state(&["##"], p(0, 0), vec![Item::treasure(p(0, 1))], vec![]);
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(
            events,
            vec![GameEvent::TreasureCollected { remaining: 0 }, GameEvent::won()]
        );
        assert_eq!(s.phase, Phase::Won);

        // Terminal: further calls change nothing and emit nothing.
        let snapshot = s.player.clone();
        assert!(attempt_move(&mut s, Direction::Left).is_empty());
        assert!(tick_enemies(&mut s, &mut rng()).is_empty());
        assert_eq!(s.player, snapshot);
        assert_eq!(s.phase, Phase::Won);
    }

    #[test]
    fn win_beats_capture_on_same_cell() {
        let mut s = state(&["##"], p(0, 0), vec![Item::treasure(p(0, 1))], vec![p(0, 1)]);
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(s.phase, Phase::Won);
        assert!(events.contains(&GameEvent::won()));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Lost(_))));
    }

    #[test]
    fn boat_and_treasure_collect_in_order() {
        let mut s = state(
            &["###"],
            p(0, 0),
            vec![Item::boat(p(0, 1)), Item::treasure(p(0, 1)), Item::treasure(p(0, 2))],
            vec![],
        );
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(
            events,
            vec![GameEvent::BoatCollected, GameEvent::TreasureCollected { remaining: 1 }]
        );
        assert_eq!(s.treasures_collected(), 1);
    }

    // ── Capture ──

    #[test]
    fn walking_into_enemy_loses() {
        let mut s = state(&["###"], p(0, 0), vec![Item::treasure(p(0, 2))], vec![p(0, 1)]);
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(events, vec![GameEvent::lost()]);
        assert_eq!(s.phase, Phase::Lost);
        assert!(attempt_move(&mut s, Direction::Right).is_empty());
        assert_eq!(s.player.pos, p(0, 1));
    }

    #[test]
    fn blocked_move_still_checks_capture() {
        let mut s = state(&["#."], p(0, 0), vec![Item::treasure(p(0, 1))], vec![p(0, 0)]);
        let events = attempt_move(&mut s, Direction::Right);
        assert_eq!(events, vec![GameEvent::lost()]);
    }

    // ── Enemy tick ──

    #[test]
    fn enemies_stay_on_land() {
        let mut s = state(
            &[
                "##..#",
                "#.###",
                "###.#",
            ],
            p(0, 4),
            vec![Item::treasure(p(2, 4))],
            vec![p(2, 0), p(1, 3), p(0, 0)],
        );
        let mut r = rng();
        for _ in 0..500 {
            s.phase = Phase::Active;
            tick_enemies(&mut s, &mut r);
            for e in &s.enemies {
                assert!(s.grid.is_land(e.pos), "enemy on {:?}", e.pos);
            }
        }
    }

    #[test]
    fn stranded_enemy_stays_put() {
        let mut s = state(&["#.#"], p(0, 0), vec![Item::treasure(p(0, 0))], vec![p(0, 2)]);
        let events = tick_enemies(&mut s, &mut rng());
        assert!(events.is_empty());
        assert_eq!(s.enemies[0].pos, p(0, 2));
        assert_eq!(s.ticks, 1);
    }

    #[test]
    fn enemy_stepping_onto_player_captures() {
        // Only legal move for the enemy is onto the player.
        let mut s = state(&["##."], p(0, 0), vec![Item::treasure(p(0, 2))], vec![p(0, 1)]);
        let events = tick_enemies(&mut s, &mut rng());
        assert_eq!(s.enemies[0].pos, p(0, 0));
        assert_eq!(events, vec![GameEvent::lost()]);
        assert_eq!(s.phase, Phase::Lost);
    }

    #[test]
    fn enemies_may_overlap() {
        let mut s = state(
            &["###", "...", "..#"],
            p(2, 2),
            vec![Item::treasure(p(2, 2))],
            vec![p(0, 0), p(0, 2)],
        );
        // both enemies have exactly one move: onto (0,1)
        tick_enemies(&mut s, &mut rng());
        assert_eq!(s.enemies[0].pos, p(0, 1));
        assert_eq!(s.enemies[1].pos, p(0, 1));
    }
}
