/// Session: the single owner of a `GameState`.
///
/// Input and timers never touch the state directly. They `submit` commands
/// into a FIFO queue and the game loop calls `pump`, which applies them one
/// at a time. Once the game is won or lost, queued moves and ticks are
/// discarded; only `NewGame` is honored.

use std::collections::VecDeque;

use rand::Rng;

use crate::config::WorldConfig;
use crate::domain::grid::Direction;
use crate::error::GameError;
use super::event::GameEvent;
use super::message_log::MessageLog;
use super::step;
use super::world::GameState;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(Direction),
    Tick,
    NewGame,
}

pub struct Session<R: Rng> {
    config: WorldConfig,
    rng: R,
    state: GameState,
    log: MessageLog,
    queue: VecDeque<Command>,
    games_started: u32,
}

impl<R: Rng> Session<R> {
    pub fn new(config: WorldConfig, mut rng: R) -> Result<Self, GameError> {
        let state = GameState::new_game(&config, &mut rng)?;
        let mut session = Session {
            config,
            rng,
            state,
            log: MessageLog::new(),
            queue: VecDeque::new(),
            games_started: 1,
        };
        session.log_intro();
        Ok(session)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn submit(&mut self, cmd: Command) {
        self.queue.push_back(cmd);
    }

    /// Apply every queued command in order and return the events produced.
    ///
    /// A failed `NewGame` keeps the current game, reports the error in the
    /// message log and discards the rest of the queue. Events produced
    /// before the failure are still returned.
    pub fn pump(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        while let Some(cmd) = self.queue.pop_front() {
            let produced = match cmd {
                Command::Move(dir) if self.state.is_active() => step::attempt_move(&mut self.state, dir),
                Command::Tick if self.state.is_active() => step::tick_enemies(&mut self.state, &mut self.rng),
                Command::Move(_) | Command::Tick => {
                    tracing::trace!(?cmd, "dropped command after game end");
                    continue;
                }
                Command::NewGame => {
                    if let Err(e) = self.restart() {
                        tracing::error!(dropped = self.queue.len(), "new map failed: {e}");
                        self.log.push(format!("Could not raise a new map: {e}"));
                        self.queue.clear();
                    }
                    continue;
                }
            };
            for event in &produced {
                tracing::info!(?event, "game event");
                if event.is_terminal() {
                    tracing::info!(moves = self.state.moves, ticks = self.state.ticks, "game over");
                }
                self.log.push(event.message());
            }
            events.extend(produced);
        }
        events
    }

    fn restart(&mut self) -> Result<(), GameError> {
        let state = GameState::new_game(&self.config, &mut self.rng)?;
        self.state = state;
        self.games_started += 1;
        tracing::info!(game = self.games_started, "new map generated");
        self.log_intro();
        Ok(())
    }

    fn log_intro(&mut self) {
        self.log.push(format!(
            "A new archipelago rises. Find the boat and collect all {} treasures!",
            self.state.treasure_total
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Item, Player};
    use crate::domain::grid::{Grid, Pos};
    use crate::sim::world::Phase;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session(seed: u64) -> Session<ChaCha8Rng> {
        Session::new(WorldConfig::default(), ChaCha8Rng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn starts_with_intro_line() {
        let s = session(1);
        assert_eq!(s.log().len(), 1);
        assert!(s.is_active());
        assert_eq!(s.games_started(), 1);
    }

    #[test]
    fn commands_apply_in_order_and_log_events() {
        let mut s = session(2);
        s.state = GameState::from_parts(
            Grid::from_diagram(&["###"]),
            vec![],
            Player::new(Pos::new(0, 0)),
            vec![Item::boat(Pos::new(0, 1)), Item::treasure(Pos::new(0, 2))],
            vec![],
        );

        s.submit(Command::Move(Direction::Right));
        s.submit(Command::Tick);
        s.submit(Command::Move(Direction::Right));
        let events = s.pump();
        assert_eq!(
            events,
            vec![
                GameEvent::BoatCollected,
                GameEvent::TreasureCollected { remaining: 0 },
                GameEvent::won(),
            ]
        );
        assert_eq!(s.log().len(), 4);
        assert_eq!(s.state().moves, 2);
        assert_eq!(s.state().ticks, 1);
        assert_eq!(s.state().phase, Phase::Won);
    }

    #[test]
    fn terminal_state_drops_moves_and_ticks() {
        let mut s = session(3);
        s.state.phase = Phase::Lost;
        let before = s.state.player.clone();
        s.submit(Command::Move(Direction::Up));
        s.submit(Command::Tick);
        assert!(s.pump().is_empty());
        assert_eq!(s.state().player, before);
        assert_eq!(s.state().ticks, 0);
        assert_eq!(s.log().len(), 1);
    }

    #[test]
    fn new_game_replaces_finished_state() {
        let mut s = session(4);
        s.state.phase = Phase::Won;
        s.submit(Command::NewGame);
        s.pump();
        assert!(s.is_active());
        assert_eq!(s.games_started(), 2);
        assert_eq!(s.state().treasures_remaining(), 5);
        assert_eq!(s.log().len(), 2);
    }

    #[test]
    fn failed_new_game_keeps_earlier_events_and_clears_queue() {
        let mut s = session(5);
        s.state = GameState::from_parts(
            Grid::from_diagram(&["###"]),
            vec![],
            Player::new(Pos::new(0, 0)),
            vec![Item::boat(Pos::new(0, 1)), Item::treasure(Pos::new(0, 2))],
            vec![],
        );
        s.config = WorldConfig { rows: 0, ..WorldConfig::default() };

        s.submit(Command::Move(Direction::Right));
        s.submit(Command::NewGame);
        s.submit(Command::Move(Direction::Right));
        let events = s.pump();

        assert_eq!(events, vec![GameEvent::BoatCollected]);
        assert_eq!(s.games_started(), 1);
        assert_eq!(s.state().player.pos, Pos::new(0, 1));
        assert_eq!(s.state().moves, 1);
        assert!(s.is_active());
        // intro, boat, failure notice
        assert_eq!(s.log().len(), 3);
        assert!(s.pump().is_empty());
    }

    #[test]
    fn invalid_config_fails_up_front() {
        let config = WorldConfig { cols: 0, ..WorldConfig::default() };
        let result = Session::new(config, ChaCha8Rng::seed_from_u64(0));
        assert!(matches!(result, Err(GameError::Config(_))));
    }
}
