/// Events emitted by a move or an enemy tick.
/// The presentation layer turns these into log lines and sound.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    BoatCollected,
    TreasureCollected { remaining: usize },
    Won(String),
    Lost(String),
}

pub const BOAT_MESSAGE: &str = "You have collected the boat! Now you can move over water.";
pub const WIN_MESSAGE: &str = "You collected all the treasures! You win!";
pub const LOSE_MESSAGE: &str = "Game Over! An enemy caught you.";

impl GameEvent {
    pub fn won() -> Self {
        GameEvent::Won(WIN_MESSAGE.to_string())
    }

    pub fn lost() -> Self {
        GameEvent::Lost(LOSE_MESSAGE.to_string())
    }

    /// Is this a terminal outcome?
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Won(_) | GameEvent::Lost(_))
    }

    /// Text for the message log.
    pub fn message(&self) -> String {
        match self {
            GameEvent::BoatCollected => BOAT_MESSAGE.to_string(),
            GameEvent::TreasureCollected { remaining: 0 } => "You found the last treasure!".to_string(),
            GameEvent::TreasureCollected { remaining } => {
                format!("You found a treasure! {remaining} left.")
            }
            GameEvent::Won(msg) | GameEvent::Lost(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn treasure_messages_count_down() {
        let msg = |remaining| GameEvent::TreasureCollected { remaining }.message();
        assert_eq!(msg(3), "You found a treasure! 3 left.");
        assert_eq!(msg(1), "You found a treasure! 1 left.");
        assert_eq!(msg(0), "You found the last treasure!");
    }

    #[test]
    fn terminal_events_carry_exact_texts() {
        assert_eq!(GameEvent::BoatCollected.message(), BOAT_MESSAGE);
        assert_eq!(GameEvent::won().message(), WIN_MESSAGE);
        assert_eq!(GameEvent::lost().message(), LOSE_MESSAGE);
        assert!(GameEvent::won().is_terminal());
        assert!(!GameEvent::BoatCollected.is_terminal());
    }
}
