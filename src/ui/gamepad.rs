/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (one step per press / stick flick)
///   Start                 →  New map
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,      // South
    B,      // East
    X,      // West
    Y,      // North
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Dominant stick direction outside the deadzone. gilrs reports +Y as up.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}

struct ActionMap {
    new_game: Vec<Btn>,
    quit: Vec<Btn>,
}

impl ActionMap {
    /// Unknown names are skipped; an empty result keeps the default.
    fn apply(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let ng = parse_list(&cfg.new_game);
        if !ng.is_empty() { self.new_game = ng; }
        let q = parse_list(&cfg.quit);
        if !q.is_empty() { self.quit = q; }
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            new_game: vec![Btn::Start],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons that went down this frame.
    just_pressed: Vec<Btn>,
    /// Steps requested this frame (d-pad presses and stick flicks).
    steps: Vec<Direction>,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<Direction>,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                tracing::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: Vec::with_capacity(4),
            steps: Vec::with_capacity(4),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.apply(cfg);
    }

    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.steps.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    tracing::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    tracing::info!("gamepad disconnected");
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        // A stick counts once per flick: only a change of direction steps.
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.steps.push(d);
            }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, btn: Button) {
        let step = match btn {
            Button::DPadUp => Some(Direction::Up),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(d) = step {
            self.steps.push(d);
        } else if let Some(b) = Btn::from_gilrs(btn) {
            self.just_pressed.push(b);
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|b| self.just_pressed.contains(b))
    }

    pub fn directions(&self) -> &[Direction] {
        &self.steps
    }

    pub fn new_game_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.new_game)
    }

    pub fn quit_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.quit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_deadzone_and_dominant_axis() {
        assert_eq!(stick_direction(0.1, -0.2), None);
        assert_eq!(stick_direction(0.9, 0.3), Some(Direction::Right));
        assert_eq!(stick_direction(-0.7, 0.1), Some(Direction::Left));
        assert_eq!(stick_direction(0.2, 0.8), Some(Direction::Up));
        assert_eq!(stick_direction(0.0, -0.6), Some(Direction::Down));
    }

    #[test]
    fn button_names_parse() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_keep_defaults_on_garbage() {
        let mut map = ActionMap::default();
        map.apply(&GamepadConfig {
            new_game: vec!["A".into()],
            quit: vec!["nonsense".into()],
        });
        assert_eq!(map.new_game, vec![Btn::A]);
        assert_eq!(map.quit, vec![Btn::Select]);
    }
}
