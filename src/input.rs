use serde::{Deserialize, Serialize};

/// Joystick port bits, active high.
pub const JOY_RIGHT: u8 = 1 << 0;
pub const JOY_LEFT: u8 = 1 << 1;
pub const JOY_UP: u8 = 1 << 2;
pub const JOY_DOWN: u8 = 1 << 3;
pub const JOY_BUTTON: u8 = 1 << 5;

/// System port bits, active high.
pub const SYS_COIN1: u8 = 1 << 0;
pub const SYS_COIN2: u8 = 1 << 1;
pub const SYS_START1: u8 = 1 << 2;
pub const SYS_START2: u8 = 1 << 3;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Port {
    Joystick1,
    Joystick2,
    System,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Mapping {
    key: &'static str,
    port: Port,
    bit: u8,
}

/// Host key state folded into the three input port bytes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Inputs {
    pub joystick1: u8,
    pub joystick2: u8,
    pub system: u8,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn key_down(&mut self, key: String) {
        if let Some(mapping) = find_mapping(&key) {
            *self.port_mut(mapping.port) |= mapping.bit;
        }
    }

    pub fn key_up(&mut self, key: String) {
        if let Some(mapping) = find_mapping(&key) {
            *self.port_mut(mapping.port) &= !mapping.bit;
        }
    }

    fn port_mut(&mut self, port: Port) -> &mut u8 {
        match port {
            Port::Joystick1 => &mut self.joystick1,
            Port::Joystick2 => &mut self.joystick2,
            Port::System => &mut self.system,
        }
    }
}

fn find_mapping(key: &str) -> Option<&'static Mapping> {
    let mapping = MAPPINGS.iter().find(|m| m.key == key);
    if mapping.is_none() {
        tracing::trace!("[INPUT] Unmapped key {}", key);
    }
    mapping
}

// Key names follow the DOM KeyboardEvent.code values sent by the web host.
static MAPPINGS: [Mapping; 16] = [
    Mapping { key: "ArrowRight", port: Port::Joystick1, bit: JOY_RIGHT },
    Mapping { key: "ArrowLeft", port: Port::Joystick1, bit: JOY_LEFT },
    Mapping { key: "ArrowUp", port: Port::Joystick1, bit: JOY_UP },
    Mapping { key: "ArrowDown", port: Port::Joystick1, bit: JOY_DOWN },
    Mapping { key: "Space", port: Port::Joystick1, bit: JOY_BUTTON },
    Mapping { key: "KeyD", port: Port::Joystick2, bit: JOY_RIGHT },
    Mapping { key: "KeyA", port: Port::Joystick2, bit: JOY_LEFT },
    Mapping { key: "KeyW", port: Port::Joystick2, bit: JOY_UP },
    Mapping { key: "KeyS", port: Port::Joystick2, bit: JOY_DOWN },
    Mapping { key: "ShiftLeft", port: Port::Joystick2, bit: JOY_BUTTON },
    Mapping { key: "Digit5", port: Port::System, bit: SYS_COIN1 },
    Mapping { key: "Digit6", port: Port::System, bit: SYS_COIN2 },
    Mapping { key: "Digit1", port: Port::System, bit: SYS_START1 },
    Mapping { key: "Digit2", port: Port::System, bit: SYS_START2 },
    Mapping { key: "Enter", port: Port::System, bit: SYS_START1 },
    Mapping { key: "Escape", port: Port::System, bit: SYS_COIN1 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_up() {
        let mut inputs = Inputs::new();
        inputs.key_down("ArrowLeft".to_string());
        inputs.key_down("Space".to_string());
        assert_eq!(inputs.joystick1, JOY_LEFT | JOY_BUTTON);

        inputs.key_up("ArrowLeft".to_string());
        assert_eq!(inputs.joystick1, JOY_BUTTON);
    }

    #[test]
    fn test_ports_are_separate() {
        let mut inputs = Inputs::new();
        inputs.key_down("KeyW".to_string());
        inputs.key_down("Digit5".to_string());
        inputs.key_down("Digit2".to_string());
        assert_eq!(inputs.joystick1, 0);
        assert_eq!(inputs.joystick2, JOY_UP);
        assert_eq!(inputs.system, SYS_COIN1 | SYS_START2);
    }

    #[test]
    fn test_unknown_key_ignored() {
        let mut inputs = Inputs::new();
        inputs.key_down("F13".to_string());
        assert_eq!(inputs, Inputs::default());
    }
}
