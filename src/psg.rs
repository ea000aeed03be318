use serde::{Deserialize, Serialize};
use tracing::trace;

const REG_ENABLE: usize = 7;
const REG_IO_PORT_A: usize = 14;
const REG_IO_PORT_B: usize = 15;

/// Significant bits of each AY-3-8910 register.
const REGISTER_MASKS: [u8; 16] = [
    0xFF, 0x0F, 0xFF, 0x0F, 0xFF, 0x0F, 0x1F, 0xFF, 0x1F, 0x1F, 0x1F, 0xFF, 0xFF, 0x0F, 0xFF, 0xFF,
];

/// Value read back from a parallel port configured as input.
pub const PORT_INPUT: u8 = 0xFF;

/// AY-3-8910 register file. Sound generation happens outside this crate.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AY38910 {
    registers: [u8; 16],
    selected_register: u8,
    clock_hz: u32,
}

impl AY38910 {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            registers: [0; 16],
            selected_register: 0,
            clock_hz,
        }
    }

    pub fn reset(&mut self) {
        self.registers = [0; 16];
        self.selected_register = 0;
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn select(&mut self, register: u8) {
        trace!("[psg] Selecting register {:02X}", register);
        self.selected_register = register & 0x0F;
    }

    pub fn selected_register(&self) -> u8 {
        self.selected_register
    }

    pub fn write_data(&mut self, data: u8) {
        let register = self.selected_register as usize;
        trace!("[psg] Writing {:02X} to register {:02X}", data, register);
        self.registers[register] = data & REGISTER_MASKS[register];

        if matches!(register, REG_IO_PORT_A | REG_IO_PORT_B) && self.port_is_output(register) {
            trace!("[psg] Port output {:02X} on register {:02X} ignored", data, register);
        }
    }

    pub fn read_data(&self) -> u8 {
        let register = self.selected_register as usize;
        match register {
            REG_IO_PORT_A | REG_IO_PORT_B if !self.port_is_output(register) => PORT_INPUT,
            _ => self.registers[register],
        }
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[(register & 0x0F) as usize]
    }

    fn port_is_output(&self, register: usize) -> bool {
        let bit = if register == REG_IO_PORT_A { 6 } else { 7 };
        self.registers[REG_ENABLE] & (1 << bit) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_masking() {
        let mut psg = AY38910::new(1_500_000);
        psg.select(1);
        psg.write_data(0xFF);
        assert_eq!(psg.read_data(), 0x0F);
        psg.select(0x10);
        assert_eq!(psg.selected_register(), 0);
    }

    #[test]
    fn test_input_port_reads_idle() {
        let mut psg = AY38910::new(1_500_000);
        psg.select(14);
        psg.write_data(0x12);
        assert_eq!(psg.read_data(), PORT_INPUT);

        psg.select(7);
        psg.write_data(0x40);
        psg.select(14);
        psg.write_data(0x12);
        assert_eq!(psg.read_data(), 0x12);
    }

    #[test]
    fn test_reset() {
        let mut psg = AY38910::new(1_500_000);
        psg.select(8);
        psg.write_data(0x0F);
        psg.reset();
        assert_eq!(psg.register(8), 0);
        assert_eq!(psg.clock_hz(), 1_500_000);
    }
}
