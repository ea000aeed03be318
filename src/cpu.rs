use std::fmt;

/// Z80 pin state for one bus cycle group.
///
/// The CPU core fills in the address, control lines and (on writes) the data
/// lines, the board answers by updating data and NMI.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Pins {
    pub address: u16,
    pub data: u8,
    /// Memory request
    pub mreq: bool,
    /// I/O request
    pub iorq: bool,
    pub rd: bool,
    pub wr: bool,
    /// Non-maskable interrupt, driven by the board
    pub nmi: bool,
}

impl Pins {
    pub fn mem_read(address: u16) -> Self {
        Self {
            address,
            mreq: true,
            rd: true,
            ..Default::default()
        }
    }

    pub fn mem_write(address: u16, data: u8) -> Self {
        Self {
            address,
            data,
            mreq: true,
            wr: true,
            ..Default::default()
        }
    }

    pub fn io_read(port: u16) -> Self {
        Self {
            address: port,
            iorq: true,
            rd: true,
            ..Default::default()
        }
    }

    pub fn io_write(port: u16, data: u8) -> Self {
        Self {
            address: port,
            data,
            iorq: true,
            wr: true,
            ..Default::default()
        }
    }
}

impl fmt::Debug for Pins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = if self.mreq {
            "MREQ"
        } else if self.iorq {
            "IORQ"
        } else {
            "----"
        };
        let direction = if self.rd {
            "RD"
        } else if self.wr {
            "WR"
        } else {
            "--"
        };
        write!(
            f,
            "Pins({} {} {:04X}={:02X}{})",
            request,
            direction,
            self.address,
            self.data,
            if self.nmi { " NMI" } else { "" }
        )
    }
}

/// Board side of the CPU bus.
pub trait Tick {
    /// Handles `cycles` clock cycles ending in the bus request described by
    /// `pins` and returns the updated pin state.
    fn tick(&mut self, cycles: u32, pins: Pins) -> Pins;
}

/// CPU core driving a board.
pub trait Cpu {
    /// Runs at least `ticks` clock cycles against `bus`, returning the number
    /// of cycles actually executed.
    fn exec<B: Tick>(&mut self, bus: &mut B, ticks: u32) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pins_debug() {
        let pins = Pins::mem_write(0x9C00, 0x53);
        assert_eq!(format!("{:?}", pins), "Pins(MREQ WR 9C00=53)");

        let mut pins = Pins::io_read(0x0010);
        pins.nmi = true;
        assert_eq!(format!("{:?}", pins), "Pins(IORQ RD 0010=00 NMI)");
    }
}
