use derivative::Derivative;
use tracing::trace;

use crate::{
    clock::VsyncTimer,
    config::MachineConfig,
    cpu::{Pins, Tick},
    input::Inputs,
    palette::Palette,
    rom::RomSet,
    slot::{MemoryMap, OPEN_BUS},
};

pub const PALETTE_START: u16 = 0x9C00;
pub const PALETTE_END: u16 = 0x9D00;
pub const VIDEO_RAM: u16 = 0x9000;
pub const COLOR_RAM: u16 = 0x9400;
pub const BACKGROUND_SELECT: u16 = 0x9E00;

// +---------------+-----------------------------------------------+
// | Range         | Description                                   |
// +---------------+-----------------------------------------------+
// | 0x0000-0x7FFF | ROM                                           |
// | 0x8000-0x8FFF | RAM                                           |
// | 0x9000-0x93FF | video RAM                                     |
// | 0x9400-0x97FF | color RAM                                     |
// | 0x9820-0x987F | sprite RAM                                    |
// | 0x9C00-0x9CFF | palette (128 x xxxxBBBBGGGGRRRR)              |
// | 0x9E00        | background select                             |
// | 0xB000        | R: joystick 1, W: NMI mask                    |
// | 0xB001        | R: joystick 2                                 |
// | 0xB002        | R: coins and start buttons                    |
// | 0xB003        | ???                                           |
// | 0xB004        | R: dip-switches 1, W: flip screen             |
// | 0xB005        | R: dip-switches 2                             |
// | 0xB800        | sound latch                                   |
// | 0xC000-0xDFFF | ROM                                           |
// +---------------+-----------------------------------------------+

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MainRegion {
    Palette,
    Joystick1,
    Joystick2,
    System,
    Reserved,
    Dsw1,
    Dsw2,
    SoundLatch,
    Memory,
}

/// Address decoding for memory requests, in priority order.
fn decode(address: u16) -> MainRegion {
    match address {
        PALETTE_START..=0x9CFF => MainRegion::Palette,
        0xB000 => MainRegion::Joystick1,
        0xB001 => MainRegion::Joystick2,
        0xB002 => MainRegion::System,
        0xB003 => MainRegion::Reserved,
        0xB004 => MainRegion::Dsw1,
        0xB005 => MainRegion::Dsw2,
        0xB800 => MainRegion::SoundLatch,
        _ => MainRegion::Memory,
    }
}

/// Main board: Z80 bus, I/O ports, palette and vsync NMI.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct MainBoard {
    pub inputs: Inputs,
    pub dsw1: u8,
    pub dsw2: u8,
    pub vsync: VsyncTimer,
    #[derivative(Debug = "ignore")]
    pub palette: Palette,
    #[derivative(Debug = "ignore")]
    mem: MemoryMap,
}

impl MainBoard {
    pub fn new(config: &MachineConfig, roms: &RomSet) -> Self {
        let (low, high) = roms.main_program().split_at(0x8000);
        let mut mem = MemoryMap::new();
        mem.map_rom(0x0000, 0x8000, low)
            .map_ram(0x8000, 0x2000)
            .map_rom(0xC000, 0x2000, high);

        Self {
            inputs: Inputs::new(),
            dsw1: config.dsw1,
            dsw2: config.dsw2,
            vsync: VsyncTimer::new(config.vsync_period()),
            palette: Palette::new(),
            mem,
        }
    }

    pub fn reset(&mut self) {
        self.vsync.reset();
        self.palette.reset();
        self.mem.clear_ram();
    }

    pub fn memory(&self) -> &MemoryMap {
        &self.mem
    }

    /// Reads memory without bus side effects, as the video hardware does.
    pub fn peek(&self, address: u16) -> u8 {
        self.mem.read(address)
    }

    pub fn mem_read(&mut self, address: u16) -> u8 {
        self.tick(0, Pins::mem_read(address)).data
    }

    pub fn mem_write(&mut self, address: u16, data: u8) {
        self.tick(0, Pins::mem_write(address, data));
    }

    fn memory_request(&mut self, mut pins: Pins) -> Pins {
        let address = pins.address;
        match decode(address) {
            MainRegion::Palette => {
                if pins.rd {
                    pins.data = self.mem.read(address);
                } else if pins.wr {
                    self.mem.write(address, pins.data);
                    self.palette.write(address - PALETTE_START, pins.data);
                }
            }
            MainRegion::Joystick1 => {
                if pins.rd {
                    pins.data = self.inputs.joystick1;
                } else if pins.wr {
                    self.vsync.set_nmi_mask(pins.data);
                }
            }
            MainRegion::Joystick2 => {
                if pins.rd {
                    pins.data = self.inputs.joystick2;
                } else if pins.wr {
                    trace!("[BUS] Ignored write to joystick 2 port: {:02X}", pins.data);
                }
            }
            MainRegion::System => {
                if pins.rd {
                    pins.data = self.inputs.system;
                } else if pins.wr {
                    trace!("[BUS] Ignored write to system port: {:02X}", pins.data);
                }
            }
            MainRegion::Reserved => {}
            MainRegion::Dsw1 => {
                if pins.rd {
                    pins.data = self.dsw1;
                } else if pins.wr {
                    // TODO: flip screen once the video side of the flip is documented
                    trace!("[BUS] Flip screen: {:02X}", pins.data);
                }
            }
            MainRegion::Dsw2 => {
                if pins.rd {
                    pins.data = self.dsw2;
                } else if pins.wr {
                    trace!("[BUS] Ignored write to 0xB005: {:02X}", pins.data);
                }
            }
            MainRegion::SoundLatch => {
                // TODO: forward to the sound board once its latch address is known
                if pins.rd {
                    trace!("[BUS] Read sound latch");
                } else if pins.wr {
                    trace!("[BUS] Write sound latch: {:02X}", pins.data);
                }
            }
            MainRegion::Memory => {
                if pins.rd {
                    pins.data = self.mem.read(address);
                } else if pins.wr {
                    self.mem.write(address, pins.data);
                }
            }
        }
        pins
    }
}

impl Tick for MainBoard {
    fn tick(&mut self, cycles: u32, mut pins: Pins) -> Pins {
        if self.vsync.advance(cycles) {
            pins.nmi = true;
        }
        if !self.vsync.nmi_enabled() {
            pins.nmi = false;
        }

        if pins.mreq {
            pins = self.memory_request(pins);
        } else if pins.iorq {
            trace!("[BUS] IO: {:04X}", pins.address);
            if pins.rd {
                pins.data = OPEN_BUS;
            }
        }
        pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> MainBoard {
        MainBoard::new(&MachineConfig::default(), &RomSet::empty())
    }

    #[test]
    fn test_decode_priority() {
        assert_eq!(decode(0x9BFF), MainRegion::Memory);
        assert_eq!(decode(0x9C00), MainRegion::Palette);
        assert_eq!(decode(0x9CFF), MainRegion::Palette);
        assert_eq!(decode(0x9D00), MainRegion::Memory);
        assert_eq!(decode(0xB003), MainRegion::Reserved);
        assert_eq!(decode(0xB006), MainRegion::Memory);
        assert_eq!(decode(0xB800), MainRegion::SoundLatch);
    }

    #[test]
    fn test_palette_region_read_back() {
        let mut board = board();
        for address in PALETTE_START..PALETTE_END {
            let data = (address as u8).wrapping_mul(7);
            board.mem_write(address, data);
            assert_eq!(board.mem_read(address), data);
        }
    }

    #[test]
    fn test_palette_write_encodes_color() {
        let mut board = board();
        board.mem_write(0x9C00, 0x53);
        board.mem_write(0x9C01, 0x0A);
        assert_eq!(board.palette.color(0), 0xFFAA_5533);
        assert_eq!(board.palette.color(1), 0xFF00_0000);
    }

    #[test]
    fn test_io_ports_read() {
        let mut board = board();
        board.inputs.joystick1 = 0x21;
        board.inputs.joystick2 = 0x04;
        board.inputs.system = 0x05;
        board.dsw2 = 0x3C;

        assert_eq!(board.mem_read(0xB000), 0x21);
        assert_eq!(board.mem_read(0xB001), 0x04);
        assert_eq!(board.mem_read(0xB002), 0x05);
        assert_eq!(board.mem_read(0xB004), 0xC0);
        assert_eq!(board.mem_read(0xB005), 0x3C);
    }

    #[test]
    fn test_reserved_port_leaves_data_lines() {
        let mut board = board();
        let mut pins = Pins::mem_read(0xB003);
        pins.data = 0x5A;
        assert_eq!(board.tick(0, pins).data, 0x5A);
    }

    #[test]
    fn test_io_port_writes_keep_state() {
        let mut board = board();
        board.inputs.joystick2 = 0x08;
        for address in [0xB001, 0xB002, 0xB003, 0xB004, 0xB005, 0xB800] {
            board.mem_write(address, 0xFF);
        }
        assert_eq!(board.inputs.joystick2, 0x08);
        assert_eq!(board.inputs.system, 0);
        assert_eq!(board.dsw1, 0xC0);
        assert_eq!(board.dsw2, 0);
        assert_eq!(board.vsync.nmi_mask(), 0);
    }

    #[test]
    fn test_nmi_mask_write() {
        let mut board = board();
        board.mem_write(0xB000, 0x01);
        assert_eq!(board.vsync.nmi_mask(), 0x01);
        // reading 0xB000 returns the joystick, not the mask
        assert_eq!(board.mem_read(0xB000), 0x00);
    }

    #[test]
    fn test_ram_and_rom() {
        let mut roms = RomSet::empty();
        roms.load_image("09_j01b.bin", &[0x3E; 0x2000]).unwrap();
        roms.load_image("13.1r", &[0xC9; 0x2000]).unwrap();
        let mut board = MainBoard::new(&MachineConfig::default(), &roms);

        assert_eq!(board.mem_read(0x0000), 0x3E);
        assert_eq!(board.mem_read(0xDFFF), 0xC9);
        board.mem_write(0x0000, 0x00);
        assert_eq!(board.mem_read(0x0000), 0x3E);

        board.mem_write(0x8123, 0x77);
        assert_eq!(board.mem_read(0x8123), 0x77);
        assert_eq!(board.peek(0x8123), 0x77);

        assert_eq!(board.mem_read(0xE000), OPEN_BUS);
    }

    #[test]
    fn test_vsync_nmi_delivery() {
        let mut board = board();
        let period = board.vsync.period();

        let pins = board.tick(period, Pins::mem_read(0x8000));
        assert!(!pins.nmi);

        board.mem_write(0xB000, 1);
        let pins = board.tick(period - 1, Pins::mem_read(0x8000));
        assert!(!pins.nmi);
        let pins = board.tick(1, Pins::mem_read(0x8000));
        assert!(pins.nmi);
        assert_eq!(board.vsync.count(), 0);
    }

    #[test]
    fn test_masked_nmi_is_cleared() {
        let mut board = board();
        let mut pins = Pins::mem_read(0x8000);
        pins.nmi = true;
        assert!(!board.tick(4, pins).nmi);
    }

    #[test]
    fn test_io_request() {
        let mut board = board();
        let pins = board.tick(4, Pins::io_read(0x00));
        assert_eq!(pins.data, OPEN_BUS);
        board.tick(4, Pins::io_write(0x00, 0x12));
        assert_eq!(board.mem_read(0x0000), 0x00);
    }

    #[test]
    fn test_reset() {
        let mut board = board();
        board.mem_write(0x9C00, 0xFF);
        board.mem_write(0xB000, 1);
        board.reset();
        assert_eq!(board.mem_read(0x9C00), 0);
        assert_eq!(board.palette.color(0), 0xFF00_0000);
        assert_eq!(board.vsync.nmi_mask(), 0);
    }
}
