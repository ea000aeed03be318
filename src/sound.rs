use tracing::trace;

use crate::{
    config::MachineConfig,
    cpu::{Pins, Tick},
    psg::AY38910,
    rom::RomSet,
    slot::{MemoryMap, OPEN_BUS},
};

pub const PSG_COUNT: usize = 3;

// +---------------+-----------------------------------------------+
// | Range         | Description                                   |
// +---------------+-----------------------------------------------+
// | 0x0000-0x1FFF | ROM                                           |
// | 0x4000-0x43FF | RAM                                           |
// +---------------+-----------------------------------------------+
//
// The sound latch and the chip selects of the three PSGs are not decoded
// yet; I/O reads float and I/O writes are dropped.

/// Sound board: Z80 with local RAM and three AY-3-8910.
#[derive(Debug)]
pub struct SoundBoard {
    pub psg: [AY38910; PSG_COUNT],
    mem: MemoryMap,
}

impl SoundBoard {
    pub fn new(config: &MachineConfig, roms: &RomSet) -> Self {
        let mut mem = MemoryMap::new();
        mem.map_rom(0x0000, 0x2000, roms.sound_program())
            .map_ram(0x4000, 0x0400);

        Self {
            psg: std::array::from_fn(|_| AY38910::new(config.psg_clock_hz)),
            mem,
        }
    }

    pub fn reset(&mut self) {
        for psg in &mut self.psg {
            psg.reset();
        }
        self.mem.clear_ram();
    }

    pub fn memory(&self) -> &MemoryMap {
        &self.mem
    }
}

impl Tick for SoundBoard {
    fn tick(&mut self, _cycles: u32, mut pins: Pins) -> Pins {
        if pins.mreq {
            if pins.rd {
                pins.data = self.mem.read(pins.address);
            } else if pins.wr {
                self.mem.write(pins.address, pins.data);
            }
        } else if pins.iorq {
            if pins.rd {
                trace!("[SOUND] Unresolved I/O read {:04X}", pins.address);
                pins.data = OPEN_BUS;
            } else if pins.wr {
                trace!("[SOUND] Unresolved I/O write {:04X} = {:02X}", pins.address, pins.data);
            }
        }
        pins
    }
}
