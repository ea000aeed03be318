use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// Value seen on the data bus when nothing drives it.
pub const OPEN_BUS: u8 = 0xFF;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub enum SlotType {
    Empty,
    Ram(RamSlot),
    Rom(RomSlot),
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::Empty => write!(f, "Empty"),
            SlotType::Ram(slot) => write!(f, "RAM base={:#06X} size={:#06X}", slot.base, slot.size),
            SlotType::Rom(slot) => write!(f, "ROM base={:#06X} size={:#06X}", slot.base, slot.size),
        }
    }
}

impl SlotType {
    pub fn read(&self, address: u16) -> u8 {
        match self {
            SlotType::Empty => OPEN_BUS,
            SlotType::Ram(slot) => slot.read(address),
            SlotType::Rom(slot) => slot.read(address),
        }
    }

    pub fn write(&mut self, address: u16, value: u8) {
        match self {
            SlotType::Empty => {}
            SlotType::Ram(slot) => slot.write(address, value),
            SlotType::Rom(slot) => slot.write(address, value),
        }
    }

    pub fn base(&self) -> u16 {
        match self {
            SlotType::Empty => 0,
            SlotType::Ram(slot) => slot.base,
            SlotType::Rom(slot) => slot.base,
        }
    }

    pub fn size(&self) -> u32 {
        match self {
            SlotType::Empty => 0,
            SlotType::Ram(slot) => slot.size,
            SlotType::Rom(slot) => slot.size,
        }
    }

    pub fn contains(&self, address: u16) -> bool {
        let base = self.base() as u32;
        let address = address as u32;
        address >= base && address < base + self.size()
    }
}

pub trait Slot: Debug {
    fn read(&self, address: u16) -> u8;
    fn write(&mut self, address: u16, value: u8);
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct RomSlot {
    pub base: u16,
    pub size: u32,
    pub data: Vec<u8>,
}

impl RomSlot {
    pub fn new(rom: &[u8], base: u16, size: u32) -> Self {
        let mut data = vec![OPEN_BUS; size as usize];
        let len = rom.len().min(data.len());
        data[..len].copy_from_slice(&rom[..len]);

        RomSlot { base, size, data }
    }

    fn translate_address(&self, address: u16) -> usize {
        address.wrapping_sub(self.base) as usize
    }
}

impl Slot for RomSlot {
    fn read(&self, address: u16) -> u8 {
        let address = self.translate_address(address);
        self.data.get(address).copied().unwrap_or(OPEN_BUS)
    }

    fn write(&mut self, address: u16, _value: u8) {
        tracing::trace!("Attempt to write to ROM address {:#06X}", address);
    }
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct RamSlot {
    pub base: u16,
    pub size: u32,
    pub data: Vec<u8>,
}

impl RamSlot {
    pub fn new(base: u16, size: u32) -> Self {
        let data = vec![0; size as usize];
        RamSlot { base, data, size }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    fn translate_address(&self, address: u16) -> usize {
        address.wrapping_sub(self.base) as usize
    }
}

impl Slot for RamSlot {
    fn read(&self, address: u16) -> u8 {
        let address = self.translate_address(address);
        self.data.get(address).copied().unwrap_or(OPEN_BUS)
    }

    fn write(&mut self, address: u16, value: u8) {
        let address = self.translate_address(address);
        if let Some(byte) = self.data.get_mut(address) {
            *byte = value;
        }
    }
}

/// Fixed set of ROM and RAM regions making up a CPU address space.
///
/// Regions are configured once at board construction; lookups never allocate.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct MemoryMap {
    slots: Vec<SlotType>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map_rom(&mut self, base: u16, size: u32, rom: &[u8]) -> &mut Self {
        self.slots.push(SlotType::Rom(RomSlot::new(rom, base, size)));
        self
    }

    pub fn map_ram(&mut self, base: u16, size: u32) -> &mut Self {
        self.slots.push(SlotType::Ram(RamSlot::new(base, size)));
        self
    }

    pub fn slots(&self) -> &[SlotType] {
        &self.slots
    }

    pub fn read(&self, address: u16) -> u8 {
        match self.slots.iter().find(|slot| slot.contains(address)) {
            Some(slot) => slot.read(address),
            None => OPEN_BUS,
        }
    }

    pub fn write(&mut self, address: u16, value: u8) {
        match self.slots.iter_mut().find(|slot| slot.contains(address)) {
            Some(slot) => slot.write(address, value),
            None => tracing::trace!("Write to unmapped address {:#06X} = {:02X}", address, value),
        }
    }

    /// Zeroes every RAM region, ROM contents are kept.
    pub fn clear_ram(&mut self) {
        for slot in &mut self.slots {
            if let SlotType::Ram(ram) = slot {
                ram.clear();
            }
        }
    }
}
