use std::{fs, path::Path};

use anyhow::Context;

use crate::error::MachineError;

pub const MAIN_PROGRAM_SIZE: usize = 0xA000;
pub const SOUND_PROGRAM_SIZE: usize = 0x2000;
pub const CHARS_SIZE: usize = 0x3000;
pub const TILES_SIZE: usize = 0x6000;
pub const SPRITES_SIZE: usize = 0x6000;
pub const MAPS_SIZE: usize = 0x1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    /// 0x0000-0x7FFF followed by 0xC000-0xDFFF
    MainProgram,
    SoundProgram,
    Chars,
    Tiles,
    Sprites,
    Maps,
}

#[derive(Debug)]
struct RomEntry {
    name: &'static str,
    size: usize,
    region: Region,
    offset: usize,
}

const fn entry(name: &'static str, size: usize, region: Region, offset: usize) -> RomEntry {
    RomEntry {
        name,
        size,
        region,
        offset,
    }
}

// Also the order of images inside a concatenated ROM blob.
static ROM_ENTRIES: [RomEntry; 16] = [
    entry("09_j01b.bin", 0x2000, Region::MainProgram, 0x0000),
    entry("10_l01b.bin", 0x2000, Region::MainProgram, 0x2000),
    entry("11_m01b.bin", 0x2000, Region::MainProgram, 0x4000),
    entry("12_n01b.bin", 0x2000, Region::MainProgram, 0x6000),
    entry("13.1r", 0x2000, Region::MainProgram, 0x8000),
    entry("01_h03t.bin", 0x2000, Region::SoundProgram, 0x0000),
    entry("03_e08t.bin", 0x1000, Region::Chars, 0x0000),
    entry("04_h08t.bin", 0x1000, Region::Chars, 0x1000),
    entry("05_k08t.bin", 0x1000, Region::Chars, 0x2000),
    entry("06_l08t.bin", 0x2000, Region::Tiles, 0x0000),
    entry("07_n08t.bin", 0x2000, Region::Tiles, 0x2000),
    entry("08_r08t.bin", 0x2000, Region::Tiles, 0x4000),
    entry("16_m07b.bin", 0x2000, Region::Sprites, 0x0000),
    entry("15_l07b.bin", 0x2000, Region::Sprites, 0x2000),
    entry("14_j07b.bin", 0x2000, Region::Sprites, 0x4000),
    entry("02_p04t.bin", 0x1000, Region::Maps, 0x0000),
];

fn entries() -> impl Iterator<Item = &'static RomEntry> {
    ROM_ENTRIES.iter()
}

/// Size of a blob holding every ROM image back to back.
pub fn blob_size() -> usize {
    entries().map(|e| e.size).sum()
}

/// Graphics ROMs only visible to the video hardware.
///
/// All accessors wrap the index into the bank, so any arithmetic on tile
/// codes stays in range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphicsRoms {
    chars: Box<[u8]>,
    tiles: Box<[u8]>,
    sprites: Box<[u8]>,
    maps: Box<[u8]>,
}

impl GraphicsRoms {
    fn new() -> Self {
        Self {
            chars: vec![0; CHARS_SIZE].into_boxed_slice(),
            tiles: vec![0; TILES_SIZE].into_boxed_slice(),
            sprites: vec![0; SPRITES_SIZE].into_boxed_slice(),
            maps: vec![0; MAPS_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn char(&self, index: usize) -> u8 {
        self.chars[index % CHARS_SIZE]
    }

    #[inline]
    pub fn tile(&self, index: usize) -> u8 {
        self.tiles[index % TILES_SIZE]
    }

    #[inline]
    pub fn sprite(&self, index: usize) -> u8 {
        self.sprites[index % SPRITES_SIZE]
    }

    #[inline]
    pub fn map(&self, index: usize) -> u8 {
        self.maps[index % MAPS_SIZE]
    }
}

/// Every ROM image of both boards.
///
/// Images can only be replaced through the size-checked loaders, so every
/// region always has its full chip size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RomSet {
    main_program: Vec<u8>,
    sound_program: Vec<u8>,
    graphics: GraphicsRoms,
}

impl Default for RomSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl RomSet {
    /// A set with every image zeroed.
    pub fn empty() -> Self {
        Self {
            main_program: vec![0; MAIN_PROGRAM_SIZE],
            sound_program: vec![0; SOUND_PROGRAM_SIZE],
            graphics: GraphicsRoms::new(),
        }
    }

    /// Main board program: 0x0000-0x7FFF followed by 0xC000-0xDFFF.
    pub fn main_program(&self) -> &[u8] {
        &self.main_program
    }

    pub fn sound_program(&self) -> &[u8] {
        &self.sound_program
    }

    pub fn graphics(&self) -> &GraphicsRoms {
        &self.graphics
    }

    /// Replaces the image called `name`; its size must match the chip.
    pub fn load_image(&mut self, name: &str, data: &[u8]) -> Result<(), MachineError> {
        let entry = entries()
            .find(|e| e.name == name)
            .ok_or_else(|| MachineError::UnknownRom(name.to_string()))?;

        if data.len() != entry.size {
            return Err(MachineError::RomSize {
                name: entry.name,
                expected: entry.size,
                actual: data.len(),
            });
        }

        let target: &mut [u8] = match entry.region {
            Region::MainProgram => &mut self.main_program[..],
            Region::SoundProgram => &mut self.sound_program[..],
            Region::Chars => &mut self.graphics.chars[..],
            Region::Tiles => &mut self.graphics.tiles[..],
            Region::Sprites => &mut self.graphics.sprites[..],
            Region::Maps => &mut self.graphics.maps[..],
        };
        target[entry.offset..entry.offset + entry.size].copy_from_slice(data);
        tracing::debug!("Loaded ROM {} ({:#06X} bytes)", entry.name, entry.size);

        Ok(())
    }

    /// Splits a blob holding every image back to back, in arcade set order.
    pub fn from_blob(blob: &[u8]) -> Result<Self, MachineError> {
        let expected = blob_size();
        if blob.len() != expected {
            return Err(MachineError::RomBlobSize {
                expected,
                actual: blob.len(),
            });
        }

        let mut roms = Self::empty();
        let mut offset = 0;
        for entry in entries() {
            roms.load_image(entry.name, &blob[offset..offset + entry.size])?;
            offset += entry.size;
        }
        Ok(roms)
    }

    /// Loads every image from `dir` using the arcade set's file names.
    pub fn load_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut roms = Self::empty();
        for entry in entries() {
            let path = dir.join(entry.name);
            let data = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            roms.load_image(entry.name, &data)
                .with_context(|| format!("loading {}", path.display()))?;
        }
        tracing::info!("Loaded Bomb Jack ROM set from {}", dir.display());
        Ok(roms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_size() {
        assert_eq!(
            blob_size(),
            MAIN_PROGRAM_SIZE + SOUND_PROGRAM_SIZE + CHARS_SIZE + TILES_SIZE + SPRITES_SIZE + MAPS_SIZE
        );
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut roms = RomSet::empty();
        let err = roms.load_image("03_e08t.bin", &[0; 0x800]).unwrap_err();
        assert!(matches!(
            err,
            MachineError::RomSize {
                name: "03_e08t.bin",
                expected: 0x1000,
                actual: 0x800
            }
        ));
    }

    #[test]
    fn test_unknown_image_rejected() {
        let mut roms = RomSet::empty();
        let err = roms.load_image("nope.bin", &[]).unwrap_err();
        assert!(matches!(err, MachineError::UnknownRom(name) if name == "nope.bin"));
    }

    #[test]
    fn test_planes_land_at_offsets() {
        let mut roms = RomSet::empty();
        roms.load_image("04_h08t.bin", &[0xAB; 0x1000]).unwrap();
        roms.load_image("13.1r", &[0xCD; 0x2000]).unwrap();
        assert_eq!(roms.graphics.char(0x0FFF), 0);
        assert_eq!(roms.graphics.char(0x1000), 0xAB);
        assert_eq!(roms.graphics.char(0x1FFF), 0xAB);
        assert_eq!(roms.graphics.char(0x2000), 0);
        assert_eq!(roms.main_program[0x8000], 0xCD);
        assert_eq!(roms.main_program[0x7FFF], 0);
    }

    #[test]
    fn test_blob_order() {
        let mut blob = vec![0u8; blob_size()];
        let maps_start = blob.len() - MAPS_SIZE;
        blob[maps_start] = 0x5A;
        blob[0] = 0x31;
        let roms = RomSet::from_blob(&blob).unwrap();
        assert_eq!(roms.graphics.map(0), 0x5A);
        assert_eq!(roms.main_program[0], 0x31);

        let err = RomSet::from_blob(&blob[1..]).unwrap_err();
        assert!(matches!(err, MachineError::RomBlobSize { .. }));
    }

    #[test]
    fn test_regions_keep_chip_size() {
        let mut roms = RomSet::empty();
        assert!(roms.load_image("13.1r", &[0xEE; 0x1000]).is_err());
        assert!(roms.load_image("01_h03t.bin", &[0xEE; 0x4000]).is_err());
        assert_eq!(roms.main_program().len(), MAIN_PROGRAM_SIZE);
        assert_eq!(roms.sound_program().len(), SOUND_PROGRAM_SIZE);
        assert!(roms.main_program().iter().all(|&b| b == 0));

        let roms = RomSet::from_blob(&vec![0x11; blob_size()]).unwrap();
        assert_eq!(roms.main_program().len(), MAIN_PROGRAM_SIZE);
        assert_eq!(roms.sound_program().len(), SOUND_PROGRAM_SIZE);
    }

    #[test]
    fn test_indices_wrap_to_bank_size() {
        let mut roms = RomSet::empty();
        let mut plane = vec![0u8; 0x1000];
        for (i, b) in plane.iter_mut().enumerate() {
            *b = i as u8;
        }
        roms.load_image("03_e08t.bin", &plane).unwrap();
        roms.load_image("02_p04t.bin", &plane).unwrap();

        let gfx = &roms.graphics;
        for k in [0usize, 1, 7, 0x0FFF] {
            assert_eq!(gfx.char(CHARS_SIZE + k), gfx.char(k));
            assert_eq!(gfx.tile(TILES_SIZE + k), gfx.tile(k));
            assert_eq!(gfx.sprite(SPRITES_SIZE + k), gfx.sprite(k));
            assert_eq!(gfx.map(MAPS_SIZE + k), gfx.map(k));
        }
        assert_eq!(gfx.map(MAPS_SIZE + 0x42), 0x42);
    }
}
