use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

pub const PALETTE_SIZE: usize = 128;

/// Opaque black, the power-on color of every entry.
pub const BLACK: u32 = 0xFF00_0000;

const ALPHA: u32 = 0xFF00_0000;

/// Replicates the low nibble into both halves of a byte.
#[inline]
fn stretch(nibble: u8) -> u32 {
    let n = (nibble & 0x0F) as u32;
    n | (n << 4)
}

/// Stretches one byte of a `xxxxBBBBGGGGRRRR` palette word into `current`.
///
/// Odd addresses carry the `xxxxBBBB` half and replace the blue channel, even
/// addresses carry `GGGGRRRR` and replace green and red.
pub fn encode(current: u32, odd: bool, data: u8) -> u32 {
    let color = if odd {
        (current & 0xFF00_FFFF) | (stretch(data) << 16)
    } else {
        let g = stretch(data >> 4);
        let r = stretch(data);
        (current & 0xFFFF_0000) | (g << 8) | r
    };
    color | ALPHA
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Palette {
    #[serde(with = "BigArray")]
    colors: [u32; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    pub fn new() -> Self {
        Self {
            colors: [BLACK; PALETTE_SIZE],
        }
    }

    pub fn reset(&mut self) {
        self.colors = [BLACK; PALETTE_SIZE];
    }

    /// Applies a byte written at `offset` bytes into palette RAM.
    pub fn write(&mut self, offset: u16, data: u8) {
        let index = (offset as usize / 2) % PALETTE_SIZE;
        self.colors[index] = encode(self.colors[index], offset & 1 != 0, data);
    }

    pub fn color(&self, index: usize) -> u32 {
        self.colors[index % PALETTE_SIZE]
    }

    pub fn colors(&self) -> &[u32; PALETTE_SIZE] {
        &self.colors
    }
}
