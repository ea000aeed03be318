use crate::{
    bus::{MainBoard, BACKGROUND_SELECT, COLOR_RAM, VIDEO_RAM},
    rom::GraphicsRoms,
};

pub const SCREEN_WIDTH: usize = 256;
pub const SCREEN_HEIGHT: usize = 256;

/// Placeholder color of background blocks until tile patterns are decoded.
pub const BACKGROUND_FILL: u32 = 0xFF22_2222;

const BG_CELLS: usize = 16;
const BG_CELL_SIZE: usize = 16;
const FG_CELLS: usize = 32;
const FG_CELL_SIZE: usize = 8;

/// Distance between the three bit planes of the character ROM.
const CHAR_PLANE_STRIDE: usize = 512 * 8;

/// One 16x16 background block as described by the tile map ROM.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackgroundCell {
    pub code: u8,
    pub color: u8,
    pub flip_y: bool,
}

/// Looks up the background block at grid position (`x`, `y`).
///
/// The low three bits of `select` pick a 0x200 byte page of the map ROM,
/// bit 4 turns the background on. Attributes live 0x100 bytes after codes.
pub fn background_cell(select: u8, x: usize, y: usize, gfx: &GraphicsRoms) -> BackgroundCell {
    let addr = (select as usize & 0x07) * 0x200 + y * BG_CELLS + x;
    let code = if select & 0x10 != 0 { gfx.map(addr) } else { 0 };
    let attr = gfx.map(addr + 0x100);
    BackgroundCell {
        code,
        color: attr & 0x0F,
        flip_y: attr & 0x80 != 0,
    }
}

/// Combines bit `bit` of the three planes into a pen.
///
/// `planes[n]` supplies bit `n` of the pen.
#[inline]
pub fn pen(planes: [u8; 3], bit: u8) -> u8 {
    ((planes[0] >> bit) & 1) | (((planes[1] >> bit) & 1) << 1) | (((planes[2] >> bit) & 1) << 2)
}

/// Character planes for one pixel row, ordered by pen bit.
///
/// The lowest plane in ROM holds the most significant pen bit.
#[inline]
pub fn char_planes(gfx: &GraphicsRoms, addr: usize) -> [u8; 3] {
    [
        gfx.char(addr + 2 * CHAR_PLANE_STRIDE),
        gfx.char(addr + CHAR_PLANE_STRIDE),
        gfx.char(addr),
    ]
}

pub struct Renderer {
    pub screen_buffer: Box<[u32]>,
    pub background: Vec<BackgroundCell>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            screen_buffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
            background: vec![BackgroundCell::default(); BG_CELLS * BG_CELLS],
        }
    }

    pub fn draw(&mut self, board: &MainBoard, gfx: &GraphicsRoms) {
        self.render_background(board, gfx);
        self.render_foreground(board, gfx);
    }

    pub fn render_background(&mut self, board: &MainBoard, gfx: &GraphicsRoms) {
        let select = board.peek(BACKGROUND_SELECT);

        for y in 0..BG_CELLS {
            for x in 0..BG_CELLS {
                self.background[y * BG_CELLS + x] = background_cell(select, x, y, gfx);

                // TODO: decode the tile pattern ROM here, honoring flip_y
                for line in 0..BG_CELL_SIZE {
                    let start = (y * BG_CELL_SIZE + line) * SCREEN_WIDTH + x * BG_CELL_SIZE;
                    self.screen_buffer[start..start + BG_CELL_SIZE].fill(BACKGROUND_FILL);
                }
            }
        }
    }

    pub fn render_foreground(&mut self, board: &MainBoard, gfx: &GraphicsRoms) {
        for y in 0..FG_CELLS {
            for x in 0..FG_CELLS {
                let offset = (y * FG_CELLS + x) as u16;
                let chr = board.peek(VIDEO_RAM + offset);
                let col = board.peek(COLOR_RAM + offset);

                // 512 characters, bit 4 of the color byte is the bank
                let tile = chr as usize | ((col as usize & 0x10) << 4);
                let color = (col & 0x0F) as usize;
                let tile_addr = tile * 8;

                for line in 0..FG_CELL_SIZE {
                    let planes = char_planes(gfx, tile_addr + line);
                    let mut pixel_ptr = (y * FG_CELL_SIZE + line) * SCREEN_WIDTH + x * FG_CELL_SIZE;

                    for bit in (0..8).rev() {
                        let value = pen(planes, bit);
                        if value != 0 {
                            self.screen_buffer[pixel_ptr] = board.palette.color(color << 3 | value as usize);
                        }
                        pixel_ptr += 1;
                    }
                }
            }
        }
    }

    /// Color at (`x`, `y`), or `None` off screen.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < SCREEN_WIDTH && y < SCREEN_HEIGHT {
            Some(self.screen_buffer[y * SCREEN_WIDTH + x])
        } else {
            None
        }
    }

    /// Screen as little-endian RGBA bytes.
    pub fn rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.screen_buffer.len() * 4);
        for &argb in self.screen_buffer.iter() {
            bytes.push((argb & 0xFF) as u8);
            bytes.push((argb >> 8 & 0xFF) as u8);
            bytes.push((argb >> 16 & 0xFF) as u8);
            bytes.push((argb >> 24) as u8);
        }
        bytes
    }
}
