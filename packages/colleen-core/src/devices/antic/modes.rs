//! The mode line generators.
//!
//! Each generator expands the latched scan buffer into colour-register
//! tokens, one token per half colour clock. Character modes additionally
//! read the font cells through ANTIC's own view of memory on every scan
//! line, which is what makes mid-line CHBASE tricks possible at all.

use super::antic::{Antic, WithAntic};
use super::structs::CharGenerator;
use crate::devices::bus::Motherboard;
use crate::devices::gtia::{
    BACKGROUND, BACKGROUND_MASK, PLAYFIELD_0, PLAYFIELD_1, PLAYFIELD_1_FIDDLED, PLAYFIELD_2,
    PLAYFIELD_3,
};

/// Playfield colours of the two-bit graphics and text modes.
const FOUR_COLOR_LO: [u8; 4] = [BACKGROUND_MASK, PLAYFIELD_0, PLAYFIELD_1, PLAYFIELD_2];
/// The same with the PF3 substitution the five colour text modes use for
/// inverse characters.
const FOUR_COLOR_HI: [u8; 4] = [BACKGROUND_MASK, PLAYFIELD_0, PLAYFIELD_1, PLAYFIELD_3];
/// Cell colours of the 20 column text modes, selected by the two top bits
/// of the screen byte.
const CELL_COLORS: [u8; 4] = [PLAYFIELD_0, PLAYFIELD_1, PLAYFIELD_2, PLAYFIELD_3];

fn latch<T: WithAntic>(mb: &T, wide_chars: bool) -> (CharGenerator, [u8; Antic::SCAN_BUFFER_SIZE]) {
    let antic = mb.antic();
    let chargen = if wide_chars {
        antic.char20
    } else {
        antic.char40
    };
    (chargen, antic.scan_buffer)
}

/// Expand one scan line of the given mode into `out[..width]`.
pub fn generate<T: WithAntic + Motherboard>(
    mb: &mut T,
    mode: usize,
    out: &mut [u8],
    width: usize,
    scanline: i32,
) {
    match mode {
        0x02 => mode2(mb, out, width, scanline),
        0x03 => mode3(mb, out, width, scanline),
        0x04 => mode45(mb, out, width, scanline & 7),
        0x05 => mode45(mb, out, width, scanline >> 1),
        0x06 => mode67(mb, out, width, scanline & 7),
        0x07 => mode67(mb, out, width, scanline >> 1),
        0x08 => mode8(mb, out, width),
        0x09 => mode9(mb, out, width),
        0x0a => mode_a(mb, out, width),
        0x0b | 0x0c => mode_bc(mb, out, width),
        0x0d | 0x0e => mode_de(mb, out, width),
        0x0f => mode_f(mb, out, width),
        // blank lines and jumps
        _ => {
            for px in out[..width].iter_mut() {
                *px = BACKGROUND;
            }
        }
    }
}

fn cell_row(chargen: &CharGenerator, row: u16) -> u16 {
    if chargen.upside_down {
        chargen.char_base.wrapping_add(7 - row)
    } else {
        chargen.char_base.wrapping_add(row)
    }
}

/// 40 column hi-res text.
fn mode2<T: WithAntic + Motherboard>(mb: &mut T, out: &mut [u8], width: usize, scanline: i32) {
    let (chargen, scan) = latch(mb, false);
    let row = (scanline & 7) as u16;
    let chbase = cell_row(&chargen, row);
    for (i, out) in out[..width].chunks_exact_mut(8).enumerate() {
        let screendata = scan[i];
        let chaddr = chbase.wrapping_add(u16::from(screendata & 0x7f) << 3);
        let mut chdata = mb.antic_read(chaddr);
        if screendata & chargen.invert_mask != 0 {
            chdata ^= 0xff;
        }
        if screendata & chargen.blank_mask != 0 {
            chdata = 0;
        }
        for (bit, px) in out.iter_mut().enumerate() {
            *px = if chdata & (0x80 >> bit) != 0 {
                PLAYFIELD_1_FIDDLED
            } else {
                PLAYFIELD_2
            };
        }
    }
}

/// 40 column hi-res text with the lowercase descender remap: characters
/// with the top bits 0x60 push their glyph two rows down, blanking the
/// first two and mirroring them in at the bottom.
fn mode3<T: WithAntic + Motherboard>(mb: &mut T, out: &mut [u8], width: usize, scanline: i32) {
    const OFFSET_NORMAL: [u8; 10] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 8];
    const OFFSET_LOW: [u8; 10] = [8, 8, 2, 3, 4, 5, 6, 7, 0, 1];
    let (chargen, scan) = latch(mb, false);
    let mut scanline = scanline;
    if scanline > 10 {
        scanline &= 7;
    }
    let row = scanline as usize;
    for (i, out) in out[..width].chunks_exact_mut(8).enumerate() {
        let screendata = scan[i];
        let chline = if screendata & 0x60 == 0x60 {
            OFFSET_LOW[row]
        } else {
            OFFSET_NORMAL[row]
        };
        let mut chdata = if chline >= 8 {
            // a completely blank row of the cell
            0
        } else {
            let chaddr = cell_row(&chargen, u16::from(chline))
                .wrapping_add(u16::from(screendata & 0x7f) << 3);
            mb.antic_read(chaddr)
        };
        if screendata & chargen.invert_mask != 0 {
            chdata ^= 0xff;
        }
        if screendata & chargen.blank_mask != 0 {
            chdata = 0;
        }
        for (bit, px) in out.iter_mut().enumerate() {
            *px = if chdata & (0x80 >> bit) != 0 {
                PLAYFIELD_1_FIDDLED
            } else {
                PLAYFIELD_2
            };
        }
    }
}

/// 40 column five colour text (modes 4 and 5).
fn mode45<T: WithAntic + Motherboard>(mb: &mut T, out: &mut [u8], width: usize, row: i32) {
    let (chargen, scan) = latch(mb, false);
    let chbase = cell_row(&chargen, row as u16);
    for (i, out) in out[..width].chunks_exact_mut(8).enumerate() {
        let screendata = scan[i];
        let chaddr = chbase.wrapping_add(u16::from(screendata & 0x7f) << 3);
        let chdata = mb.antic_read(chaddr);
        let lut = if screendata & 0x80 != 0 {
            &FOUR_COLOR_HI
        } else {
            &FOUR_COLOR_LO
        };
        for (pair, px) in out.chunks_exact_mut(2).enumerate() {
            let color = lut[usize::from((chdata >> (6 - 2 * pair)) & 0x03)];
            px[0] = color;
            px[1] = color;
        }
    }
}

/// 20 column text (modes 6 and 7); cell colour comes from the top two
/// screen data bits.
fn mode67<T: WithAntic + Motherboard>(mb: &mut T, out: &mut [u8], width: usize, row: i32) {
    let (chargen, scan) = latch(mb, true);
    let chbase = cell_row(&chargen, row as u16);
    for (i, out) in out[..width].chunks_exact_mut(16).enumerate() {
        let screendata = scan[i];
        let chaddr = chbase.wrapping_add(u16::from(screendata & 0x3f) << 3);
        let chdata = mb.antic_read(chaddr);
        let color = CELL_COLORS[usize::from(screendata >> 6)];
        for (bit, px) in out.chunks_exact_mut(2).enumerate() {
            let token = if chdata & (0x80 >> bit) != 0 {
                color
            } else {
                BACKGROUND_MASK
            };
            px[0] = token;
            px[1] = token;
        }
    }
}

/// Four colour graphics, one pixel is four colour clocks.
fn mode8<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(32).enumerate() {
        let screendata = scan[i];
        for (pair, px) in out.chunks_exact_mut(8).enumerate() {
            let color = FOUR_COLOR_LO[usize::from((screendata >> (6 - 2 * pair)) & 0x03)];
            px.iter_mut().for_each(|p| *p = color);
        }
    }
}

/// Two colour graphics, one pixel is four colour clocks.
fn mode9<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(32).enumerate() {
        let screendata = scan[i];
        for (bit, px) in out.chunks_exact_mut(4).enumerate() {
            let token = if screendata & (0x80 >> bit) != 0 {
                PLAYFIELD_0
            } else {
                BACKGROUND_MASK
            };
            px.iter_mut().for_each(|p| *p = token);
        }
    }
}

/// Four colour graphics, one pixel is two colour clocks.
fn mode_a<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(16).enumerate() {
        let screendata = scan[i];
        for (pair, px) in out.chunks_exact_mut(4).enumerate() {
            let color = FOUR_COLOR_LO[usize::from((screendata >> (6 - 2 * pair)) & 0x03)];
            px.iter_mut().for_each(|p| *p = color);
        }
    }
}

/// Two colour graphics, one pixel per colour clock (modes B and C).
fn mode_bc<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(16).enumerate() {
        let screendata = scan[i];
        for (bit, px) in out.chunks_exact_mut(2).enumerate() {
            let token = if screendata & (0x80 >> bit) != 0 {
                PLAYFIELD_0
            } else {
                BACKGROUND_MASK
            };
            px[0] = token;
            px[1] = token;
        }
    }
}

/// Four colour graphics, one pixel per colour clock (modes D and E).
fn mode_de<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(8).enumerate() {
        let screendata = scan[i];
        for (pair, px) in out.chunks_exact_mut(2).enumerate() {
            let color = FOUR_COLOR_LO[usize::from((screendata >> (6 - 2 * pair)) & 0x03)];
            px[0] = color;
            px[1] = color;
        }
    }
}

/// Hi-res graphics, one pixel per half colour clock.
fn mode_f<T: WithAntic>(mb: &mut T, out: &mut [u8], width: usize) {
    let scan = mb.antic().scan_buffer;
    for (i, out) in out[..width].chunks_exact_mut(8).enumerate() {
        let screendata = scan[i];
        for (bit, px) in out.iter_mut().enumerate() {
            *px = if screendata & (0x80 >> bit) != 0 {
                PLAYFIELD_1_FIDDLED
            } else {
                PLAYFIELD_2
            };
        }
    }
}
